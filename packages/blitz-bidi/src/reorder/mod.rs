//! Reordering: visual runs, index maps and level-array utilities

pub(crate) mod maps;
pub(crate) mod runs;
pub mod utils;

pub(crate) use runs::compute_runs;
pub use utils::{invert_map, reorder_logical, reorder_objects_visually, reorder_visual};
