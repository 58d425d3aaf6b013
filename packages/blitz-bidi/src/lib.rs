//! Unicode Bidirectional Algorithm (UAX #9)
//!
//! Resolves embedding levels for UTF-16 text and reorders it for display:
//! - explicit embeddings, overrides and isolates, with bracket pairing
//! - weak, neutral and implicit resolution driven by state tables
//! - line splitting, visual runs and logical/visual index maps
//! - inverse and runs-only reordering modes with mark insertion
//! - reordered output with mirroring and control removal
//!
//! ```
//! use blitz_bidi::{BidiEngine, WriteOptions};
//!
//! let engine = BidiEngine::new();
//! let para = engine.resolve_str("abc \u{05d0}\u{05d1}", 0).unwrap();
//! assert_eq!(para.levels(), vec![0, 0, 0, 0, 1, 1]);
//! let visual = para.write_reordered_string(WriteOptions::empty()).unwrap();
//! assert_eq!(visual, "abc \u{05d1}\u{05d0}");
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod flags;
pub mod line;
pub mod paragraph;
pub(crate) mod processing;
pub mod properties;
pub mod reorder;
pub mod types;
pub(crate) mod view;
pub mod writer;

pub use config::BidiConfig;
pub use engine::{BidiEngine, ParagraphContext, ResolveRequest};
pub use error::{BidiError, Result};
pub use flags::{ReorderingOptions, WriteOptions};
pub use line::BidiLine;
pub use paragraph::BidiParagraph;
pub use properties::{BidiClassifier, BidiProperties, UnicodeProperties};
pub use reorder::{invert_map, reorder_logical, reorder_objects_visually, reorder_visual};
pub use types::{
    is_bidi_control_char, BidiClass, BidiRun, Direction, Level, ParagraphSpan, ReorderingMode,
    LEVEL_DEFAULT_LTR, LEVEL_DEFAULT_RTL, LEVEL_OVERRIDE, LRM_CHAR, MAP_NOWHERE,
    MAX_EXPLICIT_LEVEL, RLM_CHAR,
};
pub use writer::write_reverse;

use properties::code_point_at;

/// Direction of the first strong character: `Ltr` for L, `Rtl` for R or
/// AL, `Neutral` when there is none.
pub fn base_direction(text: &[u16]) -> Direction {
    let properties = UnicodeProperties;
    let mut i = 0;
    while i < text.len() {
        let (c, units) = code_point_at(text, i);
        i += units;
        match properties.bidi_class(c) {
            BidiClass::L => return Direction::Ltr,
            BidiClass::R | BidiClass::AL => return Direction::Rtl,
            _ => {}
        }
    }
    Direction::Neutral
}

/// True when `text` contains anything that can produce right-to-left
/// levels: R, AL, AN, RLE or RLO.
pub fn requires_bidi(text: &[u16]) -> bool {
    let properties = UnicodeProperties;
    let mut i = 0;
    while i < text.len() {
        let (c, units) = code_point_at(text, i);
        i += units;
        if matches!(
            properties.bidi_class(c),
            BidiClass::R | BidiClass::AL | BidiClass::AN | BidiClass::RLE | BidiClass::RLO
        ) {
            return true;
        }
    }
    false
}
