//! Read-only view over resolved data
//!
//! Paragraphs and lines answer the same queries; both hand out a [`View`]
//! borrowing their arrays and cached run table, and the query code in this
//! module, `reorder` and `writer` only ever sees the view.

use crate::error::{BidiError, Result};
use crate::flags::ReorderingOptions;
use crate::processing::{para_level_at, Resolved};
use crate::properties::BidiProperties;
use crate::types::{
    BidiClass, BidiRun, Direction, InsertPoint, Level, ParagraphSpan, ReorderingMode, Run,
};

#[derive(Clone, Copy)]
pub(crate) struct View<'a> {
    pub text: &'a [u16],
    pub classes: &'a [BidiClass],
    pub levels: &'a [Level],
    /// Empty for lines, whose base level is uniform.
    pub paragraphs: &'a [ParagraphSpan],
    pub auto_level: bool,
    pub para_level: Level,
    pub direction: Direction,
    pub length: usize,
    pub result_length: usize,
    pub trailing_ws_start: usize,
    pub control_count: usize,
    pub insert_points: &'a [InsertPoint],
    pub mode: ReorderingMode,
    pub options: ReorderingOptions,
    pub properties: &'a dyn BidiProperties,
    /// Visual run table; empty until computed.
    pub runs: &'a [Run],
}

#[inline]
pub(crate) fn check_index(index: usize, start: usize, limit: usize) -> Result<()> {
    if index < start || index >= limit {
        return Err(BidiError::IndexOutOfRange {
            index,
            start,
            limit,
        });
    }
    Ok(())
}

impl Resolved {
    /// View of a whole resolved text. The run table is the one fixed during
    /// resolution, if any.
    pub(crate) fn view<'a>(&'a self, properties: &'a dyn BidiProperties) -> View<'a> {
        View {
            text: &self.text,
            classes: &self.classes,
            levels: &self.levels,
            paragraphs: &self.paragraphs,
            auto_level: self.auto_level,
            para_level: self.para_level,
            direction: self.direction,
            length: self.length,
            result_length: self.result_length,
            trailing_ws_start: self.trailing_ws_start,
            control_count: self.control_count,
            insert_points: &self.insert_points,
            mode: self.mode,
            options: self.options,
            properties,
            runs: self.runs.as_deref().unwrap_or(&[]),
        }
    }
}

impl<'a> View<'a> {
    /// Same view with the run table attached.
    pub fn with_runs(self, runs: &'a [Run]) -> Self {
        Self { runs, ..self }
    }

    #[inline]
    pub fn para_level_at(&self, index: usize) -> Level {
        para_level_at(self.paragraphs, self.auto_level, self.para_level, index)
    }

    /// Visual length of run `index`.
    #[inline]
    pub fn run_length(&self, index: usize) -> usize {
        let previous = if index > 0 { self.runs[index - 1].limit } else { 0 };
        self.runs[index].limit - previous
    }

    pub fn level_at(&self, index: usize) -> Result<Level> {
        check_index(index, 0, self.length)?;
        if self.direction != Direction::Mixed || index >= self.trailing_ws_start {
            Ok(self.para_level_at(index))
        } else {
            Ok(self.levels[index])
        }
    }

    pub fn levels(&self) -> Vec<Level> {
        let mut levels = self.levels[..self.length].to_vec();
        let start = self.trailing_ws_start.min(self.length);
        levels[start..].fill(self.para_level);
        levels
    }

    pub fn visual_run(&self, index: usize) -> Result<BidiRun> {
        check_index(index, 0, self.runs.len())?;
        let run = self.runs[index];
        Ok(BidiRun {
            start: run.start,
            limit: run.start + self.run_length(index),
            level: run.level,
        })
    }

    /// Run containing the logical position `position`.
    pub fn logical_run(&self, position: usize) -> Result<BidiRun> {
        check_index(position, 0, self.length)?;
        let mut visual_start = 0;
        for run in self.runs {
            let logical_limit = run.start + run.limit - visual_start;
            if (run.start..logical_limit).contains(&position) {
                return Ok(BidiRun {
                    start: run.start,
                    limit: logical_limit,
                    level: run.level,
                });
            }
            visual_start = run.limit;
        }
        Err(BidiError::IndexOutOfRange {
            index: position,
            start: 0,
            limit: self.length,
        })
    }

    /// Run `index` counted in logical order.
    pub fn logical_order_run(&self, index: usize) -> Result<BidiRun> {
        check_index(index, 0, self.runs.len())?;
        let mut order: Vec<usize> = (0..self.runs.len()).collect();
        order.sort_by_key(|&i| self.runs[i].start);
        self.visual_run(order[index])
    }

    pub fn is_left_to_right(&self) -> bool {
        self.direction == Direction::Ltr && self.para_level & 1 == 0
    }

    pub fn is_right_to_left(&self) -> bool {
        self.direction == Direction::Rtl && self.para_level & 1 == 1
    }

    pub fn is_mixed(&self) -> bool {
        !self.is_left_to_right() && !self.is_right_to_left()
    }
}

/// Query methods shared by [`crate::BidiParagraph`] and [`crate::BidiLine`].
///
/// The implementing type provides `base_view(&self) -> View<'_>` and
/// `view(&self) -> Result<View<'_>>`, the latter with the run table filled.
macro_rules! view_queries {
    () => {
        /// The text this object covers, in code units.
        pub fn text(&self) -> &[u16] {
            let view = self.base_view();
            &view.text[..view.length]
        }

        /// Number of code units resolved. Shorter than the input only for
        /// streaming text ending in an incomplete paragraph.
        pub fn processed_length(&self) -> usize {
            self.base_view().length
        }

        /// Length of the reordered output once marks are inserted or
        /// controls removed.
        pub fn result_length(&self) -> usize {
            self.base_view().result_length
        }

        /// Base level (of the first paragraph, for multi-paragraph text).
        pub fn para_level(&self) -> $crate::types::Level {
            self.base_view().para_level
        }

        /// Same as [`Self::para_level`].
        pub fn base_level(&self) -> $crate::types::Level {
            self.para_level()
        }

        pub fn direction(&self) -> $crate::types::Direction {
            self.base_view().direction
        }

        pub fn reordering_mode(&self) -> $crate::types::ReorderingMode {
            self.base_view().mode
        }

        pub fn reordering_options(&self) -> $crate::flags::ReorderingOptions {
            self.base_view().options
        }

        pub fn is_left_to_right(&self) -> bool {
            self.base_view().is_left_to_right()
        }

        pub fn is_right_to_left(&self) -> bool {
            self.base_view().is_right_to_left()
        }

        pub fn is_mixed(&self) -> bool {
            self.base_view().is_mixed()
        }

        pub fn base_is_left_to_right(&self) -> bool {
            self.para_level() == 0
        }

        /// Resolved level of the code unit at `index`.
        pub fn level_at(&self, index: usize) -> $crate::error::Result<$crate::types::Level> {
            self.base_view().level_at(index)
        }

        /// Resolved levels of all processed code units.
        pub fn levels(&self) -> Vec<$crate::types::Level> {
            self.base_view().levels()
        }

        pub fn run_count(&self) -> $crate::error::Result<usize> {
            Ok(self.view()?.runs.len())
        }

        /// Run `index` in visual order.
        pub fn visual_run(&self, index: usize) -> $crate::error::Result<$crate::types::BidiRun> {
            self.view()?.visual_run(index)
        }

        /// Run containing the logical position `position`.
        pub fn logical_run(
            &self,
            position: usize,
        ) -> $crate::error::Result<$crate::types::BidiRun> {
            self.view()?.logical_run(position)
        }

        /// Level of run `index`, counting runs in logical order.
        pub fn run_level(&self, index: usize) -> $crate::error::Result<$crate::types::Level> {
            Ok(self.view()?.logical_order_run(index)?.level)
        }

        /// Start of run `index`, counting runs in logical order.
        pub fn run_start(&self, index: usize) -> $crate::error::Result<usize> {
            Ok(self.view()?.logical_order_run(index)?.start)
        }

        /// Limit of run `index`, counting runs in logical order.
        pub fn run_limit(&self, index: usize) -> $crate::error::Result<usize> {
            Ok(self.view()?.logical_order_run(index)?.limit)
        }

        /// Visual position of a logical index, or
        /// [`MAP_NOWHERE`](crate::MAP_NOWHERE) for a removed control.
        pub fn visual_index(&self, logical: usize) -> $crate::error::Result<usize> {
            self.view()?.visual_index(logical)
        }

        /// Logical index at a visual position, or
        /// [`MAP_NOWHERE`](crate::MAP_NOWHERE) for an inserted mark.
        pub fn logical_index(&self, visual: usize) -> $crate::error::Result<usize> {
            self.view()?.logical_index(visual)
        }

        /// Visual position of every logical index.
        pub fn logical_map(&self) -> $crate::error::Result<Vec<usize>> {
            self.view()?.logical_map()
        }

        /// Logical index at every visual position.
        pub fn visual_map(&self) -> $crate::error::Result<Vec<usize>> {
            self.view()?.visual_map()
        }

        /// The text in visual order.
        pub fn write_reordered(
            &self,
            options: $crate::flags::WriteOptions,
        ) -> $crate::error::Result<Vec<u16>> {
            self.view()?.write_reordered(options)
        }

        /// [`Self::write_reordered`] decoded into a `String`, replacing
        /// unpaired surrogates.
        pub fn write_reordered_string(
            &self,
            options: $crate::flags::WriteOptions,
        ) -> $crate::error::Result<String> {
            Ok(String::from_utf16_lossy(&self.write_reordered(options)?))
        }
    };
}

pub(crate) use view_queries;
