//! Lines carved out of a resolved paragraph

use once_cell::unsync::OnceCell;

use crate::error::Result;
use crate::paragraph::BidiParagraph;
use crate::processing::whitespace::trailing_ws_start;
use crate::reorder::compute_runs;
use crate::types::{is_bidi_control_char, Direction, Level, Run};
use crate::view::{view_queries, View};

/// A line of a [`BidiParagraph`], sharing its text and levels.
///
/// Trailing whitespace is reset to the paragraph level for the line, and
/// runs are computed for the line alone.
pub struct BidiLine<'p> {
    parent: &'p BidiParagraph,
    start: usize,
    limit: usize,
    para_level: Level,
    direction: Direction,
    trailing_ws_start: usize,
    control_count: usize,
    result_length: usize,
    runs: OnceCell<Vec<Run>>,
}

impl std::fmt::Debug for BidiLine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BidiLine")
            .field("start", &self.start)
            .field("limit", &self.limit)
            .field("para_level", &self.para_level)
            .field("direction", &self.direction)
            .finish()
    }
}

impl<'p> BidiLine<'p> {
    /// Range checks are the caller's job.
    pub(crate) fn new(parent: &'p BidiParagraph, start: usize, limit: usize) -> Self {
        let resolved = parent.resolved();
        let length = limit - start;
        let text = &resolved.text[start..limit];
        let mut para_level = resolved.para_level_at(start);

        let control_count = if resolved.control_count > 0 {
            text.iter()
                .filter(|&&unit| is_bidi_control_char(u32::from(unit)))
                .count()
        } else {
            0
        };

        let (direction, trailing) = if resolved.direction != Direction::Mixed {
            let trailing = if resolved.trailing_ws_start <= start {
                0
            } else if resolved.trailing_ws_start < limit {
                resolved.trailing_ws_start - start
            } else {
                length
            };
            (resolved.direction, trailing)
        } else {
            let classes = &resolved.classes[start..limit];
            let levels = &resolved.levels[start..limit];
            let trailing = trailing_ws_start(classes, levels, para_level);
            let direction = if trailing == 0 {
                Direction::from_level(para_level)
            } else {
                let parity = levels[0] & 1;
                let mixed = (trailing < length && para_level & 1 != parity)
                    || levels[1..trailing].iter().any(|&level| level & 1 != parity);
                if mixed {
                    Direction::Mixed
                } else {
                    Direction::from_level(parity)
                }
            };
            match direction {
                Direction::Ltr => {
                    para_level = (para_level + 1) & !1;
                    (direction, 0)
                }
                Direction::Rtl => {
                    para_level |= 1;
                    (direction, 0)
                }
                _ => (direction, trailing),
            }
        };

        log::trace!(
            "line {start}..{limit}: {direction:?}, level {para_level}, trailing whitespace from {trailing}"
        );
        Self {
            parent,
            start,
            limit,
            para_level,
            direction,
            trailing_ws_start: trailing,
            control_count,
            result_length: length - control_count,
            runs: OnceCell::new(),
        }
    }

    pub(crate) fn base_view(&self) -> View<'p> {
        let resolved = self.parent.resolved();
        let range = self.start..self.limit;
        View {
            text: &resolved.text[range.clone()],
            classes: &resolved.classes[range.clone()],
            levels: &resolved.levels[range],
            paragraphs: &[],
            auto_level: false,
            para_level: self.para_level,
            direction: self.direction,
            length: self.limit - self.start,
            result_length: self.result_length,
            trailing_ws_start: self.trailing_ws_start,
            control_count: self.control_count,
            insert_points: &[],
            mode: resolved.mode,
            options: resolved.options,
            properties: self.parent.properties(),
            runs: &[],
        }
    }

    pub(crate) fn view(&self) -> Result<View<'_>> {
        let base = self.base_view();
        let runs = self.runs.get_or_try_init(|| compute_runs(&base))?;
        Ok(base.with_runs(runs))
    }

    view_queries!();

    /// The paragraph this line belongs to.
    pub fn paragraph(&self) -> &'p BidiParagraph {
        self.parent
    }

    /// Start of the line in the paragraph's text.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Limit of the line in the paragraph's text.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::BidiEngine;
    use crate::flags::{ReorderingOptions, WriteOptions};
    use crate::types::Direction;

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn test_uniform_line_of_mixed_paragraph() {
        let text = utf16("abc \u{05d0}\u{05d1}");
        let para = BidiEngine::new().resolve(&text, 0).unwrap();
        let line = para.line(0, 4).unwrap();
        assert_eq!(line.direction(), Direction::Ltr);
        assert!(line.is_left_to_right());
        assert_eq!(line.run_count().unwrap(), 1);

        let line = para.line(4, 6).unwrap();
        assert_eq!(line.direction(), Direction::Rtl);
        assert_eq!(line.para_level(), 1);
        assert_eq!(line.levels(), vec![1, 1]);
        assert_eq!(
            line.write_reordered_string(WriteOptions::empty()).unwrap(),
            "\u{05d1}\u{05d0}"
        );
    }

    #[test]
    fn test_line_trailing_whitespace_takes_para_level() {
        // Inside the paragraph the space sits between two R runs.
        let text = utf16("\u{05d0} \u{05d1}");
        let para = BidiEngine::new().resolve(&text, 0).unwrap();
        assert_eq!(para.levels(), vec![1, 1, 1]);
        let line = para.line(0, 2).unwrap();
        assert_eq!(line.direction(), Direction::Mixed);
        assert_eq!(line.levels(), vec![1, 0]);
        assert_eq!(line.level_at(1).unwrap(), 0);
        assert_eq!(line.visual_map().unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_line_counts_removed_controls() {
        let mut engine = BidiEngine::new();
        engine.set_reordering_options(ReorderingOptions::REMOVE_CONTROLS);
        let text = utf16("a\u{200e}b\u{200e}c");
        let para = engine.resolve(&text, 0).unwrap();
        let line = para.line(1, 4).unwrap();
        assert_eq!(line.processed_length(), 3);
        assert_eq!(line.result_length(), 1);
        assert_eq!(line.write_reordered_string(WriteOptions::empty()).unwrap(), "b");
    }

    #[test]
    fn test_empty_line() {
        let text = utf16("\u{05d0}b");
        let para = BidiEngine::new().resolve(&text, 0).unwrap();
        let line = para.line(1, 1).unwrap();
        assert_eq!(line.processed_length(), 0);
        assert_eq!(line.run_count().unwrap(), 0);
        assert!(line.levels().is_empty());
    }
}
