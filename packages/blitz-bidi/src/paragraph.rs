//! Resolved paragraphs
//!
//! A [`BidiParagraph`] owns the outcome of one resolve call: the text, its
//! classes and levels, the paragraph table and, once a run query needs it,
//! the visual run table.

use std::sync::Arc;

use once_cell::unsync::OnceCell;

use crate::error::{BidiError, Result};
use crate::line::BidiLine;
use crate::processing::Resolved;
use crate::properties::BidiProperties;
use crate::reorder::compute_runs;
use crate::types::{Level, ParagraphSpan, Run};
use crate::view::{check_index, view_queries, View};

/// Text resolved into embedding levels, possibly several paragraphs.
pub struct BidiParagraph {
    resolved: Resolved,
    properties: Arc<dyn BidiProperties>,
    runs: OnceCell<Vec<Run>>,
}

impl std::fmt::Debug for BidiParagraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BidiParagraph")
            .field("length", &self.resolved.original_length)
            .field("processed_length", &self.resolved.length)
            .field("para_level", &self.resolved.para_level)
            .field("direction", &self.resolved.direction)
            .field("paragraphs", &self.resolved.paragraphs.len())
            .finish()
    }
}

impl BidiParagraph {
    pub(crate) fn new(resolved: Resolved, properties: Arc<dyn BidiProperties>) -> Self {
        Self {
            resolved,
            properties,
            runs: OnceCell::new(),
        }
    }

    pub(crate) fn base_view(&self) -> View<'_> {
        self.resolved.view(&*self.properties)
    }

    pub(crate) fn view(&self) -> Result<View<'_>> {
        let base = self.base_view();
        if self.resolved.runs.is_some() {
            return Ok(base);
        }
        let runs = self.runs.get_or_try_init(|| compute_runs(&base))?;
        Ok(base.with_runs(runs))
    }

    pub(crate) fn resolved(&self) -> &Resolved {
        &self.resolved
    }

    pub(crate) fn properties(&self) -> &dyn BidiProperties {
        &*self.properties
    }

    view_queries!();

    /// Length of the input text, processed or not.
    pub fn length(&self) -> usize {
        self.resolved.original_length
    }

    /// Number of complete paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.resolved.paragraphs.len()
    }

    /// Paragraph number `index`.
    pub fn paragraph_at(&self, index: usize) -> Result<ParagraphSpan> {
        check_index(index, 0, self.resolved.paragraphs.len())?;
        Ok(self.resolved.paragraphs[index])
    }

    /// Number of the paragraph containing the code unit at `char_index`.
    pub fn paragraph_index(&self, char_index: usize) -> Result<usize> {
        check_index(char_index, 0, self.resolved.length)?;
        let paragraphs = &self.resolved.paragraphs;
        let index = paragraphs.partition_point(|para| para.limit <= char_index);
        Ok(index.min(paragraphs.len().saturating_sub(1)))
    }

    /// Paragraph containing the code unit at `char_index`.
    pub fn paragraph_of(&self, char_index: usize) -> Result<ParagraphSpan> {
        self.paragraph_at(self.paragraph_index(char_index)?)
    }

    /// Base level of the paragraph containing `char_index`.
    pub fn para_level_at(&self, char_index: usize) -> Result<Level> {
        check_index(char_index, 0, self.resolved.length)?;
        Ok(self.resolved.para_level_at(char_index))
    }

    /// Carve the line `start..limit` out of one paragraph.
    ///
    /// A line may be empty but may not reach past the processed text or
    /// across a paragraph separator.
    pub fn line(&self, start: usize, limit: usize) -> Result<BidiLine<'_>> {
        let length = self.resolved.length;
        if start > limit || limit > length {
            return Err(BidiError::InvalidLineRange {
                start,
                limit,
                length,
            });
        }
        if start < limit && self.paragraph_index(start)? != self.paragraph_index(limit - 1)? {
            return Err(BidiError::CrossesParagraphBoundary { start, limit });
        }
        Ok(BidiLine::new(self, start, limit))
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::BidiEngine;
    use crate::error::BidiError;
    use crate::flags::{ReorderingOptions, WriteOptions};
    use crate::types::{BidiRun, Direction, ParagraphSpan, LEVEL_DEFAULT_LTR};

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn test_runs_and_reordering() {
        let text = utf16("abc \u{05d0}\u{05d1}\u{05d2}");
        let para = BidiEngine::new().resolve(&text, 0).unwrap();
        assert_eq!(para.direction(), Direction::Mixed);
        assert!(para.is_mixed());
        assert_eq!(para.run_count().unwrap(), 2);
        assert_eq!(
            para.visual_run(1).unwrap(),
            BidiRun { start: 4, limit: 7, level: 1 }
        );
        assert_eq!(
            para.logical_run(5).unwrap(),
            BidiRun { start: 4, limit: 7, level: 1 }
        );
        assert_eq!(
            para.write_reordered_string(WriteOptions::empty()).unwrap(),
            "abc \u{05d2}\u{05d1}\u{05d0}"
        );
    }

    #[test]
    fn test_logical_order_run_accessors() {
        let text = utf16("\u{05d0}\u{05d1} ab");
        let para = BidiEngine::new().resolve(&text, 1).unwrap();
        // Visually the L run comes first; logically the R run does.
        assert_eq!(para.visual_run(0).unwrap().start, 3);
        assert_eq!(para.run_start(0).unwrap(), 0);
        assert_eq!(para.run_limit(0).unwrap(), 3);
        assert_eq!(para.run_level(0).unwrap(), 1);
        assert_eq!(para.run_level(1).unwrap(), 2);
        assert!(para.run_level(2).is_err());
    }

    #[test]
    fn test_paragraph_queries() {
        let text = utf16("abc\n\u{05d0}\u{05d1}");
        let para = BidiEngine::new().resolve(&text, LEVEL_DEFAULT_LTR).unwrap();
        assert_eq!(para.paragraph_count(), 2);
        assert_eq!(
            para.paragraph_at(1).unwrap(),
            ParagraphSpan { start: 4, limit: 6, level: 1 }
        );
        assert_eq!(para.paragraph_index(3).unwrap(), 0);
        assert_eq!(para.paragraph_index(4).unwrap(), 1);
        assert_eq!(para.paragraph_of(5).unwrap().level, 1);
        assert_eq!(para.para_level_at(5).unwrap(), 1);
        assert_eq!(para.para_level(), 0);
        assert!(para.paragraph_at(2).is_err());
    }

    #[test]
    fn test_streaming_stops_at_last_separator() {
        let mut engine = BidiEngine::new();
        engine.set_reordering_options(ReorderingOptions::STREAMING);
        let text = utf16("abc\ndef");
        let para = engine.resolve(&text, 0).unwrap();
        assert_eq!(para.length(), 7);
        assert_eq!(para.processed_length(), 4);
        assert_eq!(para.paragraph_count(), 1);
        assert_eq!(para.levels().len(), 4);
    }

    #[test]
    fn test_line_validation() {
        let text = utf16("ab\ncd");
        let para = BidiEngine::new().resolve(&text, 0).unwrap();
        assert!(matches!(
            para.line(3, 2),
            Err(BidiError::InvalidLineRange { .. })
        ));
        assert!(matches!(
            para.line(0, 6),
            Err(BidiError::InvalidLineRange { .. })
        ));
        assert_eq!(
            para.line(1, 4).unwrap_err(),
            BidiError::CrossesParagraphBoundary { start: 1, limit: 4 }
        );
        assert!(para.line(0, 3).is_ok());
        assert_eq!(para.line(2, 2).unwrap().run_count().unwrap(), 0);
    }

    #[test]
    fn test_empty_text() {
        let para = BidiEngine::new().resolve(&[], 1).unwrap();
        assert_eq!(para.run_count().unwrap(), 0);
        assert_eq!(para.paragraph_count(), 0);
        assert_eq!(para.direction(), Direction::Rtl);
        assert!(para.write_reordered(WriteOptions::empty()).unwrap().is_empty());
        assert!(para.logical_map().unwrap().is_empty());
    }
}
