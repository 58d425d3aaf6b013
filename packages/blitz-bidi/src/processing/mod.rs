//! Paragraph resolution
//!
//! [`resolve`] runs the whole pipeline for one text: paragraph splitting and
//! class lookup, explicit levels with interleaved bracket pairing, implicit
//! levels per level run, and the L1 whitespace adjustment. The passes share a
//! single [`Resolver`] workspace, each pass living in its own module as an
//! `impl` block.

pub(crate) mod brackets;
pub(crate) mod explicit;
pub(crate) mod implicit;
pub(crate) mod paragraphs;
pub(crate) mod runs_only;
pub(crate) mod tables;
pub(crate) mod whitespace;

use crate::error::{reserve, BidiError, Result};
use crate::flags::{ClassFlags, ReorderingOptions};
use crate::properties::ClassLookup;
use crate::types::{
    is_default_level, no_override, BidiClass, Direction, InsertPoint, Level, ParagraphSpan,
    ReorderingMode, Run, LEVEL_OVERRIDE, MAX_EXPLICIT_LEVEL, RLM_BEFORE,
};

use implicit::IsolateState;
use tables::{LevelTablePair, Reduced};

/// Everything one resolve call needs.
#[derive(Clone, Copy)]
pub(crate) struct ResolveInput<'a> {
    pub text: &'a [u16],
    pub para_level: Level,
    pub embedding_levels: Option<&'a [Level]>,
    pub prologue: &'a [u16],
    pub epilogue: &'a [u16],
    pub lookup: ClassLookup<'a>,
    pub mode: ReorderingMode,
    pub options: ReorderingOptions,
    pub order_paragraphs_ltr: bool,
}

/// Owned outcome of a resolve call.
#[derive(Debug, Clone)]
pub(crate) struct Resolved {
    pub text: Vec<u16>,
    pub classes: Vec<BidiClass>,
    pub levels: Vec<Level>,
    pub paragraphs: Vec<ParagraphSpan>,
    pub para_level: Level,
    /// The paragraph level was detected per paragraph.
    pub auto_level: bool,
    pub direction: Direction,
    pub length: usize,
    pub original_length: usize,
    pub result_length: usize,
    pub trailing_ws_start: usize,
    pub control_count: usize,
    pub insert_points: Vec<InsertPoint>,
    pub mode: ReorderingMode,
    pub options: ReorderingOptions,
    pub order_paragraphs_ltr: bool,
    /// Run table fixed during resolution (runs-only mode).
    pub runs: Option<Vec<Run>>,
}

impl Resolved {
    #[inline]
    pub fn para_level_at(&self, index: usize) -> Level {
        para_level_at(&self.paragraphs, self.auto_level, self.para_level, index)
    }
}

/// Base level of the paragraph containing `index`.
pub(crate) fn para_level_at(
    paragraphs: &[ParagraphSpan],
    auto_level: bool,
    para_level: Level,
    index: usize,
) -> Level {
    match paragraphs.first() {
        Some(first) if auto_level && index >= first.limit => paragraphs
            .iter()
            .find(|para| index < para.limit)
            .or(paragraphs.last())
            .map_or(para_level, |para| para.level),
        _ => para_level,
    }
}

/// Tentative and confirmed LRM/RLM insertion points.
#[derive(Debug, Default)]
pub(crate) struct InsertPoints {
    pub points: Vec<InsertPoint>,
    pub confirmed: usize,
}

impl InsertPoints {
    #[inline]
    pub fn add(&mut self, pos: usize, flag: i32) {
        self.points.push(InsertPoint { pos, flag });
    }

    #[inline]
    pub fn confirm(&mut self) {
        self.confirmed = self.points.len();
    }

    #[inline]
    pub fn retract(&mut self) {
        self.points.truncate(self.confirmed);
    }

    #[inline]
    pub fn has_tentative(&self) -> bool {
        self.points.len() > self.confirmed
    }
}

/// Mutable workspace for one resolve call.
pub(crate) struct Resolver<'a> {
    pub text: &'a [u16],
    pub lookup: ClassLookup<'a>,
    pub mode: ReorderingMode,
    pub options: ReorderingOptions,
    pub order_paragraphs_ltr: bool,
    pub prologue: Option<&'a [u16]>,
    pub epilogue: Option<&'a [u16]>,

    pub classes: Vec<BidiClass>,
    pub levels: Vec<Level>,
    pub paragraphs: Vec<ParagraphSpan>,
    pub para_level: Level,
    pub auto_level: bool,
    pub flags: ClassFlags,
    pub length: usize,
    pub original_length: usize,
    pub control_count: usize,
    pub last_arabic_pos: Option<usize>,
    /// Deepest valid isolate nesting seen by the explicit pass.
    pub isolate_count: usize,
    pub insert_points: InsertPoints,
    pub trailing_ws_start: usize,

    pub table_pair: &'static LevelTablePair,
    pub isolates: Vec<IsolateState>,
}

/// Resolve `input` into levels and paragraph data.
pub(crate) fn resolve(input: ResolveInput<'_>) -> Result<Resolved> {
    let level = input.para_level;
    if (level > MAX_EXPLICIT_LEVEL && !is_default_level(level)) || level & LEVEL_OVERRIDE != 0 {
        return Err(BidiError::InvalidParaLevel { level });
    }
    if input.mode == ReorderingMode::RunsOnly {
        return runs_only::resolve_runs_only(input);
    }
    Resolver::new(input).run(input.embedding_levels)
}

impl<'a> Resolver<'a> {
    pub fn new(input: ResolveInput<'a>) -> Self {
        let non_empty = |s: &'a [u16]| (!s.is_empty()).then_some(s);
        Self {
            text: input.text,
            lookup: input.lookup,
            mode: input.mode,
            options: input.options,
            order_paragraphs_ltr: input.order_paragraphs_ltr,
            prologue: non_empty(input.prologue),
            epilogue: non_empty(input.epilogue),
            classes: Vec::new(),
            levels: Vec::new(),
            paragraphs: Vec::new(),
            para_level: input.para_level,
            auto_level: is_default_level(input.para_level),
            flags: ClassFlags::empty(),
            length: input.text.len(),
            original_length: input.text.len(),
            control_count: 0,
            last_arabic_pos: None,
            isolate_count: 0,
            insert_points: InsertPoints::default(),
            trailing_ws_start: 0,
            table_pair: LevelTablePair::for_mode(ReorderingMode::Default, false),
            isolates: Vec::new(),
        }
    }

    #[inline]
    pub fn para_level_at(&self, index: usize) -> Level {
        para_level_at(&self.paragraphs, self.auto_level, self.para_level, index)
    }

    /// Overall direction implied by the class flags.
    pub fn direction_from_flags(&self) -> Direction {
        let flags = self.flags;
        if !(flags.intersects(ClassFlags::MASK_RTL)
            || flags.contains(ClassFlags::AN) && flags.intersects(ClassFlags::MASK_POSSIBLE_N))
        {
            Direction::Ltr
        } else if !flags.intersects(ClassFlags::MASK_LTR) {
            Direction::Rtl
        } else {
            Direction::Mixed
        }
    }

    fn run(mut self, embedding_levels: Option<&[Level]>) -> Result<Resolved> {
        if self.original_length == 0 {
            return self.finish_empty(0);
        }

        self.classify_paragraphs()?;
        if self.length == 0 {
            // Streaming input without a single complete paragraph.
            let original_length = self.original_length;
            return self.finish_empty(original_length);
        }

        self.trailing_ws_start = self.length;
        let direction = match embedding_levels {
            None => {
                reserve(&mut self.levels, self.length, "embedding levels")?;
                self.levels.resize(self.length, 0);
                self.resolve_explicit_levels()?
            }
            Some(levels) => {
                if levels.len() != self.original_length {
                    return Err(BidiError::LevelsLengthMismatch {
                        expected: self.original_length,
                        actual: levels.len(),
                    });
                }
                reserve(&mut self.levels, self.length, "embedding levels")?;
                self.levels.extend_from_slice(&levels[..self.length]);
                self.check_explicit_levels()?
            }
        };

        if self.isolate_count > 0 {
            reserve(&mut self.isolates, self.isolate_count + 3, "isolate states")?;
        }

        match direction {
            Direction::Ltr | Direction::Rtl | Direction::Neutral => self.trailing_ws_start = 0,
            Direction::Mixed => {
                let insert_marks = self.options.contains(ReorderingOptions::INSERT_MARKS);
                self.table_pair = LevelTablePair::for_mode(self.mode, insert_marks);
                if embedding_levels.is_none()
                    && self.paragraphs.len() <= 1
                    && !self.flags.contains(ClassFlags::MULTI_RUNS)
                {
                    let sor = Reduced::from_level(self.para_level_at(0));
                    let eor = Reduced::from_level(self.para_level_at(self.length - 1));
                    self.resolve_implicit_levels(0, self.length, sor, eor);
                } else {
                    self.resolve_level_runs();
                }
                self.adjust_ws_levels();
            }
        }

        if self.auto_level
            && self.options.contains(ReorderingOptions::INSERT_MARKS)
            && self.mode.is_inverse_like_direct()
        {
            self.insert_trailing_rlm();
        }

        let result_length = if self.options.contains(ReorderingOptions::REMOVE_CONTROLS) {
            self.length - self.control_count
        } else {
            self.length + self.insert_points.points.len()
        };

        log::debug!(
            "resolved {} code units: {} paragraph(s), {:?}, result length {}",
            self.length,
            self.paragraphs.len(),
            direction,
            result_length
        );
        self.into_resolved(direction, result_length)
    }

    /// Resolve each level run with its own sor and eor.
    fn resolve_level_runs(&mut self) {
        let length = self.length;
        let mut limit = 0;
        let first = self.para_level_at(0);
        let mut next_level = self.levels[0];
        let mut eor = Reduced::from_level(if first < no_override(next_level) {
            next_level
        } else {
            first
        });
        loop {
            let mut start = limit;
            let level = next_level;
            let sor = if start > 0 && self.classes[start - 1] == BidiClass::B {
                Reduced::from_level(self.para_level_at(start))
            } else {
                eor
            };

            limit += 1;
            while limit < length
                && (self.levels[limit] == level
                    || ClassFlags::of(self.classes[limit]).intersects(ClassFlags::MASK_BN_EXPLICIT))
            {
                limit += 1;
            }
            next_level = if limit < length {
                self.levels[limit]
            } else {
                self.para_level_at(length - 1)
            };
            eor = Reduced::from_level(if no_override(level) < no_override(next_level) {
                next_level
            } else {
                level
            });

            if level & LEVEL_OVERRIDE == 0 {
                self.resolve_implicit_levels(start, limit, sor, eor);
            } else {
                while start < limit {
                    self.levels[start] &= !LEVEL_OVERRIDE;
                    start += 1;
                }
            }
            if limit >= length {
                break;
            }
        }
    }

    /// RTL paragraphs ending in L text get a closing RLM so that the
    /// trailing L run stays put when reordered back.
    fn insert_trailing_rlm(&mut self) {
        for index in 0..self.paragraphs.len() {
            let para = self.paragraphs[index];
            if para.level == 0 || para.limit == 0 {
                continue;
            }
            let mut last = para.limit - 1;
            for j in (para.start..=last).rev() {
                let class = self.classes[j];
                if class == BidiClass::L {
                    if j < last {
                        while self.classes[last] == BidiClass::B && last > j {
                            last -= 1;
                        }
                    }
                    self.insert_points.add(last, RLM_BEFORE);
                    break;
                }
                if ClassFlags::MASK_R_AL.has(class) {
                    break;
                }
            }
        }
    }

    fn finish_empty(mut self, original_length: usize) -> Result<Resolved> {
        if self.auto_level {
            self.para_level &= 1;
            self.auto_level = false;
        }
        self.paragraphs.clear();
        self.classes.clear();
        self.length = 0;
        self.original_length = original_length;
        self.control_count = 0;
        self.insert_points = InsertPoints::default();
        let direction = Direction::from_level(self.para_level);
        self.into_resolved(direction, 0)
    }

    fn into_resolved(self, direction: Direction, result_length: usize) -> Result<Resolved> {
        let mut text = Vec::new();
        reserve(&mut text, self.text.len(), "text copy")?;
        text.extend_from_slice(self.text);
        Ok(Resolved {
            text,
            classes: self.classes,
            levels: self.levels,
            paragraphs: self.paragraphs,
            para_level: self.para_level,
            auto_level: self.auto_level,
            direction,
            length: self.length,
            original_length: self.original_length,
            result_length,
            trailing_ws_start: self.trailing_ws_start,
            control_count: self.control_count,
            insert_points: self.insert_points.points,
            mode: self.mode,
            options: self.options,
            order_paragraphs_ltr: self.order_paragraphs_ltr,
            runs: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::UnicodeProperties;
    use crate::types::{LEVEL_DEFAULT_LTR, LEVEL_DEFAULT_RTL};

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    fn input<'a>(text: &'a [u16], para_level: Level) -> ResolveInput<'a> {
        ResolveInput {
            text,
            para_level,
            embedding_levels: None,
            prologue: &[],
            epilogue: &[],
            lookup: ClassLookup::new(&UnicodeProperties, None),
            mode: ReorderingMode::Default,
            options: ReorderingOptions::empty(),
            order_paragraphs_ltr: false,
        }
    }

    #[test]
    fn test_para_level_lookup() {
        let paragraphs = [
            ParagraphSpan { start: 0, limit: 3, level: 0 },
            ParagraphSpan { start: 3, limit: 7, level: 1 },
        ];
        assert_eq!(para_level_at(&paragraphs, true, 0, 2), 0);
        assert_eq!(para_level_at(&paragraphs, true, 0, 3), 1);
        assert_eq!(para_level_at(&paragraphs, true, 0, 9), 1);
        // A fixed level applies everywhere.
        assert_eq!(para_level_at(&paragraphs, false, 0, 5), 0);
    }

    #[test]
    fn test_rejects_invalid_para_level() {
        let text = utf16("abc");
        for level in [0x80u8, 0x81, 0xfe] {
            assert_eq!(
                resolve(input(&text, level)).unwrap_err(),
                BidiError::InvalidParaLevel { level }
            );
        }
        assert!(resolve(input(&text, MAX_EXPLICIT_LEVEL)).is_ok());
        assert!(resolve(input(&text, LEVEL_DEFAULT_RTL)).is_ok());
    }

    #[test]
    fn test_empty_text_keeps_default_parity() {
        let resolved = resolve(input(&[], LEVEL_DEFAULT_RTL)).unwrap();
        assert_eq!(resolved.para_level, 1);
        assert_eq!(resolved.direction, Direction::Rtl);
        assert!(resolved.paragraphs.is_empty());
        assert_eq!(resolved.result_length, 0);
    }

    #[test]
    fn test_unidirectional_text_short_circuits() {
        let text = utf16("hello, world");
        let resolved = resolve(input(&text, LEVEL_DEFAULT_LTR)).unwrap();
        assert_eq!(resolved.direction, Direction::Ltr);
        assert_eq!(resolved.trailing_ws_start, 0);
        assert!(resolved.levels.iter().all(|&level| level == 0));
    }

    #[test]
    fn test_mixed_text_resolves_levels() {
        let text = utf16("ab \u{05d0}\u{05d1} 12");
        let resolved = resolve(input(&text, 0)).unwrap();
        assert_eq!(resolved.direction, Direction::Mixed);
        assert_eq!(resolved.levels, vec![0, 0, 0, 1, 1, 1, 2, 2]);
    }

    #[test]
    fn test_levels_length_must_match_text() {
        let text = utf16("abc");
        let levels = [0u8, 0];
        let mut request = input(&text, 0);
        request.embedding_levels = Some(&levels);
        assert_eq!(
            resolve(request).unwrap_err(),
            BidiError::LevelsLengthMismatch { expected: 3, actual: 2 }
        );
    }
}
