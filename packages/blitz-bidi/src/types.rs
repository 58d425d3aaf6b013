//! BiDi types and data structures
//!
//! This module contains the core enums, level constants and run records
//! shared by every stage of the bidirectional algorithm.

use serde::{Deserialize, Serialize};

/// Embedding level value. Bit 7 carries the override flag while levels are
/// being resolved; public queries never return it set.
pub type Level = u8;

/// Paragraph level sentinel: detect from the first strong character,
/// falling back to LTR.
pub const LEVEL_DEFAULT_LTR: Level = 0x7e;

/// Paragraph level sentinel: detect from the first strong character,
/// falling back to RTL.
pub const LEVEL_DEFAULT_RTL: Level = 0x7f;

/// Deepest explicit embedding level.
pub const MAX_EXPLICIT_LEVEL: Level = 125;

/// Flag bit marking a directional override on a caller-supplied level.
pub const LEVEL_OVERRIDE: Level = 0x80;

/// Index map entry for positions without a counterpart.
pub const MAP_NOWHERE: usize = usize::MAX;

/// Left-to-right mark inserted by the writer.
pub const LRM_CHAR: u16 = 0x200e;

/// Right-to-left mark inserted by the writer.
pub const RLM_CHAR: u16 = 0x200f;

/// True for the two auto-detect sentinels.
#[inline]
pub fn is_default_level(level: Level) -> bool {
    (level & LEVEL_DEFAULT_LTR) == LEVEL_DEFAULT_LTR
}

/// Strip the override flag.
#[inline]
pub(crate) fn no_override(level: Level) -> Level {
    level & !LEVEL_OVERRIDE
}

/// 0 for even levels, 1 for odd ones.
#[inline]
pub(crate) fn lr_from_level(level: Level) -> u8 {
    level & 1
}

/// Bidi_Class values in the engine's internal order.
///
/// The discriminants index the implicit resolver's class grouping table,
/// so the order is fixed. `Enl` and `Enr` never come out of a classifier:
/// they are European numbers rewritten during bracket preprocessing to
/// remember whether the preceding strong context was L or R.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BidiClass {
    L = 0,
    R = 1,
    EN = 2,
    ES = 3,
    ET = 4,
    AN = 5,
    CS = 6,
    B = 7,
    S = 8,
    WS = 9,
    ON = 10,
    LRE = 11,
    LRO = 12,
    AL = 13,
    RLE = 14,
    RLO = 15,
    PDF = 16,
    NSM = 17,
    BN = 18,
    FSI = 19,
    LRI = 20,
    RLI = 21,
    PDI = 22,
    #[doc(hidden)]
    ENL = 23,
    #[doc(hidden)]
    ENR = 24,
}

impl BidiClass {
    /// Single-bit mask for this class, used by the aggregate flag set.
    #[inline]
    pub(crate) fn bit(self) -> u32 {
        1u32 << (self as u8)
    }

    /// Strong left-to-right or right-to-left class.
    #[inline]
    pub fn is_strong(self) -> bool {
        matches!(self, BidiClass::L | BidiClass::R | BidiClass::AL)
    }

    /// One of the embedding, override and pop codes removed by rule X9.
    #[inline]
    pub fn is_explicit_embedding(self) -> bool {
        matches!(
            self,
            BidiClass::LRE | BidiClass::RLE | BidiClass::LRO | BidiClass::RLO | BidiClass::PDF
        )
    }

    /// Isolate initiator or terminator.
    #[inline]
    pub fn is_isolate_control(self) -> bool {
        matches!(
            self,
            BidiClass::LRI | BidiClass::RLI | BidiClass::FSI | BidiClass::PDI
        )
    }

    /// L for L, R for everything else (R and AL in practice).
    #[inline]
    pub(crate) fn dir_from_strong(self) -> BidiClass {
        if self == BidiClass::L {
            BidiClass::L
        } else {
            BidiClass::R
        }
    }

    /// L or R depending on the parity of `level`.
    #[inline]
    pub(crate) fn from_level_parity(level: Level) -> BidiClass {
        if level & 1 == 0 {
            BidiClass::L
        } else {
            BidiClass::R
        }
    }
}

impl From<unicode_bidi::BidiClass> for BidiClass {
    fn from(class: unicode_bidi::BidiClass) -> Self {
        use unicode_bidi::BidiClass as U;
        match class {
            U::L => BidiClass::L,
            U::R => BidiClass::R,
            U::EN => BidiClass::EN,
            U::ES => BidiClass::ES,
            U::ET => BidiClass::ET,
            U::AN => BidiClass::AN,
            U::CS => BidiClass::CS,
            U::B => BidiClass::B,
            U::S => BidiClass::S,
            U::WS => BidiClass::WS,
            U::ON => BidiClass::ON,
            U::LRE => BidiClass::LRE,
            U::LRO => BidiClass::LRO,
            U::AL => BidiClass::AL,
            U::RLE => BidiClass::RLE,
            U::RLO => BidiClass::RLO,
            U::PDF => BidiClass::PDF,
            U::NSM => BidiClass::NSM,
            U::BN => BidiClass::BN,
            U::FSI => BidiClass::FSI,
            U::LRI => BidiClass::LRI,
            U::RLI => BidiClass::RLI,
            U::PDI => BidiClass::PDI,
        }
    }
}

/// Overall directionality of a paragraph, line or string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Everything is left-to-right.
    Ltr,
    /// Everything is right-to-left.
    Rtl,
    /// Both directions occur.
    Mixed,
    /// No strong character was found (only from [`crate::base_direction`]).
    Neutral,
}

impl Direction {
    /// Direction implied by the parity of a level.
    #[inline]
    pub fn from_level(level: Level) -> Self {
        if level & 1 == 0 {
            Direction::Ltr
        } else {
            Direction::Rtl
        }
    }
}

/// Reordering mode selecting the algorithm variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReorderingMode {
    /// Standard logical to visual reordering.
    #[default]
    Default,
    /// Numbers next to R are not split from R runs across neutrals.
    NumbersSpecial,
    /// Numbers are grouped with adjacent R characters.
    GroupNumbersWithR,
    /// Logical to logical transform that only reorders runs.
    RunsOnly,
    /// Visual to logical, treating numbers like L.
    InverseNumbersAsL,
    /// Visual to logical, running the regular algorithm on visual text.
    InverseLikeDirect,
    /// Inverse counterpart of [`ReorderingMode::NumbersSpecial`].
    InverseForNumbersSpecial,
}

impl ReorderingMode {
    /// Modes that take visually ordered text as input.
    #[inline]
    pub fn is_inverse(self) -> bool {
        matches!(
            self,
            ReorderingMode::InverseNumbersAsL
                | ReorderingMode::InverseLikeDirect
                | ReorderingMode::InverseForNumbersSpecial
        )
    }

    /// Modes that produce visual output from logical input.
    #[inline]
    pub(crate) fn is_logical_to_visual(self) -> bool {
        matches!(
            self,
            ReorderingMode::Default | ReorderingMode::NumbersSpecial
        )
    }

    /// The two inverse modes built on the regular algorithm.
    #[inline]
    pub(crate) fn is_inverse_like_direct(self) -> bool {
        matches!(
            self,
            ReorderingMode::InverseLikeDirect | ReorderingMode::InverseForNumbersSpecial
        )
    }

    #[inline]
    pub(crate) fn is_numbers_special(self) -> bool {
        matches!(
            self,
            ReorderingMode::NumbersSpecial | ReorderingMode::InverseForNumbersSpecial
        )
    }
}

/// A directional run, in logical coordinates.
///
/// `start..limit` is the logical span; all characters share `level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BidiRun {
    pub start: usize,
    pub limit: usize,
    pub level: Level,
}

impl BidiRun {
    pub fn len(&self) -> usize {
        self.limit - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.limit
    }

    pub fn is_even_run(&self) -> bool {
        self.level & 1 == 0
    }

    pub fn is_odd_run(&self) -> bool {
        self.level & 1 == 1
    }

    pub fn direction(&self) -> Direction {
        Direction::from_level(self.level)
    }
}

/// One paragraph of a resolved text: `start..limit` with its base level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParagraphSpan {
    pub start: usize,
    pub limit: usize,
    pub level: Level,
}

/// Internal run record. `limit` is the cumulative visual limit once the
/// run table is complete; `insert_remove` holds mark flags (positive) or
/// the negated count of removed controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Run {
    pub start: usize,
    pub limit: usize,
    pub level: Level,
    pub insert_remove: i32,
}

impl Run {
    #[inline]
    pub fn new(start: usize, limit: usize, level: Level) -> Self {
        Self {
            start,
            limit,
            level,
            insert_remove: 0,
        }
    }

    #[inline]
    pub fn is_even(&self) -> bool {
        self.level & 1 == 0
    }
}

/// Mark insertion point recorded by the inverse resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InsertPoint {
    pub pos: usize,
    pub flag: i32,
}

/// LRM/RLM insertion flags kept on runs.
pub(crate) const LRM_BEFORE: i32 = 1;
pub(crate) const LRM_AFTER: i32 = 2;
pub(crate) const RLM_BEFORE: i32 = 4;
pub(crate) const RLM_AFTER: i32 = 8;

/// ZWNJ, ZWJ, LRM, RLM, the embedding/override codes and the isolates.
#[inline]
pub fn is_bidi_control_char(c: u32) -> bool {
    (c & 0xffff_fffc) == 0x200c || (0x202a..=0x202e).contains(&c) || (0x2066..=0x2069).contains(&c)
}
