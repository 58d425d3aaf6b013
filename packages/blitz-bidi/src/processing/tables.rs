//! State tables for weak, neutral and implicit resolution
//!
//! Two tables drive the implicit resolver. The property table folds the
//! input classes into a handful of reduced classes (with W1-W7 lookahead for
//! separators and terminators between numbers); a level table, chosen by
//! reordering mode and run parity, turns each reduced class sequence into a
//! level delta plus a side effect.
//!
//! Cells are written in their packed form and decoded into typed rows at
//! compile time.

use crate::types::{BidiClass, ReorderingMode};

/// Reduced classes produced by the property table, also the columns of the
/// level tables.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reduced {
    L = 0,
    R = 1,
    EN = 2,
    AN = 3,
    ON = 4,
    S = 5,
    B = 6,
}

impl Reduced {
    const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Reduced::L,
            1 => Reduced::R,
            2 => Reduced::EN,
            3 => Reduced::AN,
            4 => Reduced::ON,
            5 => Reduced::S,
            6 => Reduced::B,
            _ => panic!("reduced class out of range"),
        }
    }

    /// L or R from a level's parity, used for sor and eor.
    #[inline]
    pub fn from_level(level: u8) -> Self {
        if level & 1 == 0 { Reduced::L } else { Reduced::R }
    }
}

/// What the implicit resolver does with its pending property sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PropAction {
    None,
    /// Resolve the pending sequence and start a new one here.
    Flush,
    /// Remember where a possibly-attached separator run starts.
    MarkSecond,
    /// Resolve the pending sequence up to the separator run, and the
    /// separator run itself as ON.
    FlushBoth,
    /// Resolve the pending sequence up to the separator run, which becomes
    /// the new pending sequence.
    FlushShift,
}

impl PropAction {
    const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => PropAction::None,
            1 => PropAction::Flush,
            2 => PropAction::MarkSecond,
            3 => PropAction::FlushBoth,
            4 => PropAction::FlushShift,
            _ => panic!("property action out of range"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PropCell {
    pub state: u8,
    pub action: PropAction,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PropRow {
    pub cells: [PropCell; 15],
    /// Reduced class of a sequence that ends in this state.
    pub result: Reduced,
}

/// Side effects of a level table transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SeqAction {
    None,
    /// Start a conditional ON sequence.
    StartOn,
    /// Extend the level change back to the start of the ON sequence.
    ResolveFromOn,
    /// Raise the ON sequence to run level + 1.
    RaiseOnByOne,
    /// Raise the ON sequence to run level + 2.
    RaiseOnByTwo,
    /// Confirm tentative LRM insertions after an L (inverse with marks).
    ConfirmAfterL,
    /// Drop tentative insertions at an R (inverse with marks).
    RetractAtR,
    /// Track EN/AN following L (inverse with marks).
    TrackNumberAfterL,
    /// Remember the last strong R (inverse with marks).
    RememberStrongR,
    /// Insert an RLM before the last odd-level character (inverse with marks).
    RlmBeforeOn,
    /// Surround a number with LRMs (inverse with marks).
    LrmAroundNumber,
    /// Retract tentative marks, RLM before a segment separator.
    RetractBeforeS,
    /// Raise the ON sequence to at least run level + add level.
    RaiseOnToLevel,
    /// Rewrite an R+ON+EN/AN sequence when an L ends it (inverse).
    UnwindLevels,
    /// Lower levels above run level + 1 in the ON sequence (inverse).
    LowerOn,
}

impl SeqAction {
    const fn from_number(number: u8) -> Self {
        match number {
            0 => SeqAction::None,
            1 => SeqAction::StartOn,
            2 => SeqAction::ResolveFromOn,
            3 => SeqAction::RaiseOnByOne,
            4 => SeqAction::RaiseOnByTwo,
            5 => SeqAction::ConfirmAfterL,
            6 => SeqAction::RetractAtR,
            7 => SeqAction::TrackNumberAfterL,
            8 => SeqAction::RememberStrongR,
            9 => SeqAction::RlmBeforeOn,
            10 => SeqAction::LrmAroundNumber,
            11 => SeqAction::RetractBeforeS,
            12 => SeqAction::RaiseOnToLevel,
            13 => SeqAction::UnwindLevels,
            14 => SeqAction::LowerOn,
            _ => panic!("level action out of range"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct LevelCell {
    pub state: u8,
    pub action: SeqAction,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct LevelRow {
    pub cells: [LevelCell; 7],
    /// Level added to the run level for characters resolved in this state.
    pub add_level: u8,
}

/// Level tables for even and odd runs.
#[derive(Debug)]
pub(crate) struct LevelTablePair {
    pub tables: [&'static [LevelRow]; 2],
}

impl LevelTablePair {
    /// Pair used for `mode`, with or without mark insertion.
    pub fn for_mode(mode: ReorderingMode, insert_marks: bool) -> &'static LevelTablePair {
        match mode {
            ReorderingMode::Default => &PAIR_DEFAULT,
            ReorderingMode::NumbersSpecial => &PAIR_NUMBERS_SPECIAL,
            ReorderingMode::GroupNumbersWithR => &PAIR_GROUP_NUMBERS_WITH_R,
            ReorderingMode::InverseNumbersAsL => &PAIR_INVERSE_NUMBERS_AS_L,
            ReorderingMode::InverseLikeDirect if insert_marks => {
                &PAIR_INVERSE_LIKE_DIRECT_WITH_MARKS
            }
            ReorderingMode::InverseLikeDirect => &PAIR_INVERSE_LIKE_DIRECT,
            ReorderingMode::InverseForNumbersSpecial if insert_marks => {
                &PAIR_INVERSE_FOR_NUMBERS_SPECIAL_WITH_MARKS
            }
            ReorderingMode::InverseForNumbersSpecial => &PAIR_INVERSE_FOR_NUMBERS_SPECIAL,
            // Runs-only resolution is carried out by two passes in the other
            // modes and never selects a table of its own.
            ReorderingMode::RunsOnly => &PAIR_DEFAULT,
        }
    }
}

/// Property table column for each class, in `BidiClass` discriminant order.
const GROUP_PROP: [u8; 25] = [
    0, 1, 2, 7, 8, 3, 9, 6, 5, 4, 4, 10, 10, 12, 10, 10, 10, 11, 10, 4, 4, 4, 4, 13, 14,
];

#[inline]
pub(crate) fn group_of(class: BidiClass) -> usize {
    GROUP_PROP[class as usize] as usize
}

const fn prow(raw: [u8; 16]) -> PropRow {
    let mut cells = [PropCell {
        state: 0,
        action: PropAction::None,
    }; 15];
    let mut i = 0;
    while i < 15 {
        cells[i] = PropCell {
            state: raw[i] & 0x1f,
            action: PropAction::from_raw(raw[i] >> 5),
        };
        i += 1;
    }
    PropRow {
        cells,
        result: Reduced::from_raw(raw[15]),
    }
}

const RL: u8 = Reduced::L as u8;
const RR: u8 = Reduced::R as u8;
const REN: u8 = Reduced::EN as u8;
const RAN: u8 = Reduced::AN as u8;
const RON: u8 = Reduced::ON as u8;
const RS: u8 = Reduced::S as u8;
const RB: u8 = Reduced::B as u8;

//   L       R      EN      AN      ON       S       B      ES      ET      CS     BN     NSM    AL    ENL     ENR   result
pub(crate) static PROPS: [PropRow; 24] = [
    prow([1, 2, 4, 5, 7, 15, 17, 7, 9, 7, 0, 7, 3, 18, 21, RON]),
    prow([1, 32 + 2, 32 + 4, 32 + 5, 32 + 7, 32 + 15, 32 + 17, 32 + 7, 32 + 9, 32 + 7, 1, 1, 32 + 3, 32 + 18, 32 + 21, RL]),
    prow([32 + 1, 2, 32 + 4, 32 + 5, 32 + 7, 32 + 15, 32 + 17, 32 + 7, 32 + 9, 32 + 7, 2, 2, 32 + 3, 32 + 18, 32 + 21, RR]),
    prow([32 + 1, 32 + 2, 32 + 6, 32 + 6, 32 + 8, 32 + 16, 32 + 17, 32 + 8, 32 + 8, 32 + 8, 3, 3, 3, 32 + 18, 32 + 21, RR]),
    prow([32 + 1, 32 + 2, 4, 32 + 5, 32 + 7, 32 + 15, 32 + 17, 64 + 10, 11, 64 + 10, 4, 4, 32 + 3, 18, 21, REN]),
    prow([32 + 1, 32 + 2, 32 + 4, 5, 32 + 7, 32 + 15, 32 + 17, 32 + 7, 32 + 9, 64 + 12, 5, 5, 32 + 3, 32 + 18, 32 + 21, RAN]),
    prow([32 + 1, 32 + 2, 6, 6, 32 + 8, 32 + 16, 32 + 17, 32 + 8, 32 + 8, 64 + 13, 6, 6, 32 + 3, 18, 21, RAN]),
    prow([32 + 1, 32 + 2, 32 + 4, 32 + 5, 7, 32 + 15, 32 + 17, 7, 64 + 14, 7, 7, 7, 32 + 3, 32 + 18, 32 + 21, RON]),
    prow([32 + 1, 32 + 2, 32 + 6, 32 + 6, 8, 32 + 16, 32 + 17, 8, 8, 8, 8, 8, 32 + 3, 32 + 18, 32 + 21, RON]),
    prow([32 + 1, 32 + 2, 4, 32 + 5, 7, 32 + 15, 32 + 17, 7, 9, 7, 9, 9, 32 + 3, 18, 21, RON]),
    prow([96 + 1, 96 + 2, 4, 96 + 5, 128 + 7, 96 + 15, 96 + 17, 128 + 7, 128 + 14, 128 + 7, 10, 128 + 7, 96 + 3, 18, 21, REN]),
    prow([32 + 1, 32 + 2, 4, 32 + 5, 32 + 7, 32 + 15, 32 + 17, 32 + 7, 11, 32 + 7, 11, 11, 32 + 3, 18, 21, REN]),
    prow([96 + 1, 96 + 2, 96 + 4, 5, 128 + 7, 96 + 15, 96 + 17, 128 + 7, 128 + 14, 128 + 7, 12, 128 + 7, 96 + 3, 96 + 18, 96 + 21, RAN]),
    prow([96 + 1, 96 + 2, 6, 6, 128 + 8, 96 + 16, 96 + 17, 128 + 8, 128 + 8, 128 + 8, 13, 128 + 8, 96 + 3, 18, 21, RAN]),
    prow([32 + 1, 32 + 2, 128 + 4, 32 + 5, 7, 32 + 15, 32 + 17, 7, 14, 7, 14, 14, 32 + 3, 128 + 18, 128 + 21, RON]),
    prow([32 + 1, 32 + 2, 32 + 4, 32 + 5, 32 + 7, 15, 32 + 17, 32 + 7, 32 + 9, 32 + 7, 15, 32 + 7, 32 + 3, 32 + 18, 32 + 21, RS]),
    prow([32 + 1, 32 + 2, 32 + 6, 32 + 6, 32 + 8, 16, 32 + 17, 32 + 8, 32 + 8, 32 + 8, 16, 32 + 8, 32 + 3, 32 + 18, 32 + 21, RS]),
    prow([32 + 1, 32 + 2, 32 + 4, 32 + 5, 32 + 7, 32 + 15, 17, 32 + 7, 32 + 9, 32 + 7, 17, 32 + 7, 32 + 3, 32 + 18, 32 + 21, RB]),
    prow([32 + 1, 32 + 2, 18, 32 + 5, 32 + 7, 32 + 15, 32 + 17, 64 + 19, 20, 64 + 19, 18, 18, 32 + 3, 18, 21, RL]),
    prow([96 + 1, 96 + 2, 18, 96 + 5, 128 + 7, 96 + 15, 96 + 17, 128 + 7, 128 + 14, 128 + 7, 19, 128 + 7, 96 + 3, 18, 21, RL]),
    prow([32 + 1, 32 + 2, 18, 32 + 5, 32 + 7, 32 + 15, 32 + 17, 32 + 7, 20, 32 + 7, 20, 20, 32 + 3, 18, 21, RL]),
    prow([32 + 1, 32 + 2, 21, 32 + 5, 32 + 7, 32 + 15, 32 + 17, 64 + 22, 23, 64 + 22, 21, 21, 32 + 3, 18, 21, RAN]),
    prow([96 + 1, 96 + 2, 21, 96 + 5, 128 + 7, 96 + 15, 96 + 17, 128 + 7, 128 + 14, 128 + 7, 22, 128 + 7, 96 + 3, 18, 21, RAN]),
    prow([32 + 1, 32 + 2, 21, 32 + 5, 32 + 7, 32 + 15, 32 + 17, 32 + 7, 23, 32 + 7, 23, 23, 32 + 3, 18, 21, RAN]),
];

const ACT0: [u8; 5] = [0, 1, 2, 3, 4];
const ACT1: [u8; 4] = [0, 1, 13, 14];
const ACT2: [u8; 7] = [0, 1, 2, 5, 6, 7, 8];
const ACT3: [u8; 6] = [0, 1, 9, 10, 11, 12];

const fn lrow(raw: [u8; 8], actions: &[u8]) -> LevelRow {
    let mut cells = [LevelCell {
        state: 0,
        action: SeqAction::None,
    }; 7];
    let mut i = 0;
    while i < 7 {
        cells[i] = LevelCell {
            state: raw[i] & 0x0f,
            action: SeqAction::from_number(actions[(raw[i] >> 4) as usize]),
        };
        i += 1;
    }
    LevelRow {
        cells,
        add_level: raw[7],
    }
}

//                 L     R     EN    AN    ON    S     B   add
static L_DEFAULT: [LevelRow; 6] = [
    lrow([0, 1, 0, 2, 0, 0, 0, 0], &ACT0),
    lrow([0, 1, 3, 3, 0x14, 0x14, 0, 1], &ACT0),
    lrow([0, 1, 0, 2, 0x15, 0x15, 0, 2], &ACT0),
    lrow([0, 1, 3, 3, 0x14, 0x14, 0, 2], &ACT0),
    lrow([0, 0x21, 0x33, 0x33, 4, 4, 0, 0], &ACT0),
    lrow([0, 0x21, 0, 0x32, 5, 5, 0, 0], &ACT0),
];

static R_DEFAULT: [LevelRow; 6] = [
    lrow([1, 0, 2, 2, 0, 0, 0, 0], &ACT0),
    lrow([1, 0, 1, 3, 0x14, 0x14, 0, 1], &ACT0),
    lrow([1, 0, 2, 2, 0, 0, 0, 1], &ACT0),
    lrow([1, 0, 1, 3, 5, 5, 0, 1], &ACT0),
    lrow([0x21, 0, 0x21, 3, 4, 4, 0, 0], &ACT0),
    lrow([1, 0, 1, 3, 5, 5, 0, 0], &ACT0),
];

static L_NUMBERS_SPECIAL: [LevelRow; 5] = [
    lrow([0, 2, 0x11, 0x11, 0, 0, 0, 0], &ACT0),
    lrow([0, 0x42, 1, 1, 0, 0, 0, 0], &ACT0),
    lrow([0, 2, 4, 4, 0x13, 0x13, 0, 1], &ACT0),
    lrow([0, 0x22, 0x34, 0x34, 3, 3, 0, 0], &ACT0),
    lrow([0, 2, 4, 4, 0x13, 0x13, 0, 2], &ACT0),
];

static L_GROUP_NUMBERS_WITH_R: [LevelRow; 6] = [
    lrow([0, 3, 0x11, 0x11, 0, 0, 0, 0], &ACT0),
    lrow([0x20, 3, 1, 1, 2, 0x20, 0x20, 2], &ACT0),
    lrow([0x20, 3, 1, 1, 2, 0x20, 0x20, 1], &ACT0),
    lrow([0, 3, 5, 5, 0x14, 0, 0, 1], &ACT0),
    lrow([0x20, 3, 5, 5, 4, 0x20, 0x20, 1], &ACT0),
    lrow([0, 3, 5, 5, 0x14, 0, 0, 2], &ACT0),
];

static R_GROUP_NUMBERS_WITH_R: [LevelRow; 5] = [
    lrow([2, 0, 1, 1, 0, 0, 0, 0], &ACT0),
    lrow([2, 0, 1, 1, 0, 0, 0, 1], &ACT0),
    lrow([2, 0, 0x14, 0x14, 0x13, 0, 0, 1], &ACT0),
    lrow([0x22, 0, 4, 4, 3, 0, 0, 0], &ACT0),
    lrow([0x22, 0, 4, 4, 3, 0, 0, 1], &ACT0),
];

static L_INVERSE_NUMBERS_AS_L: [LevelRow; 6] = [
    lrow([0, 1, 0, 0, 0, 0, 0, 0], &ACT0),
    lrow([0, 1, 0, 0, 0x14, 0x14, 0, 1], &ACT0),
    lrow([0, 1, 0, 0, 0x15, 0x15, 0, 2], &ACT0),
    lrow([0, 1, 0, 0, 0x14, 0x14, 0, 2], &ACT0),
    lrow([0x20, 1, 0x20, 0x20, 4, 4, 0x20, 1], &ACT0),
    lrow([0x20, 1, 0x20, 0x20, 5, 5, 0x20, 1], &ACT0),
];

static R_INVERSE_NUMBERS_AS_L: [LevelRow; 6] = [
    lrow([1, 0, 1, 1, 0, 0, 0, 0], &ACT0),
    lrow([1, 0, 1, 1, 0x14, 0x14, 0, 1], &ACT0),
    lrow([1, 0, 1, 1, 0, 0, 0, 1], &ACT0),
    lrow([1, 0, 1, 1, 5, 5, 0, 1], &ACT0),
    lrow([0x21, 0, 0x21, 0x21, 4, 4, 0, 0], &ACT0),
    lrow([1, 0, 1, 1, 5, 5, 0, 0], &ACT0),
];

static R_INVERSE_LIKE_DIRECT: [LevelRow; 7] = [
    lrow([1, 0, 2, 2, 0, 0, 0, 0], &ACT1),
    lrow([1, 0, 1, 2, 0x13, 0x13, 0, 1], &ACT1),
    lrow([1, 0, 2, 2, 0, 0, 0, 1], &ACT1),
    lrow([0x21, 0x30, 6, 4, 3, 3, 0x30, 0], &ACT1),
    lrow([0x21, 0x30, 6, 4, 5, 5, 0x30, 3], &ACT1),
    lrow([0x21, 0x30, 6, 4, 5, 5, 0x30, 2], &ACT1),
    lrow([0x21, 0x30, 6, 4, 3, 3, 0x30, 1], &ACT1),
];

static L_INVERSE_LIKE_DIRECT_WITH_MARKS: [LevelRow; 7] = [
    lrow([0, 0x63, 0, 1, 0, 0, 0, 0], &ACT2),
    lrow([0, 0x63, 0, 1, 0x12, 0x30, 0, 4], &ACT2),
    lrow([0x20, 0x63, 0x20, 1, 2, 0x30, 0x20, 3], &ACT2),
    lrow([0, 0x63, 0x55, 0x56, 0x14, 0x30, 0, 3], &ACT2),
    lrow([0x30, 0x43, 0x55, 0x56, 4, 0x30, 0x30, 3], &ACT2),
    lrow([0x30, 0x43, 5, 0x56, 0x14, 0x30, 0x30, 4], &ACT2),
    lrow([0x30, 0x43, 0x55, 6, 0x14, 0x30, 0x30, 4], &ACT2),
];

static R_INVERSE_LIKE_DIRECT_WITH_MARKS: [LevelRow; 7] = [
    lrow([0x13, 0, 1, 1, 0, 0, 0, 0], &ACT3),
    lrow([0x23, 0, 1, 1, 2, 0x40, 0, 1], &ACT3),
    lrow([0x23, 0, 1, 1, 2, 0x40, 0, 0], &ACT3),
    lrow([3, 0, 3, 0x36, 0x14, 0x40, 0, 1], &ACT3),
    lrow([0x53, 0x40, 5, 0x36, 4, 0x40, 0x40, 0], &ACT3),
    lrow([0x53, 0x40, 5, 0x36, 4, 0x40, 0x40, 1], &ACT3),
    lrow([0x53, 0x40, 6, 6, 4, 0x40, 0x40, 3], &ACT3),
];

static L_INVERSE_FOR_NUMBERS_SPECIAL_WITH_MARKS: [LevelRow; 5] = [
    lrow([0, 0x62, 1, 1, 0, 0, 0, 0], &ACT2),
    lrow([0, 0x62, 1, 1, 0, 0x30, 0, 4], &ACT2),
    lrow([0, 0x62, 0x54, 0x54, 0x13, 0x30, 0, 3], &ACT2),
    lrow([0x30, 0x42, 0x54, 0x54, 3, 0x30, 0x30, 3], &ACT2),
    lrow([0x30, 0x42, 4, 4, 0x13, 0x30, 0x30, 4], &ACT2),
];

static PAIR_DEFAULT: LevelTablePair = LevelTablePair {
    tables: [&L_DEFAULT, &R_DEFAULT],
};

static PAIR_NUMBERS_SPECIAL: LevelTablePair = LevelTablePair {
    tables: [&L_NUMBERS_SPECIAL, &R_DEFAULT],
};

static PAIR_GROUP_NUMBERS_WITH_R: LevelTablePair = LevelTablePair {
    tables: [&L_GROUP_NUMBERS_WITH_R, &R_GROUP_NUMBERS_WITH_R],
};

static PAIR_INVERSE_NUMBERS_AS_L: LevelTablePair = LevelTablePair {
    tables: [&L_INVERSE_NUMBERS_AS_L, &R_INVERSE_NUMBERS_AS_L],
};

static PAIR_INVERSE_LIKE_DIRECT: LevelTablePair = LevelTablePair {
    tables: [&L_DEFAULT, &R_INVERSE_LIKE_DIRECT],
};

static PAIR_INVERSE_LIKE_DIRECT_WITH_MARKS: LevelTablePair = LevelTablePair {
    tables: [
        &L_INVERSE_LIKE_DIRECT_WITH_MARKS,
        &R_INVERSE_LIKE_DIRECT_WITH_MARKS,
    ],
};

static PAIR_INVERSE_FOR_NUMBERS_SPECIAL: LevelTablePair = LevelTablePair {
    tables: [&L_NUMBERS_SPECIAL, &R_INVERSE_LIKE_DIRECT],
};

static PAIR_INVERSE_FOR_NUMBERS_SPECIAL_WITH_MARKS: LevelTablePair = LevelTablePair {
    tables: [
        &L_INVERSE_FOR_NUMBERS_SPECIAL_WITH_MARKS,
        &R_INVERSE_LIKE_DIRECT_WITH_MARKS,
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_rows_decode() {
        let row = &PROPS[4];
        assert_eq!(row.result, Reduced::EN);
        // ES after EN may attach to a following number.
        assert_eq!(row.cells[7].state, 10);
        assert_eq!(row.cells[7].action, PropAction::MarkSecond);
        assert_eq!(PROPS[10].cells[0].action, PropAction::FlushBoth);
        assert_eq!(PROPS[14].cells[2].action, PropAction::FlushShift);
    }

    #[test]
    fn test_level_actions_follow_table_family() {
        // 0x14 in a DEFAULT table is action 1 (start ON), state 4.
        let cell = L_DEFAULT[1].cells[Reduced::ON as usize];
        assert_eq!(cell.state, 4);
        assert_eq!(cell.action, SeqAction::StartOn);
        // The same raw action number means "unwind" in the inverse R table.
        let cell = R_INVERSE_LIKE_DIRECT[3].cells[Reduced::L as usize];
        assert_eq!(cell.action, SeqAction::UnwindLevels);
        let cell = R_INVERSE_LIKE_DIRECT_WITH_MARKS[4].cells[Reduced::L as usize];
        assert_eq!(cell.action, SeqAction::RaiseOnToLevel);
        assert_eq!(L_INVERSE_LIKE_DIRECT_WITH_MARKS[1].add_level, 4);
    }

    #[test]
    fn test_every_next_state_exists() {
        for pair in [
            &PAIR_DEFAULT,
            &PAIR_NUMBERS_SPECIAL,
            &PAIR_GROUP_NUMBERS_WITH_R,
            &PAIR_INVERSE_NUMBERS_AS_L,
            &PAIR_INVERSE_LIKE_DIRECT,
            &PAIR_INVERSE_LIKE_DIRECT_WITH_MARKS,
            &PAIR_INVERSE_FOR_NUMBERS_SPECIAL,
            &PAIR_INVERSE_FOR_NUMBERS_SPECIAL_WITH_MARKS,
        ] {
            for table in pair.tables {
                for row in table {
                    for cell in row.cells {
                        assert!((cell.state as usize) < table.len());
                    }
                }
            }
        }
        for row in &PROPS {
            for cell in row.cells {
                assert!((cell.state as usize) < PROPS.len());
            }
        }
    }

    #[test]
    fn test_group_covers_internal_number_classes() {
        assert_eq!(group_of(BidiClass::ENL), 13);
        assert_eq!(group_of(BidiClass::ENR), 14);
        assert_eq!(group_of(BidiClass::PDI), 4);
    }
}
