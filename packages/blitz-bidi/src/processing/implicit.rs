//! Weak types, neutrals and implicit levels (W1-W7, N1-N2, I1-I2)
//!
//! A level run is scanned once. The property table folds classes into
//! reduced sequences, and each completed sequence is handed to
//! [`Resolver::process_property_seq`], which walks the mode's level table and
//! assigns levels. Isolating run sequences that are interrupted by an
//! isolate carry their scanner state across the gap in an [`IsolateState`].

use super::tables::{group_of, LevelRow, PropAction, Reduced, SeqAction, PROPS};
use super::Resolver;
use crate::flags::ClassFlags;
use crate::properties::{code_point_at, code_point_before};
use crate::types::{BidiClass, Level, ReorderingMode, LRM_AFTER, LRM_BEFORE, RLM_BEFORE};

/// Scanner state saved at an isolate initiator and restored at its PDI.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IsolateState {
    state_imp: u8,
    state: u8,
    start1: usize,
    start_on: isize,
}

/// Level table walker for one level run.
struct LevState {
    table: &'static [LevelRow],
    /// Start of the pending ON sequence, or -1.
    start_on: isize,
    /// Start of an EN/AN sequence following L: -1 none, -2 already marked.
    start_l2en: isize,
    last_strong_rtl: isize,
    run_start: usize,
    state: u8,
    run_level: Level,
}

impl LevState {
    #[inline]
    fn on_start(&self) -> usize {
        self.start_on.max(0) as usize
    }
}

impl Resolver<'_> {
    /// Set `level` on `start..limit`, skipping the content of isolates.
    fn set_levels_outside_isolates(&mut self, start: usize, limit: usize, level: Level) {
        let mut depth = 0usize;
        for k in start..limit {
            let class = self.classes[k];
            if class == BidiClass::PDI {
                depth = depth.saturating_sub(1);
            }
            if depth == 0 {
                self.levels[k] = level;
            }
            if matches!(class, BidiClass::LRI | BidiClass::RLI) {
                depth += 1;
            }
        }
    }

    /// Resolve the reduced sequence `prop` covering `start..limit`.
    fn process_property_seq(&mut self, lev: &mut LevState, prop: Reduced, start: usize, limit: usize) {
        let start0 = start;
        let mut start = start as isize;
        let old_state = lev.state as usize;
        let cell = lev.table[old_state].cells[prop as usize];
        lev.state = cell.state;
        let add_level = lev.table[lev.state as usize].add_level;

        match cell.action {
            SeqAction::None => {}
            SeqAction::StartOn => lev.start_on = start0 as isize,
            SeqAction::ResolveFromOn => {
                if lev.start_on >= 0 {
                    start = lev.start_on;
                }
            }
            SeqAction::RaiseOnByOne => {
                let level = lev.run_level + 1;
                self.set_levels_outside_isolates(lev.on_start(), start0, level);
            }
            SeqAction::RaiseOnByTwo => {
                let level = lev.run_level + 2;
                self.set_levels_outside_isolates(lev.on_start(), start0, level);
            }
            SeqAction::ConfirmAfterL => {
                if lev.start_l2en >= 0 {
                    self.insert_points.add(lev.start_l2en as usize, LRM_BEFORE);
                }
                lev.start_l2en = -1;
                if self.insert_points.has_tentative() {
                    // Undo the raise applied since the last strong R.
                    for k in (lev.last_strong_rtl + 1) as usize..start0 {
                        self.levels[k] = self.levels[k].wrapping_sub(2) & !1;
                    }
                    self.insert_points.confirm();
                } else {
                    let level = lev.table[old_state].add_level;
                    if level & 1 != 0 && lev.start_on > 0 {
                        start = lev.start_on;
                    }
                }
                lev.last_strong_rtl = -1;
                if prop == Reduced::S {
                    self.insert_points.add(start0, LRM_BEFORE);
                    self.insert_points.confirm();
                }
            }
            SeqAction::RetractAtR => {
                self.insert_points.retract();
                lev.start_on = -1;
                lev.start_l2en = -1;
                lev.last_strong_rtl = limit as isize - 1;
            }
            SeqAction::TrackNumberAfterL => {
                if prop == Reduced::AN
                    && self.classes.get(start0) == Some(&BidiClass::AN)
                    && self.mode != ReorderingMode::InverseForNumbersSpecial
                {
                    if lev.start_l2en == -1 {
                        lev.last_strong_rtl = limit as isize - 1;
                    } else {
                        if lev.start_l2en >= 0 {
                            self.insert_points.add(lev.start_l2en as usize, LRM_BEFORE);
                            lev.start_l2en = -2;
                        }
                        self.insert_points.add(start0, LRM_BEFORE);
                    }
                } else if lev.start_l2en == -1 {
                    lev.start_l2en = start0 as isize;
                }
            }
            SeqAction::RememberStrongR => {
                lev.last_strong_rtl = limit as isize - 1;
                lev.start_on = -1;
            }
            SeqAction::RlmBeforeOn => {
                if let Some(k) = (0..start0).rev().find(|&k| self.levels[k] & 1 != 0) {
                    self.insert_points.add(k, RLM_BEFORE);
                    self.insert_points.confirm();
                }
                lev.start_on = start0 as isize;
            }
            SeqAction::LrmAroundNumber => {
                self.insert_points.add(start0, LRM_BEFORE);
                self.insert_points.add(start0, LRM_AFTER);
            }
            SeqAction::RetractBeforeS => {
                self.insert_points.retract();
                if prop == Reduced::S {
                    self.insert_points.add(start0, RLM_BEFORE);
                    self.insert_points.confirm();
                }
            }
            SeqAction::RaiseOnToLevel => {
                let level = lev.run_level + add_level;
                for k in lev.on_start()..start0 {
                    if self.levels[k] < level {
                        self.levels[k] = level;
                    }
                }
                self.insert_points.confirm();
                lev.start_on = start0 as isize;
            }
            SeqAction::UnwindLevels => {
                let level = lev.run_level;
                let mut k = start0 as isize - 1;
                while k >= lev.start_on && k >= 0 {
                    if self.levels[k as usize] == level + 3 {
                        while k >= 0 && self.levels[k as usize] == level + 3 {
                            self.levels[k as usize] -= 2;
                            k -= 1;
                        }
                        while k >= 0 && self.levels[k as usize] == level {
                            k -= 1;
                        }
                        if k < 0 {
                            break;
                        }
                    }
                    let at = k as usize;
                    self.levels[at] = if self.levels[at] == level + 2 { level } else { level + 1 };
                    k -= 1;
                }
            }
            SeqAction::LowerOn => {
                let level = lev.run_level + 1;
                for k in (lev.on_start()..start0).rev() {
                    if self.levels[k] > level {
                        self.levels[k] -= 2;
                    }
                }
            }
        }

        if add_level != 0 || start < start0 as isize {
            let level = lev.run_level + add_level;
            let start = start.max(0) as usize;
            if start >= lev.run_start {
                self.levels[start..limit].fill(level);
            } else {
                self.set_levels_outside_isolates(start, limit, level);
            }
        }
    }

    /// Direction of the strong character closest to the end of the
    /// prologue's last paragraph.
    fn last_strong_of_prologue(&self, prologue: &[u16]) -> Reduced {
        let mut i = prologue.len();
        while i > 0 {
            let (c, units) = code_point_before(prologue, i);
            i -= units;
            match self.lookup.class_of(c) {
                BidiClass::L => return Reduced::L,
                BidiClass::R | BidiClass::AL => return Reduced::R,
                BidiClass::B => return Reduced::ON,
                _ => {}
            }
        }
        Reduced::ON
    }

    /// First strong character or number in the epilogue.
    fn first_strong_of_epilogue(&self, epilogue: &[u16]) -> Reduced {
        let mut i = 0;
        while i < epilogue.len() {
            let (c, units) = code_point_at(epilogue, i);
            i += units;
            match self.lookup.class_of(c) {
                BidiClass::L => return Reduced::L,
                BidiClass::R | BidiClass::AL => return Reduced::R,
                BidiClass::EN => return Reduced::EN,
                BidiClass::AN => return Reduced::AN,
                _ => {}
            }
        }
        Reduced::ON
    }

    /// Last index in `start..limit` that is not removed by X9, or `start`.
    fn last_kept(&self, start: usize, limit: usize) -> usize {
        let mut k = limit - 1;
        while k > start && ClassFlags::of(self.classes[k]).intersects(ClassFlags::MASK_BN_EXPLICIT) {
            k -= 1;
        }
        k
    }

    /// Resolve weak types, neutrals and implicit levels in the level run
    /// `start..limit`.
    pub(crate) fn resolve_implicit_levels(
        &mut self,
        start: usize,
        limit: usize,
        mut sor: Reduced,
        mut eor: Reduced,
    ) {
        let inverse_rtl = self.last_arabic_pos.is_some_and(|pos| start < pos)
            && self.para_level_at(start) & 1 != 0
            && self.mode.is_inverse_like_direct();
        let run_level = self.levels[start];
        let mut lev = LevState {
            table: self.table_pair.tables[(run_level & 1) as usize],
            start_on: -1,
            start_l2en: -1,
            last_strong_rtl: -1,
            run_start: start,
            state: 0,
            run_level,
        };

        if start == 0 {
            if let Some(prologue) = self.prologue {
                let last_strong = self.last_strong_of_prologue(prologue);
                if last_strong != Reduced::ON {
                    sor = last_strong;
                }
            }
        }

        let resumed = if self.classes[start] == BidiClass::PDI {
            self.isolates.pop()
        } else {
            None
        };
        let (mut start1, mut state_imp) = match resumed {
            Some(saved) => {
                lev.start_on = saved.start_on;
                lev.state = saved.state;
                (saved.start1, saved.state_imp)
            }
            None => {
                let state_imp = if self.classes[start] == BidiClass::NSM {
                    1 + sor as u8
                } else {
                    0
                };
                self.process_property_seq(&mut lev, sor, start, start);
                (start, state_imp)
            }
        };
        let mut start2 = start;
        let mut next_strong = BidiClass::R;
        let mut next_strong_pos = None;

        for i in start..=limit {
            let group = if i >= limit {
                let k = self.last_kept(start, limit);
                if matches!(self.classes[k], BidiClass::LRI | BidiClass::RLI) {
                    break;
                }
                eor as usize
            } else {
                let mut class = self.classes[i];
                if class == BidiClass::B {
                    self.isolates.clear();
                }
                if inverse_rtl {
                    if class == BidiClass::AL {
                        class = BidiClass::R;
                    } else if class == BidiClass::EN {
                        if next_strong_pos.is_none_or(|pos| pos <= i) {
                            next_strong = BidiClass::R;
                            next_strong_pos = Some(limit);
                            if let Some(j) = (i + 1..limit).find(|&j| self.classes[j].is_strong()) {
                                next_strong = self.classes[j];
                                next_strong_pos = Some(j);
                            }
                        }
                        if next_strong == BidiClass::AL {
                            class = BidiClass::AN;
                        }
                    }
                }
                group_of(class)
            };

            let old_state = state_imp as usize;
            let cell = PROPS[old_state].cells[group];
            state_imp = cell.state;
            let action = if i == limit && cell.action == PropAction::None {
                PropAction::Flush
            } else {
                cell.action
            };
            let result = PROPS[old_state].result;
            match action {
                PropAction::None => {}
                PropAction::Flush => {
                    self.process_property_seq(&mut lev, result, start1, i);
                    start1 = i;
                }
                PropAction::MarkSecond => start2 = i,
                PropAction::FlushBoth => {
                    self.process_property_seq(&mut lev, result, start1, start2);
                    self.process_property_seq(&mut lev, Reduced::ON, start2, i);
                    start1 = i;
                }
                PropAction::FlushShift => {
                    self.process_property_seq(&mut lev, result, start1, start2);
                    start1 = start2;
                    start2 = i;
                }
            }
        }

        if limit == self.length {
            if let Some(epilogue) = self.epilogue {
                let first_strong = self.first_strong_of_epilogue(epilogue);
                if first_strong != Reduced::ON {
                    eor = first_strong;
                }
            }
        }

        let last = self.last_kept(start, limit);
        if matches!(self.classes[last], BidiClass::LRI | BidiClass::RLI) && limit < self.length {
            self.isolates.push(IsolateState {
                state_imp,
                state: lev.state,
                start1,
                start_on: lev.start_on,
            });
        } else {
            self.process_property_seq(&mut lev, eor, limit, limit);
        }
    }
}
