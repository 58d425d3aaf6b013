//! Paired bracket resolution (rule N0)
//!
//! Runs alongside the explicit pass. Each isolating run sequence keeps a
//! list of pending opening brackets; a closing bracket that matches one of
//! them resolves both to L or R. A pair resolved only from the context
//! before it is unstable: a later strong type inside an enclosing pair may
//! still flip it.

use arrayvec::ArrayVec;

use crate::error::{reserve, Result};
use crate::properties::{BidiProperties, BracketKind};
use crate::types::{no_override, BidiClass, Level, LEVEL_OVERRIDE, MAX_EXPLICIT_LEVEL};

const MAX_ISO_RUNS: usize = MAX_EXPLICIT_LEVEL as usize + 2;

const FOUND_L: u8 = 1;
const FOUND_R: u8 = 2;

#[inline]
fn found_flag(strong: BidiClass) -> u8 {
    if strong == BidiClass::L { FOUND_L } else { FOUND_R }
}

/// State of an opening bracket's search for its partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closing {
    /// Waiting for this closing code unit.
    Expect(u16),
    /// No longer eligible for matching.
    Invalid,
    /// Matched at this position, but the resolution may still change.
    Unstable(usize),
}

#[derive(Debug, Clone, Copy)]
struct Opening {
    position: usize,
    closing: Closing,
    context_dir: BidiClass,
    context_pos: usize,
    flags: u8,
}

/// One isolating run sequence; `start..limit` indexes its openings.
#[derive(Debug, Clone, Copy)]
struct IsoRun {
    start: usize,
    limit: usize,
    level: Level,
    last_strong: BidiClass,
    last_base: BidiClass,
    context_dir: BidiClass,
    context_pos: usize,
}

impl IsoRun {
    fn reset(&mut self, level: Level, context_level: Level, context_pos: usize) {
        let dir = BidiClass::from_level_parity(context_level);
        self.level = level;
        self.last_strong = dir;
        self.last_base = dir;
        self.context_dir = dir;
        self.context_pos = context_pos;
    }
}

#[inline]
fn top(runs: &mut ArrayVec<IsoRun, MAX_ISO_RUNS>) -> &mut IsoRun {
    let last = runs.len() - 1;
    &mut runs[last]
}

pub(crate) struct BracketMatcher<'a> {
    properties: &'a dyn BidiProperties,
    iso_runs: ArrayVec<IsoRun, MAX_ISO_RUNS>,
    openings: Vec<Opening>,
    numbers_special: bool,
}

impl<'a> BracketMatcher<'a> {
    pub fn new(properties: &'a dyn BidiProperties, para_level: Level, numbers_special: bool) -> Self {
        let mut iso_runs = ArrayVec::new();
        let mut first = IsoRun {
            start: 0,
            limit: 0,
            level: para_level,
            last_strong: BidiClass::L,
            last_base: BidiClass::L,
            context_dir: BidiClass::L,
            context_pos: 0,
        };
        first.reset(para_level, para_level, 0);
        iso_runs.push(first);
        Self {
            properties,
            iso_runs,
            openings: Vec::new(),
            numbers_special,
        }
    }

    fn last_run(&mut self) -> &mut IsoRun {
        top(&mut self.iso_runs)
    }

    /// A block separator starts a new paragraph at `level`.
    pub fn process_b(&mut self, level: Level) {
        self.iso_runs.truncate(1);
        let run = &mut self.iso_runs[0];
        run.limit = 0;
        run.reset(level, level, 0);
    }

    /// The embedding level changed outside of an isolate boundary.
    pub fn process_boundary(
        &mut self,
        classes: &[BidiClass],
        last_cc_pos: usize,
        context_level: Level,
        embedding_level: Level,
    ) {
        if classes[last_cc_pos].is_isolate_control() {
            return;
        }
        let context_level = if no_override(embedding_level) > no_override(context_level) {
            embedding_level
        } else {
            context_level
        };
        let run = self.last_run();
        run.limit = run.start;
        run.reset(embedding_level, context_level, last_cc_pos);
    }

    /// A valid LRI or RLI opens a nested sequence at `level`.
    pub fn process_isolate_start(&mut self, level: Level) {
        let outer = self.last_run();
        outer.last_base = BidiClass::ON;
        let start = outer.limit;
        let mut inner = IsoRun {
            start,
            limit: start,
            ..*outer
        };
        inner.reset(level, level, 0);
        self.iso_runs.push(inner);
    }

    /// A PDI closes the innermost isolate.
    pub fn process_pdi(&mut self) {
        if self.iso_runs.len() > 1 {
            self.iso_runs.pop();
        }
        self.last_run().last_base = BidiClass::ON;
    }

    fn add_opening(&mut self, expect: u16, position: usize) -> Result<()> {
        let run = self.iso_runs[self.iso_runs.len() - 1];
        self.openings.truncate(run.limit);
        reserve(&mut self.openings, 1, "bracket openings")?;
        self.openings.push(Opening {
            position,
            closing: Closing::Expect(expect),
            context_dir: run.context_dir,
            context_pos: run.context_pos,
            flags: 0,
        });
        self.last_run().limit += 1;
        Ok(())
    }

    /// Propagate `new_prop` into unstable pairs enclosed by the opening at
    /// `opening_index`, following every pair that flips in turn.
    fn fix_enclosed(
        &mut self,
        classes: &mut [BidiClass],
        opening_index: usize,
        position: usize,
        new_prop: BidiClass,
    ) {
        let limit = self.iso_runs[self.iso_runs.len() - 1].limit;
        // Each frame is (next opening to inspect, position that changed).
        let mut frames = vec![(opening_index + 1, position)];
        while let Some((k, changed)) = frames.pop() {
            if k >= limit {
                continue;
            }
            let opening = &mut self.openings[k];
            let closing = match opening.closing {
                Closing::Unstable(closing) => closing,
                _ => {
                    frames.push((k + 1, changed));
                    continue;
                }
            };
            if changed < opening.context_pos {
                continue;
            }
            if changed >= opening.position {
                frames.push((k + 1, changed));
                continue;
            }
            if new_prop == opening.context_dir {
                continue;
            }
            let open_pos = opening.position;
            classes[open_pos] = new_prop;
            classes[closing] = new_prop;
            opening.closing = Closing::Invalid;
            // Resume this scan after both nested fixes have run.
            frames.push((k + 1, changed));
            frames.push((k + 1, closing));
            frames.push((k + 1, open_pos));
        }
    }

    /// Resolve the pair opened at `open_index` and closed at `position`.
    /// Returns ON when nothing strong was found between them.
    fn process_closing(
        &mut self,
        classes: &mut [BidiClass],
        open_index: usize,
        position: usize,
    ) -> BidiClass {
        let run = self.iso_runs[self.iso_runs.len() - 1];
        let opening = self.openings[open_index];
        let direction = BidiClass::from_level_parity(run.level);
        let found_same = if direction == BidiClass::L { FOUND_L } else { FOUND_R };
        let mut stable = true;

        let new_prop = if opening.flags & found_same != 0 {
            // N0b: a strong type matching the embedding direction.
            direction
        } else if opening.flags & (FOUND_L | FOUND_R) != 0 {
            // N0c: only the opposite direction inside, use the context.
            stable = open_index == run.start;
            opening.context_dir
        } else {
            // N0d: nothing strong inside; forget the enclosed pairs.
            self.last_run().limit = open_index;
            return BidiClass::ON;
        };

        classes[opening.position] = new_prop;
        classes[position] = new_prop;
        self.fix_enclosed(classes, open_index, opening.position, new_prop);

        if stable {
            let start = run.start;
            let mut limit = open_index;
            while limit > start && self.openings[limit - 1].position == opening.position {
                limit -= 1;
            }
            self.last_run().limit = limit;
        } else {
            self.openings[open_index].closing = Closing::Unstable(position);
            let mut k = open_index;
            while k > run.start && self.openings[k - 1].position == opening.position {
                k -= 1;
                self.openings[k].closing = Closing::Invalid;
            }
            // Openings nested inside this pair can no longer match.
            for inner in &mut self.openings[open_index + 1..run.limit] {
                if inner.position >= position {
                    break;
                }
                if matches!(inner.closing, Closing::Expect(_)) {
                    inner.closing = Closing::Invalid;
                }
            }
        }
        new_prop
    }

    /// Feed the character at `position` to the matcher.
    pub fn process_char(
        &mut self,
        position: usize,
        text: &[u16],
        classes: &mut [BidiClass],
        levels: &mut [Level],
    ) -> Result<()> {
        let class = classes[position];
        if class == BidiClass::ON {
            let mut unit = text[position];
            let run = self.iso_runs[self.iso_runs.len() - 1];
            for index in (run.start..run.limit).rev() {
                if self.openings[index].closing != Closing::Expect(unit) {
                    continue;
                }
                let new_prop = self.process_closing(classes, index, position);
                if new_prop == BidiClass::ON {
                    // Not a valid closing, and not an opening either.
                    unit = 0;
                    break;
                }
                let run = top(&mut self.iso_runs);
                run.last_base = BidiClass::ON;
                run.context_dir = new_prop;
                run.context_pos = position;
                let level = levels[position];
                if level & LEVEL_OVERRIDE != 0 {
                    let strong = BidiClass::from_level_parity(level);
                    run.last_strong = strong;
                    let flag = found_flag(strong);
                    let start = run.start;
                    for opening in &mut self.openings[start..index] {
                        opening.flags |= flag;
                    }
                    levels[position] &= !LEVEL_OVERRIDE;
                }
                let open_pos = self.openings[index].position;
                levels[open_pos] &= !LEVEL_OVERRIDE;
                return Ok(());
            }

            if unit != 0 {
                if let Some(bracket) = self.properties.paired_bracket(unit as u32) {
                    if bracket.kind == BracketKind::Open && bracket.pair != unit as u32 {
                        // The two angle bracket pairs are canonically equivalent.
                        match bracket.pair {
                            0x232a => self.add_opening(0x3009, position)?,
                            0x3009 => self.add_opening(0x232a, position)?,
                            _ => {}
                        }
                        self.add_opening(bracket.pair as u16, position)?;
                    }
                }
            }
        }

        let numbers_special = self.numbers_special;
        let level = levels[position];
        let run = top(&mut self.iso_runs);
        let new_prop = if level & LEVEL_OVERRIDE != 0 {
            let strong = BidiClass::from_level_parity(level);
            if !matches!(class, BidiClass::S | BidiClass::WS | BidiClass::ON) {
                classes[position] = strong;
            }
            run.last_base = strong;
            run.last_strong = strong;
            run.context_dir = strong;
            run.context_pos = position;
            strong
        } else {
            match class {
                BidiClass::L | BidiClass::R | BidiClass::AL => {
                    run.last_base = class;
                    run.last_strong = class;
                    run.context_dir = class.dir_from_strong();
                    run.context_pos = position;
                    class.dir_from_strong()
                }
                BidiClass::EN => {
                    run.last_base = BidiClass::EN;
                    run.context_pos = position;
                    if run.last_strong == BidiClass::L {
                        if !numbers_special {
                            classes[position] = BidiClass::ENL;
                        }
                        run.context_dir = BidiClass::L;
                        BidiClass::L
                    } else {
                        classes[position] = if run.last_strong == BidiClass::AL {
                            BidiClass::AN
                        } else {
                            BidiClass::ENR
                        };
                        run.context_dir = BidiClass::R;
                        BidiClass::R
                    }
                }
                BidiClass::AN => {
                    run.last_base = BidiClass::AN;
                    run.context_dir = BidiClass::R;
                    run.context_pos = position;
                    BidiClass::R
                }
                BidiClass::NSM => {
                    // Takes the class of its base.
                    let base = run.last_base;
                    if base == BidiClass::ON {
                        classes[position] = base;
                    }
                    base
                }
                other => {
                    run.last_base = other;
                    other
                }
            }
        };

        if new_prop.is_strong() {
            let flag = found_flag(new_prop.dir_from_strong());
            let (start, limit) = (run.start, run.limit);
            for opening in &mut self.openings[start..limit] {
                if position > opening.position {
                    opening.flags |= flag;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::UnicodeProperties;

    fn run_matcher(text: &str, classes: &mut [BidiClass], level: Level) {
        let units: Vec<u16> = text.encode_utf16().collect();
        let mut levels = vec![level; units.len()];
        let mut matcher = BracketMatcher::new(&UnicodeProperties, level, false);
        for position in 0..units.len() {
            matcher
                .process_char(position, &units, classes, &mut levels)
                .unwrap();
        }
    }

    #[test]
    fn test_pair_takes_embedding_direction() {
        use BidiClass::*;
        // "a(b)c" at level 0: both brackets become L.
        let mut classes = [L, ON, L, ON, L];
        run_matcher("a(b)c", &mut classes, 0);
        assert_eq!(classes, [L, L, L, L, L]);
    }

    #[test]
    fn test_pair_takes_context_when_only_opposite_inside() {
        use BidiClass::*;
        // R ( R ) at level 0: opposite strong inside, context R.
        let mut classes = [R, ON, R, ON];
        run_matcher("\u{05d0}(\u{05d1})", &mut classes, 0);
        assert_eq!(classes, [R, R, R, R]);
    }

    #[test]
    fn test_pair_without_strong_stays_neutral() {
        use BidiClass::*;
        let mut classes = [L, ON, WS, ON];
        run_matcher("a( )", &mut classes, 0);
        assert_eq!(classes, [L, ON, WS, ON]);
    }

    #[test]
    fn test_mismatched_closing_is_ignored() {
        use BidiClass::*;
        let mut classes = [ON, L, ON];
        run_matcher("(a]", &mut classes, 0);
        assert_eq!(classes, [ON, L, ON]);
    }

    #[test]
    fn test_canonical_angle_brackets_match() {
        use BidiClass::*;
        let mut classes = [ON, R, ON];
        run_matcher("\u{2329}\u{05d0}\u{3009}", &mut classes, 1);
        assert_eq!(classes, [R, R, R]);
    }

    #[test]
    fn test_numbers_after_strong_are_tagged() {
        use BidiClass::*;
        let mut classes = [L, EN, AL, EN, R, EN];
        run_matcher("a1\u{0627}1\u{05d0}1", &mut classes, 0);
        assert_eq!(classes, [L, ENL, AL, AN, R, ENR]);
    }

    #[test]
    fn test_isolate_hides_outer_openings() {
        let mut matcher = BracketMatcher::new(&UnicodeProperties, 0, false);
        let units: Vec<u16> = "(".encode_utf16().collect();
        let mut classes = [BidiClass::ON];
        let mut levels = [0u8];
        matcher.process_char(0, &units, &mut classes, &mut levels).unwrap();
        matcher.process_isolate_start(2);
        let run = matcher.iso_runs[1];
        assert_eq!((run.start, run.limit), (1, 1));
        matcher.process_pdi();
        assert_eq!(matcher.iso_runs.len(), 1);
        assert_eq!(matcher.iso_runs[0].limit, 1);
    }
}
