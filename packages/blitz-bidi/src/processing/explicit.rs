//! Explicit levels (rules X1 through X9)
//!
//! Computes embedding levels from the embedding, override and isolate
//! controls, or validates caller-supplied levels. Paired brackets are
//! matched in the same pass since bracket pairs must not cross isolating
//! run sequences.

use arrayvec::ArrayVec;

use super::brackets::BracketMatcher;
use super::Resolver;
use crate::error::{BidiError, Result};
use crate::flags::ClassFlags;
use crate::types::{no_override, BidiClass, Direction, Level, LEVEL_OVERRIDE, MAX_EXPLICIT_LEVEL};

const CR: u16 = 0x000d;
const LF: u16 = 0x000a;

/// Marks a directional status entry pushed by an isolate initiator.
const ISOLATE: u16 = 0x0100;

const STACK_SIZE: usize = MAX_EXPLICIT_LEVEL as usize + 2;

#[inline]
fn next_even(level: Level) -> Level {
    level.wrapping_add(2) & !(LEVEL_OVERRIDE | 1)
}

#[inline]
fn next_odd(level: Level) -> Level {
    (no_override(level) + 1) | 1
}

impl Resolver<'_> {
    fn is_crlf_at(&self, i: usize) -> bool {
        self.text[i] == CR && self.text.get(i + 1) == Some(&LF)
    }

    fn fill_paragraph_levels(&mut self) {
        for index in 0..self.paragraphs.len() {
            let para = self.paragraphs[index];
            let limit = para.limit.min(self.length);
            self.levels[para.start..limit].fill(para.level);
        }
    }

    /// Resolve explicit levels and return the overall direction.
    pub(crate) fn resolve_explicit_levels(&mut self) -> Result<Direction> {
        self.isolate_count = 0;
        let direction = self.direction_from_flags();
        if direction != Direction::Mixed {
            self.fill_paragraph_levels();
            return Ok(direction);
        }
        if !self.mode.is_logical_to_visual() {
            // Inverse modes see no embeddings.
            self.fill_paragraph_levels();
            return Ok(direction);
        }

        let text = self.text;
        let length = self.length;
        let mut matcher = BracketMatcher::new(
            self.lookup.properties,
            self.para_level_at(0),
            self.mode.is_numbers_special(),
        );

        if !self
            .flags
            .intersects(ClassFlags::MASK_EXPLICIT | ClassFlags::MASK_ISO)
        {
            for index in 0..self.paragraphs.len() {
                let para = self.paragraphs[index];
                for i in para.start..para.limit.min(length) {
                    self.levels[i] = para.level;
                    match self.classes[i] {
                        BidiClass::BN => {}
                        BidiClass::B => {
                            if i + 1 < length && !self.is_crlf_at(i) {
                                matcher.process_b(self.para_level_at(i + 1));
                            }
                        }
                        _ => matcher.process_char(i, text, &mut self.classes, &mut self.levels)?,
                    }
                }
            }
            return Ok(direction);
        }

        let level = self.para_level_at(0);
        let mut embedding_level = level;
        let mut previous_level = level;
        let mut last_cc_pos = 0;
        let mut stack: ArrayVec<u16, STACK_SIZE> = ArrayVec::new();
        stack.push(level as u16);
        let mut overflow_isolates = 0usize;
        let mut overflow_embeddings = 0usize;
        let mut valid_isolates = 0usize;
        self.flags = ClassFlags::empty();

        for i in 0..length {
            let class = self.classes[i];
            match class {
                BidiClass::LRE | BidiClass::RLE | BidiClass::LRO | BidiClass::RLO => {
                    self.flags |= ClassFlags::BN;
                    self.levels[i] = previous_level;
                    let new_level = if matches!(class, BidiClass::LRE | BidiClass::LRO) {
                        next_even(embedding_level)
                    } else {
                        next_odd(embedding_level)
                    };
                    if new_level <= MAX_EXPLICIT_LEVEL
                        && overflow_isolates == 0
                        && overflow_embeddings == 0
                    {
                        last_cc_pos = i;
                        embedding_level = new_level;
                        if matches!(class, BidiClass::LRO | BidiClass::RLO) {
                            embedding_level |= LEVEL_OVERRIDE;
                        }
                        stack.push(embedding_level as u16);
                    } else if overflow_isolates == 0 {
                        overflow_embeddings += 1;
                    }
                }
                BidiClass::PDF => {
                    self.flags |= ClassFlags::BN;
                    self.levels[i] = previous_level;
                    if overflow_isolates > 0 {
                        continue;
                    }
                    if overflow_embeddings > 0 {
                        overflow_embeddings -= 1;
                        continue;
                    }
                    if stack.len() > 1 && stack.last().is_some_and(|&entry| entry < ISOLATE) {
                        last_cc_pos = i;
                        stack.pop();
                        embedding_level = stack.last().map_or(level, |&entry| entry as Level);
                    }
                }
                BidiClass::LRI | BidiClass::RLI => {
                    self.flags |= ClassFlags::ON | ClassFlags::lr(embedding_level);
                    self.levels[i] = no_override(embedding_level);
                    if no_override(embedding_level) != no_override(previous_level) {
                        matcher.process_boundary(
                            &self.classes,
                            last_cc_pos,
                            previous_level,
                            embedding_level,
                        );
                        self.flags |= ClassFlags::MULTI_RUNS;
                    }
                    previous_level = embedding_level;
                    let new_level = if class == BidiClass::LRI {
                        next_even(embedding_level)
                    } else {
                        next_odd(embedding_level)
                    };
                    if new_level <= MAX_EXPLICIT_LEVEL
                        && overflow_isolates == 0
                        && overflow_embeddings == 0
                    {
                        self.flags |= ClassFlags::of(class);
                        last_cc_pos = i;
                        valid_isolates += 1;
                        self.isolate_count = self.isolate_count.max(valid_isolates);
                        embedding_level = new_level;
                        stack.push(embedding_level as u16 + ISOLATE);
                        matcher.process_isolate_start(embedding_level);
                    } else {
                        self.classes[i] = BidiClass::WS;
                        overflow_isolates += 1;
                    }
                }
                BidiClass::PDI => {
                    if no_override(embedding_level) != no_override(previous_level) {
                        matcher.process_boundary(
                            &self.classes,
                            last_cc_pos,
                            previous_level,
                            embedding_level,
                        );
                        self.flags |= ClassFlags::MULTI_RUNS;
                    }
                    if overflow_isolates > 0 {
                        overflow_isolates -= 1;
                        self.classes[i] = BidiClass::WS;
                    } else if valid_isolates > 0 {
                        self.flags |= ClassFlags::PDI;
                        last_cc_pos = i;
                        overflow_embeddings = 0;
                        while stack.last().is_some_and(|&entry| entry < ISOLATE) {
                            stack.pop();
                        }
                        stack.pop();
                        valid_isolates -= 1;
                        matcher.process_pdi();
                    } else {
                        // Unmatched PDI.
                        self.classes[i] = BidiClass::WS;
                    }
                    embedding_level = stack.last().map_or(level, |&entry| (entry & !ISOLATE) as Level);
                    self.flags |= ClassFlags::ON | ClassFlags::lr(embedding_level);
                    previous_level = embedding_level;
                    self.levels[i] = no_override(embedding_level);
                }
                BidiClass::B => {
                    self.flags |= ClassFlags::B;
                    self.levels[i] = self.para_level_at(i);
                    if i + 1 < length && !self.is_crlf_at(i) {
                        overflow_embeddings = 0;
                        overflow_isolates = 0;
                        valid_isolates = 0;
                        embedding_level = self.para_level_at(i + 1);
                        previous_level = embedding_level;
                        stack.clear();
                        stack.push(embedding_level as u16);
                        matcher.process_b(embedding_level);
                    }
                }
                BidiClass::BN => {
                    self.levels[i] = previous_level;
                    self.flags |= ClassFlags::BN;
                }
                _ => {
                    if no_override(embedding_level) != no_override(previous_level) {
                        matcher.process_boundary(
                            &self.classes,
                            last_cc_pos,
                            previous_level,
                            embedding_level,
                        );
                        self.flags |= ClassFlags::MULTI_RUNS;
                        self.flags |= if embedding_level & LEVEL_OVERRIDE != 0 {
                            ClassFlags::override_(embedding_level)
                        } else {
                            ClassFlags::embedding(embedding_level)
                        };
                    }
                    previous_level = embedding_level;
                    self.levels[i] = embedding_level;
                    matcher.process_char(i, text, &mut self.classes, &mut self.levels)?;
                    self.flags |= ClassFlags::of(self.classes[i]);
                }
            }
        }

        if self.flags.intersects(ClassFlags::MASK_EMBEDDING) {
            self.flags |= ClassFlags::lr(self.para_level);
        }
        if self.order_paragraphs_ltr && self.flags.contains(ClassFlags::B) {
            self.flags |= ClassFlags::L;
        }
        log::trace!(
            "explicit pass: {} valid isolate level(s), flags {:?}",
            self.isolate_count,
            self.flags
        );
        Ok(self.direction_from_flags())
    }

    /// Validate caller-supplied embedding levels and derive the flags the
    /// later passes rely on.
    pub(crate) fn check_explicit_levels(&mut self) -> Result<Direction> {
        self.flags = ClassFlags::empty();
        self.isolate_count = 0;
        let mut open_isolates = 0usize;
        for i in 0..self.length {
            let class = self.classes[i];
            match class {
                BidiClass::LRI | BidiClass::RLI => {
                    open_isolates += 1;
                    self.isolate_count = self.isolate_count.max(open_isolates);
                }
                BidiClass::PDI => open_isolates = open_isolates.saturating_sub(1),
                BidiClass::B => open_isolates = 0,
                _ => {}
            }

            let raw = self.levels[i];
            let level = no_override(raw);
            if raw & LEVEL_OVERRIDE != 0 {
                self.flags |= ClassFlags::override_(level);
            } else {
                self.flags |= ClassFlags::embedding(level) | ClassFlags::of(class);
            }
            let below_paragraph = level < self.para_level_at(i) && !(level == 0 && class == BidiClass::B);
            if below_paragraph || level > MAX_EXPLICIT_LEVEL {
                return Err(BidiError::InvalidLevel { index: i, level });
            }
        }
        if self.flags.intersects(ClassFlags::MASK_EMBEDDING) {
            self.flags |= ClassFlags::lr(self.para_level);
        }
        Ok(self.direction_from_flags())
    }
}
