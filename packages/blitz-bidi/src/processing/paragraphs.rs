//! Paragraph splitting and class lookup
//!
//! One forward scan assigns every code unit its Bidi class, cuts the text
//! into paragraphs at block separators, detects each paragraph's base level
//! when asked to, and settles every FSI as LRI or RLI.

use arrayvec::ArrayVec;

use super::Resolver;
use crate::error::{reserve, Result};
use crate::flags::{ClassFlags, ReorderingOptions};
use crate::properties::code_point_at;
use crate::types::{is_bidi_control_char, BidiClass, ParagraphSpan, MAX_EXPLICIT_LEVEL};

const CR: u16 = 0x000d;
const LF: u16 = 0x000a;

/// Isolate frames tracked while looking for strong characters.
const MAX_TRACKED_ISOLATES: usize = MAX_EXPLICIT_LEVEL as usize + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Seek {
    NotSeeking,
    StrongForParagraph,
    StrongForFsi,
    LookingForPdi,
}

#[derive(Debug, Clone, Copy)]
struct IsolateFrame {
    start: usize,
    previous: Seek,
}

impl Resolver<'_> {
    /// Classify the text and split it into paragraphs.
    pub(crate) fn classify_paragraphs(&mut self) -> Result<()> {
        let text = self.text;
        let original_length = self.original_length;
        let streaming = self.options.contains(ReorderingOptions::STREAMING);
        let remove_controls = self.options.contains(ReorderingOptions::REMOVE_CONTROLS);
        let auto_level = self.auto_level;
        let inverse_auto = auto_level && self.mode.is_inverse_like_direct();
        let fallback_level = self.para_level & 1;

        reserve(&mut self.classes, original_length, "class array")?;
        self.classes.resize(original_length, BidiClass::ON);
        self.flags = ClassFlags::empty();
        self.last_arabic_pos = None;
        if streaming {
            self.length = 0;
        }

        let mut control_count = 0;
        let mut last_strong = BidiClass::ON;
        let mut frames: ArrayVec<IsolateFrame, MAX_TRACKED_ISOLATES> = ArrayVec::new();
        // Open isolates, including those too deep to track.
        let mut depth = 0usize;

        let (first_level, mut state) = if auto_level {
            last_strong = BidiClass::from_level_parity(fallback_level);
            match self.prologue.map(|prologue| self.first_strong_of_last_paragraph(prologue)) {
                Some(BidiClass::L) => (0, Seek::NotSeeking),
                Some(BidiClass::R | BidiClass::AL) => (1, Seek::NotSeeking),
                _ => (fallback_level, Seek::StrongForParagraph),
            }
        } else {
            (self.para_level, Seek::NotSeeking)
        };
        self.paragraphs.clear();
        self.paragraphs.push(ParagraphSpan {
            start: 0,
            limit: original_length,
            level: first_level,
        });

        let mut i = 0;
        while i < original_length {
            let (c, units) = code_point_at(text, i);
            let start = i;
            i += units;
            let class = self.lookup.class_of(c);
            self.flags |= ClassFlags::of(class);
            self.classes[i - 1] = class;
            if i - 1 > start {
                // Leading surrogate of a supplementary character.
                self.flags |= ClassFlags::BN;
                self.classes[start] = BidiClass::BN;
            }
            if remove_controls && is_bidi_control_char(c) {
                control_count += 1;
            }

            match class {
                BidiClass::L => {
                    match state {
                        Seek::StrongForParagraph => {
                            self.current_paragraph().level = 0;
                            state = Seek::NotSeeking;
                        }
                        Seek::StrongForFsi => {
                            if depth <= MAX_TRACKED_ISOLATES {
                                self.flags |= ClassFlags::LRI;
                            }
                            state = Seek::LookingForPdi;
                        }
                        _ => {}
                    }
                    last_strong = BidiClass::L;
                }
                BidiClass::R | BidiClass::AL => {
                    match state {
                        Seek::StrongForParagraph => {
                            self.current_paragraph().level = 1;
                            state = Seek::NotSeeking;
                        }
                        Seek::StrongForFsi => {
                            if let Some(frame) = frames.last().filter(|_| depth <= MAX_TRACKED_ISOLATES)
                            {
                                self.classes[frame.start] = BidiClass::RLI;
                                self.flags |= ClassFlags::RLI;
                            }
                            state = Seek::LookingForPdi;
                        }
                        _ => {}
                    }
                    last_strong = BidiClass::R;
                    if class == BidiClass::AL {
                        self.last_arabic_pos = Some(i - 1);
                    }
                }
                BidiClass::FSI | BidiClass::LRI | BidiClass::RLI => {
                    depth += 1;
                    if depth <= MAX_TRACKED_ISOLATES {
                        frames.push(IsolateFrame {
                            start: i - 1,
                            previous: state,
                        });
                    }
                    if class == BidiClass::FSI {
                        // Treated as LRI until a strong R or AL says otherwise.
                        self.classes[i - 1] = BidiClass::LRI;
                        state = Seek::StrongForFsi;
                    } else {
                        state = Seek::LookingForPdi;
                    }
                }
                BidiClass::PDI => {
                    if state == Seek::StrongForFsi && depth <= MAX_TRACKED_ISOLATES {
                        self.flags |= ClassFlags::LRI;
                    }
                    if depth > 0 {
                        if depth <= MAX_TRACKED_ISOLATES {
                            if let Some(frame) = frames.pop() {
                                state = frame.previous;
                            }
                        }
                        depth -= 1;
                    }
                }
                BidiClass::B => {
                    if i < original_length && c == CR as u32 && text[i] == LF {
                        continue;
                    }
                    let para = self.current_paragraph();
                    para.limit = i;
                    if inverse_auto && last_strong == BidiClass::R {
                        para.level = 1;
                    }
                    if streaming {
                        self.length = i;
                        self.control_count = control_count;
                    }
                    if i < original_length {
                        let level = if auto_level {
                            state = Seek::StrongForParagraph;
                            last_strong = BidiClass::from_level_parity(fallback_level);
                            fallback_level
                        } else {
                            state = Seek::NotSeeking;
                            self.para_level
                        };
                        reserve(&mut self.paragraphs, 1, "paragraph list")?;
                        self.paragraphs.push(ParagraphSpan {
                            start: i,
                            limit: original_length,
                            level,
                        });
                        depth = 0;
                        frames.clear();
                    }
                }
                _ => {}
            }
        }

        // An FSI left open at the end resolves to LRI.
        if depth > MAX_TRACKED_ISOLATES {
            depth = MAX_TRACKED_ISOLATES;
            state = Seek::StrongForFsi;
        }
        while depth > 0 {
            if state == Seek::StrongForFsi {
                self.flags |= ClassFlags::LRI;
                break;
            }
            if let Some(frame) = frames.get(depth - 1) {
                state = frame.previous;
            }
            depth -= 1;
        }

        if streaming {
            if self.length < original_length {
                self.paragraphs.pop();
            }
        } else {
            self.control_count = control_count;
        }
        if inverse_auto && last_strong == BidiClass::R {
            if let Some(last) = self.paragraphs.last_mut() {
                last.level = 1;
            }
        }
        if auto_level {
            if let Some(first) = self.paragraphs.first() {
                self.para_level = first.level;
            } else {
                self.para_level = fallback_level;
            }
        }
        for para in &self.paragraphs {
            self.flags |= ClassFlags::lr(para.level);
        }
        if self.order_paragraphs_ltr && self.flags.contains(ClassFlags::B) {
            self.flags |= ClassFlags::L;
        }

        self.classes.truncate(self.length);
        log::trace!(
            "classified {} of {} code units into {} paragraph(s)",
            self.length,
            original_length,
            self.paragraphs.len()
        );
        Ok(())
    }

    fn current_paragraph(&mut self) -> &mut ParagraphSpan {
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }

    /// First strong class after the last block separator of `prologue`, or
    /// ON when there is none.
    fn first_strong_of_last_paragraph(&self, prologue: &[u16]) -> BidiClass {
        let mut result = BidiClass::ON;
        let mut i = 0;
        while i < prologue.len() {
            let (c, units) = code_point_at(prologue, i);
            i += units;
            let class = self.lookup.class_of(c);
            if result == BidiClass::ON {
                if class.is_strong() {
                    result = class;
                }
            } else if class == BidiClass::B {
                result = BidiClass::ON;
            }
        }
        result
    }
}
