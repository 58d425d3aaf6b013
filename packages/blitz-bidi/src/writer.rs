//! Reordered text output
//!
//! Runs are written in visual order: even runs forward, odd runs reversed
//! by code point. Options add mirroring, control removal, LRM/RLM marks
//! around runs and a fully reversed output.

use unicode_normalization::char::is_combining_mark;

use crate::error::{reserve, Result};
use crate::flags::{ClassFlags, ReorderingOptions, WriteOptions};
use crate::properties::{code_point_at, code_point_before, push_code_point, BidiProperties};
use crate::types::{
    is_bidi_control_char, BidiClass, ReorderingMode, LRM_AFTER, LRM_BEFORE, LRM_CHAR, RLM_AFTER,
    RLM_BEFORE, RLM_CHAR,
};
use crate::view::View;

/// Reconcile write options with the options the text was resolved with.
fn effective_options(view: &View<'_>, mut options: WriteOptions) -> WriteOptions {
    if view.options.contains(ReorderingOptions::INSERT_MARKS) {
        options |= WriteOptions::INSERT_LRM_FOR_NUMERIC;
        options -= WriteOptions::REMOVE_BIDI_CONTROLS;
    }
    if view.options.contains(ReorderingOptions::REMOVE_CONTROLS) {
        options |= WriteOptions::REMOVE_BIDI_CONTROLS;
        options -= WriteOptions::INSERT_LRM_FOR_NUMERIC;
    }
    if !view.mode.is_inverse() && view.mode != ReorderingMode::RunsOnly {
        options -= WriteOptions::INSERT_LRM_FOR_NUMERIC;
    }
    options
}

fn is_control(c: u32) -> bool {
    is_bidi_control_char(c)
}

fn is_combining(c: u32) -> bool {
    char::from_u32(c).is_some_and(is_combining_mark)
}

fn mirrored(properties: &dyn BidiProperties, c: u32) -> u32 {
    properties.mirror(c).unwrap_or(c)
}

/// Copy `src` in logical order.
fn write_forward(
    src: &[u16],
    options: WriteOptions,
    properties: &dyn BidiProperties,
    out: &mut Vec<u16>,
) {
    let mirror = options.contains(WriteOptions::DO_MIRRORING);
    let remove = options.contains(WriteOptions::REMOVE_BIDI_CONTROLS);
    match (mirror, remove) {
        (false, false) => out.extend_from_slice(src),
        (false, true) => out.extend(
            src.iter()
                .copied()
                .filter(|&unit| !is_control(u32::from(unit))),
        ),
        _ => {
            let mut i = 0;
            while i < src.len() {
                let (c, units) = code_point_at(src, i);
                i += units;
                if remove && is_control(c) {
                    continue;
                }
                push_code_point(out, mirrored(properties, c));
            }
        }
    }
}

/// Copy `src` reversed by code point, keeping surrogate pairs intact and,
/// with KEEP_BASE_COMBINING, combining marks after their base.
fn write_backward(
    src: &[u16],
    options: WriteOptions,
    properties: &dyn BidiProperties,
    out: &mut Vec<u16>,
) {
    let mirror = options.contains(WriteOptions::DO_MIRRORING);
    let remove = options.contains(WriteOptions::REMOVE_BIDI_CONTROLS);
    let keep_base = options.contains(WriteOptions::KEEP_BASE_COMBINING);

    let mut limit = src.len();
    while limit > 0 {
        let (c, units) = code_point_before(src, limit);
        let mut start = limit - units;
        if keep_base && is_combining(c) {
            // Back up over the whole combining sequence and its base.
            while start > 0 {
                let (prev, units) = code_point_before(src, start);
                start -= units;
                if !is_combining(prev) {
                    break;
                }
            }
        }

        if !mirror && !remove {
            out.extend_from_slice(&src[start..limit]);
        } else {
            let mut i = start;
            let mut first = true;
            while i < limit {
                let (c, units) = code_point_at(src, i);
                i += units;
                if remove && is_control(c) {
                    continue;
                }
                // Only the base of a sequence is mirrored.
                let c = if mirror && first { mirrored(properties, c) } else { c };
                first = false;
                push_code_point(out, c);
            }
        }
        limit = start;
    }
}

/// Reverse `src` by code point under the write options.
///
/// Works on any text without resolving it first; mirroring uses the
/// default property data.
pub fn write_reverse(src: &[u16], options: WriteOptions) -> Vec<u16> {
    let mut out = Vec::with_capacity(src.len());
    write_backward(src, options, &crate::properties::UnicodeProperties, &mut out);
    out
}

impl View<'_> {
    fn is_l_at(&self, index: usize) -> bool {
        self.classes.get(index) == Some(&BidiClass::L)
    }

    fn is_r_al_at(&self, index: usize) -> bool {
        self.classes
            .get(index)
            .is_some_and(|&class| ClassFlags::MASK_R_AL.has(class))
    }

    /// Text in visual order with `options` applied.
    pub fn write_reordered(&self, options: WriteOptions) -> Result<Vec<u16>> {
        let mut out = Vec::new();
        if self.length == 0 {
            return Ok(out);
        }
        let options = effective_options(self, options);
        reserve(&mut out, self.result_length.max(self.length), "reordered text")?;
        let forward_options = options - WriteOptions::KEEP_BASE_COMBINING;
        let text = &self.text[..self.length];
        let properties = self.properties;
        let insert_marks = options.contains(WriteOptions::INSERT_LRM_FOR_NUMERIC);
        let is_inverse = self.mode == ReorderingMode::InverseNumbersAsL;

        if !options.contains(WriteOptions::OUTPUT_REVERSE) {
            for index in 0..self.runs.len() {
                let run = self.visual_run(index)?;
                let src = &text[run.start..run.limit];
                if !insert_marks {
                    if run.is_even_run() {
                        write_forward(src, forward_options, properties, &mut out);
                    } else {
                        write_backward(src, options, properties, &mut out);
                    }
                    continue;
                }

                let mut mark = self.runs[index].insert_remove.max(0);
                if run.is_even_run() {
                    if is_inverse && !self.is_l_at(run.start) {
                        mark |= LRM_BEFORE;
                    }
                    push_mark(&mut out, mark, LRM_BEFORE, RLM_BEFORE);
                    write_forward(src, forward_options, properties, &mut out);
                    if is_inverse && !self.is_l_at(run.limit - 1) {
                        mark |= LRM_AFTER;
                    }
                    push_mark(&mut out, mark, LRM_AFTER, RLM_AFTER);
                } else {
                    if is_inverse && !self.is_r_al_at(run.limit - 1) {
                        mark |= RLM_BEFORE;
                    }
                    push_mark(&mut out, mark, LRM_BEFORE, RLM_BEFORE);
                    write_backward(src, options, properties, &mut out);
                    if is_inverse && !self.is_r_al_at(run.start) {
                        mark |= RLM_AFTER;
                    }
                    push_mark(&mut out, mark, LRM_AFTER, RLM_AFTER);
                }
            }
        } else {
            let reverse_options = options - WriteOptions::DO_MIRRORING;
            for index in (0..self.runs.len()).rev() {
                let run = self.visual_run(index)?;
                let src = &text[run.start..run.limit];
                if run.is_even_run() {
                    if insert_marks && !self.is_l_at(run.limit - 1) {
                        out.push(LRM_CHAR);
                    }
                    write_backward(src, reverse_options, properties, &mut out);
                    if insert_marks && !self.is_l_at(run.start) {
                        out.push(LRM_CHAR);
                    }
                } else {
                    if insert_marks && !self.is_r_al_at(run.start) {
                        out.push(RLM_CHAR);
                    }
                    write_forward(src, forward_options, properties, &mut out);
                    if insert_marks && !self.is_r_al_at(run.limit - 1) {
                        out.push(RLM_CHAR);
                    }
                }
            }
        }
        Ok(out)
    }
}

#[inline]
fn push_mark(out: &mut Vec<u16>, mark: i32, lrm: i32, rlm: i32) {
    if mark & lrm != 0 {
        out.push(LRM_CHAR);
    } else if mark & rlm != 0 {
        out.push(RLM_CHAR);
    }
}
