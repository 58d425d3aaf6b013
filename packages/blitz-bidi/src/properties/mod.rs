//! Character property oracles
//!
//! The engine reads three Unicode properties: Bidi_Class, the paired
//! bracket mapping and the mirroring glyph. [`BidiProperties`] bundles them
//! so callers can substitute their own data; [`UnicodeProperties`] is the
//! default backed by `unicode-bidi` and the tables in this module.
//! Per-call class overrides go through [`BidiClassifier`].

pub mod brackets;
pub mod mirror;

pub use brackets::{BracketKind, PairedBracket};

use crate::types::BidiClass;

/// Property lookups consumed by resolution and the writer.
pub trait BidiProperties: Send + Sync {
    /// Bidi_Class of a code point.
    fn bidi_class(&self, c: u32) -> BidiClass;

    /// Paired bracket of a code point, if it is one.
    fn paired_bracket(&self, c: u32) -> Option<PairedBracket>;

    /// Mirror image of a code point, if it has one.
    fn mirror(&self, c: u32) -> Option<u32>;
}

/// Default property data.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeProperties;

impl BidiProperties for UnicodeProperties {
    fn bidi_class(&self, c: u32) -> BidiClass {
        // Lone surrogates are not chars; they default to L like any
        // unassigned code point.
        char::from_u32(c)
            .map(|ch| BidiClass::from(unicode_bidi::bidi_class(ch)))
            .unwrap_or(BidiClass::L)
    }

    fn paired_bracket(&self, c: u32) -> Option<PairedBracket> {
        brackets::paired_bracket(c)
    }

    fn mirror(&self, c: u32) -> Option<u32> {
        mirror::mirror(c)
    }
}

/// Caller-supplied Bidi_Class override.
///
/// Returning `None` defers to the property oracle. Implemented for any
/// `Fn(u32) -> Option<BidiClass>`.
pub trait BidiClassifier {
    fn classify(&self, c: u32) -> Option<BidiClass>;
}

impl<F> BidiClassifier for F
where
    F: Fn(u32) -> Option<BidiClass>,
{
    fn classify(&self, c: u32) -> Option<BidiClass> {
        self(c)
    }
}

/// Class lookup honouring an optional override.
#[derive(Clone, Copy)]
pub(crate) struct ClassLookup<'a> {
    pub properties: &'a dyn BidiProperties,
    pub classifier: Option<&'a dyn BidiClassifier>,
}

impl<'a> ClassLookup<'a> {
    pub fn new(
        properties: &'a dyn BidiProperties,
        classifier: Option<&'a dyn BidiClassifier>,
    ) -> Self {
        Self {
            properties,
            classifier,
        }
    }

    /// Customized class: override first, then the oracle. The internal
    /// number subtypes are never valid input and read as ON.
    pub fn class_of(&self, c: u32) -> BidiClass {
        let class = self
            .classifier
            .and_then(|classifier| classifier.classify(c))
            .unwrap_or_else(|| self.properties.bidi_class(c));
        match class {
            BidiClass::ENL | BidiClass::ENR => BidiClass::ON,
            other => other,
        }
    }
}

/// Decode the code point starting at `i` and its length in code units.
#[inline]
pub(crate) fn code_point_at(text: &[u16], i: usize) -> (u32, usize) {
    let unit = text[i] as u32;
    if (0xd800..0xdc00).contains(&unit) && i + 1 < text.len() {
        let trail = text[i + 1] as u32;
        if (0xdc00..0xe000).contains(&trail) {
            return (0x10000 + ((unit - 0xd800) << 10) + (trail - 0xdc00), 2);
        }
    }
    (unit, 1)
}

/// Decode the code point ending just before `i` and its length in code units.
#[inline]
pub(crate) fn code_point_before(text: &[u16], i: usize) -> (u32, usize) {
    let unit = text[i - 1] as u32;
    if (0xdc00..0xe000).contains(&unit) && i >= 2 {
        let lead = text[i - 2] as u32;
        if (0xd800..0xdc00).contains(&lead) {
            return (0x10000 + ((lead - 0xd800) << 10) + (unit - 0xdc00), 2);
        }
    }
    (unit, 1)
}

/// Append `c` to `out` as UTF-16.
#[inline]
pub(crate) fn push_code_point(out: &mut Vec<u16>, c: u32) {
    match char::from_u32(c) {
        Some(ch) => {
            let mut buf = [0u16; 2];
            out.extend_from_slice(ch.encode_utf16(&mut buf));
        }
        // Unpaired surrogates pass through unchanged.
        None => out.push(c as u16),
    }
}
