//! Resolution entry point
//!
//! [`BidiEngine`] holds the settings that persist between calls and the
//! property oracle; each call to [`BidiEngine::resolve_request`] produces an
//! independent [`BidiParagraph`].

use std::sync::Arc;

use crate::config::{normalize_options, BidiConfig};
use crate::error::Result;
use crate::flags::ReorderingOptions;
use crate::paragraph::BidiParagraph;
use crate::processing::{resolve, ResolveInput};
use crate::properties::{BidiClassifier, BidiProperties, ClassLookup, UnicodeProperties};
use crate::types::{Level, ReorderingMode};

/// Text surrounding the paragraph being resolved.
///
/// The prologue can decide the base level and the direction at the start
/// of the text; the epilogue the direction at its end. Neither is part of
/// the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphContext<'a> {
    pub prologue: &'a [u16],
    pub epilogue: &'a [u16],
}

/// One resolve call's inputs.
#[derive(Clone, Copy)]
pub struct ResolveRequest<'a> {
    pub text: &'a [u16],
    /// Base level, or one of the `LEVEL_DEFAULT_*` sentinels.
    pub para_level: Level,
    /// Caller-supplied levels, one per code unit, optionally with the
    /// override bit.
    pub embedding_levels: Option<&'a [Level]>,
    pub context: ParagraphContext<'a>,
    pub classifier: Option<&'a dyn BidiClassifier>,
}

impl<'a> ResolveRequest<'a> {
    pub fn new(text: &'a [u16], para_level: Level) -> Self {
        Self {
            text,
            para_level,
            embedding_levels: None,
            context: ParagraphContext::default(),
            classifier: None,
        }
    }

    pub fn with_embedding_levels(mut self, levels: &'a [Level]) -> Self {
        self.embedding_levels = Some(levels);
        self
    }

    pub fn with_context(mut self, context: ParagraphContext<'a>) -> Self {
        self.context = context;
        self
    }

    pub fn with_classifier(mut self, classifier: &'a dyn BidiClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }
}

/// Bidi resolver with persistent settings.
#[derive(Clone)]
pub struct BidiEngine {
    config: BidiConfig,
    properties: Arc<dyn BidiProperties>,
}

impl std::fmt::Debug for BidiEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BidiEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for BidiEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BidiEngine {
    /// Engine with the default configuration and Unicode property data.
    pub fn new() -> Self {
        Self::with_config(BidiConfig::default())
    }

    pub fn with_config(mut config: BidiConfig) -> Self {
        config.reordering_options = normalize_options(config.reordering_options);
        Self {
            config,
            properties: Arc::new(UnicodeProperties),
        }
    }

    /// Replace the property oracle.
    pub fn with_properties(mut self, properties: Arc<dyn BidiProperties>) -> Self {
        self.properties = properties;
        self
    }

    pub fn config(&self) -> &BidiConfig {
        &self.config
    }

    pub fn set_reordering_mode(&mut self, mode: ReorderingMode) {
        self.config.reordering_mode = mode;
    }

    pub fn reordering_mode(&self) -> ReorderingMode {
        self.config.reordering_mode
    }

    /// Set the reordering options. REMOVE_CONTROLS cancels INSERT_MARKS.
    pub fn set_reordering_options(&mut self, options: ReorderingOptions) {
        self.config.set_reordering_options(options);
    }

    pub fn reordering_options(&self) -> ReorderingOptions {
        self.config.reordering_options
    }

    /// Switch between the default algorithm and the classic inverse one.
    pub fn set_inverse(&mut self, inverse: bool) {
        self.config.set_inverse(inverse);
    }

    pub fn is_inverse(&self) -> bool {
        self.config.is_inverse()
    }

    /// Give block separators level 0 so paragraphs stack left to right.
    pub fn order_paragraphs_ltr(&mut self, ordered: bool) {
        self.config.order_paragraphs_ltr = ordered;
    }

    pub fn is_order_paragraphs_ltr(&self) -> bool {
        self.config.order_paragraphs_ltr
    }

    /// Resolve `text` at `para_level` with no context or overrides.
    pub fn resolve(&self, text: &[u16], para_level: Level) -> Result<BidiParagraph> {
        self.resolve_request(ResolveRequest::new(text, para_level))
    }

    /// Resolve a Rust string, converted to UTF-16 first.
    pub fn resolve_str(&self, text: &str, para_level: Level) -> Result<BidiParagraph> {
        let units: Vec<u16> = text.encode_utf16().collect();
        self.resolve(&units, para_level)
    }

    pub fn resolve_request(&self, request: ResolveRequest<'_>) -> Result<BidiParagraph> {
        let resolved = resolve(ResolveInput {
            text: request.text,
            para_level: request.para_level,
            embedding_levels: request.embedding_levels,
            prologue: request.context.prologue,
            epilogue: request.context.epilogue,
            lookup: ClassLookup::new(&*self.properties, request.classifier),
            mode: self.config.reordering_mode,
            options: self.config.reordering_options,
            order_paragraphs_ltr: self.config.order_paragraphs_ltr,
        })?;
        Ok(BidiParagraph::new(resolved, Arc::clone(&self.properties)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BidiClass, Direction, LEVEL_DEFAULT_LTR, LEVEL_DEFAULT_RTL};

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn test_default_level_detection() {
        let engine = BidiEngine::new();
        let para = engine.resolve_str("\u{05d0}bc", LEVEL_DEFAULT_LTR).unwrap();
        assert_eq!(para.para_level(), 1);
        let para = engine.resolve_str("123", LEVEL_DEFAULT_RTL).unwrap();
        assert_eq!(para.para_level(), 1);
        let para = engine.resolve_str("123", LEVEL_DEFAULT_LTR).unwrap();
        assert_eq!(para.para_level(), 0);
    }

    #[test]
    fn test_prologue_decides_default_level() {
        let engine = BidiEngine::new();
        let text = utf16("123");
        let prologue = utf16("\u{05d0}");
        let request = ResolveRequest::new(&text, LEVEL_DEFAULT_LTR).with_context(ParagraphContext {
            prologue: &prologue,
            epilogue: &[],
        });
        assert_eq!(engine.resolve_request(request).unwrap().para_level(), 1);
    }

    #[test]
    fn test_classifier_override() {
        let engine = BidiEngine::new();
        let text = utf16("abc");
        let b_is_r = |c: u32| (c == u32::from(b'b')).then_some(BidiClass::R);
        let request = ResolveRequest::new(&text, 0).with_classifier(&b_is_r);
        let para = engine.resolve_request(request).unwrap();
        assert_eq!(para.direction(), Direction::Mixed);
        assert_eq!(para.levels(), vec![0, 1, 0]);
    }

    #[test]
    fn test_embedding_levels_with_override() {
        let engine = BidiEngine::new();
        let text = utf16("abc");
        let levels = [0, 1 | crate::types::LEVEL_OVERRIDE, 0];
        let request = ResolveRequest::new(&text, 0).with_embedding_levels(&levels);
        let para = engine.resolve_request(request).unwrap();
        assert_eq!(para.levels(), vec![0, 1, 0]);
    }

    #[test]
    fn test_options_are_normalized() {
        let mut engine = BidiEngine::with_config(BidiConfig {
            reordering_options: ReorderingOptions::all(),
            ..BidiConfig::default()
        });
        assert!(!engine.reordering_options().contains(ReorderingOptions::INSERT_MARKS));
        engine.set_inverse(true);
        assert_eq!(engine.reordering_mode(), ReorderingMode::InverseNumbersAsL);
        assert!(engine.is_inverse());
    }
}
