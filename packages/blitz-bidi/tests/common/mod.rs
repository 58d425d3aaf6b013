//! Pseudo-text helpers shared by the integration tests.
//!
//! Mixed text is written in ASCII: lower case is L, upper case is R, `@`
//! is AL, digits 0-5 are EN and 6-9 are AN. `>` and `<` open LTR and RTL
//! isolates, `~` is FSI and `=` closes an isolate. Everything else keeps
//! its real class, so `(`, `[` and friends still pair as brackets.

#![allow(dead_code)]

use blitz_bidi::{BidiClass, BidiEngine, BidiParagraph, Level, ResolveRequest, WriteOptions};

pub fn pseudo_class(c: u32) -> Option<BidiClass> {
    let ch = char::from_u32(c)?;
    Some(match ch {
        'a'..='z' => BidiClass::L,
        'A'..='Z' => BidiClass::R,
        '@' => BidiClass::AL,
        '0'..='5' => BidiClass::EN,
        '6'..='9' => BidiClass::AN,
        '>' => BidiClass::LRI,
        '<' => BidiClass::RLI,
        '~' => BidiClass::FSI,
        '=' => BidiClass::PDI,
        _ => return None,
    })
}

pub fn utf16(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Resolve pseudo text with `engine`'s settings.
pub fn resolve_with(engine: &BidiEngine, text: &str, para_level: Level) -> BidiParagraph {
    init_logging();
    let units = utf16(text);
    let request = ResolveRequest::new(&units, para_level).with_classifier(&pseudo_class);
    engine
        .resolve_request(request)
        .unwrap_or_else(|err| panic!("resolving {text:?}: {err}"))
}

pub fn resolve(text: &str, para_level: Level) -> BidiParagraph {
    resolve_with(&BidiEngine::new(), text, para_level)
}

pub fn visual(para: &BidiParagraph, options: WriteOptions) -> String {
    para.write_reordered_string(options).unwrap()
}
