mod common;

use blitz_bidi::{
    BidiEngine, Direction, ReorderingMode, ReorderingOptions, WriteOptions, LEVEL_DEFAULT_LTR,
    LEVEL_DEFAULT_RTL, MAP_NOWHERE,
};
use common::{resolve, resolve_with, visual};

#[test]
fn test_ltr_paragraph_with_numbers_and_rtl() {
    let para = resolve("abc 123 DEF", 0);
    assert_eq!(para.levels(), vec![0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1]);
    assert_eq!(visual(&para, WriteOptions::empty()), "abc 123 FED");
}

#[test]
fn test_rtl_paragraph_keeps_numbers_and_latin_ltr() {
    let para = resolve("ABC 123 def", 1);
    assert_eq!(para.levels(), vec![1, 1, 1, 1, 2, 2, 2, 1, 2, 2, 2]);
    assert_eq!(visual(&para, WriteOptions::empty()), "def 123 CBA");
}

#[test]
fn test_arabic_letter_turns_numbers_arabic() {
    let para = resolve("@12", 0);
    assert_eq!(para.levels(), vec![1, 2, 2]);
    assert_eq!(visual(&para, WriteOptions::empty()), "12@");
}

#[test]
fn test_bracket_pair_follows_preceding_context() {
    let para = resolve("A(B)c", 0);
    assert_eq!(para.levels(), vec![1, 1, 1, 1, 0]);
    assert_eq!(visual(&para, WriteOptions::empty()), ")B(Ac");
    assert_eq!(visual(&para, WriteOptions::DO_MIRRORING), "(B)Ac");
}

#[test]
fn test_isolates() {
    let para = resolve("a<BC=d", 0);
    assert_eq!(para.levels(), vec![0, 0, 1, 1, 0, 0]);
    assert_eq!(visual(&para, WriteOptions::empty()), "a<CB=d");

    // FSI takes the direction of its first strong character.
    let para = resolve("~ABC=d", 0);
    assert_eq!(para.levels(), vec![0, 1, 1, 1, 0, 0]);
    assert_eq!(visual(&para, WriteOptions::empty()), "~CBA=d");
}

#[test]
fn test_paragraphs_detect_their_own_level() {
    let para = resolve("ab\nCD", LEVEL_DEFAULT_LTR);
    assert_eq!(para.paragraph_count(), 2);
    assert_eq!(para.levels(), vec![0, 0, 0, 1, 1]);
    assert_eq!(visual(&para, WriteOptions::empty()), "ab\nDC");

    let para = resolve("12 !", LEVEL_DEFAULT_RTL);
    assert_eq!(para.para_level(), 1);
}

#[test]
fn test_order_paragraphs_ltr() {
    let mut engine = BidiEngine::new();
    engine.order_paragraphs_ltr(true);
    let para = resolve_with(&engine, "AB\nCD", 1);
    assert_eq!(visual(&para, WriteOptions::empty()), "BA\nDC");

    let para = resolve("AB\nCD", 1);
    assert_eq!(para.direction(), Direction::Rtl);
    assert_eq!(visual(&para, WriteOptions::empty()), "DC\nBA");
}

#[test]
fn test_lines_reorder_independently() {
    let para = resolve("abc DEF ghi", 0);
    assert_eq!(visual(&para, WriteOptions::empty()), "abc FED ghi");

    let first = para.line(0, 4).unwrap();
    assert!(first.is_left_to_right());
    assert_eq!(first.write_reordered_string(WriteOptions::empty()).unwrap(), "abc ");

    let second = para.line(4, 11).unwrap();
    assert_eq!(second.direction(), Direction::Mixed);
    assert_eq!(
        second.write_reordered_string(WriteOptions::empty()).unwrap(),
        "FED ghi"
    );
    assert_eq!(second.visual_map().unwrap(), vec![2, 1, 0, 3, 4, 5, 6]);
}

#[test]
fn test_inverse_modes_restore_logical_order() {
    for mode in [
        ReorderingMode::InverseNumbersAsL,
        ReorderingMode::InverseLikeDirect,
        ReorderingMode::InverseForNumbersSpecial,
    ] {
        let mut engine = BidiEngine::new();
        engine.set_reordering_mode(mode);
        for (logical, displayed) in [("abc DEF ghi", "abc FED ghi"), ("ab CD", "ab DC")] {
            let para = resolve_with(&engine, displayed, 0);
            assert_eq!(
                visual(&para, WriteOptions::empty()),
                logical,
                "{mode:?} on {displayed:?}"
            );
        }
    }
}

#[test]
fn test_inverse_with_marks_round_trips_through_default() {
    let mut inverse = BidiEngine::new();
    inverse.set_reordering_mode(ReorderingMode::InverseLikeDirect);
    inverse.set_reordering_options(ReorderingOptions::INSERT_MARKS);
    let forward = BidiEngine::new();

    for displayed in ["abc FED ghi", "CB de", "ab DC ef"] {
        let logical = resolve_with(&inverse, displayed, 0);
        let logical = visual(&logical, WriteOptions::empty());
        let para = resolve_with(&forward, &logical, 0);
        assert_eq!(
            visual(&para, WriteOptions::REMOVE_BIDI_CONTROLS),
            displayed,
            "via {logical:?}"
        );
    }
}

#[test]
fn test_remove_controls() {
    let mut engine = BidiEngine::new();
    engine.set_reordering_options(ReorderingOptions::REMOVE_CONTROLS);
    let para = resolve_with(&engine, "a\u{200f}b", 0);
    assert_eq!(para.result_length(), 2);
    let out = visual(&para, WriteOptions::empty());
    assert_eq!(out, "ab");
    assert_eq!(para.visual_index(1).unwrap(), MAP_NOWHERE);
}

#[test]
fn test_trailing_rlm_for_inverse_with_marks() {
    let mut engine = BidiEngine::new();
    engine.set_reordering_mode(ReorderingMode::InverseLikeDirect);
    engine.set_reordering_options(ReorderingOptions::INSERT_MARKS);
    let para = resolve_with(&engine, "ABC def", LEVEL_DEFAULT_RTL);
    assert_eq!(para.para_level(), 1);
    assert!(para.result_length() > para.processed_length());

    let out = para.write_reordered(WriteOptions::empty()).unwrap();
    assert!(out.contains(&0x200f));
    assert!(out.len() <= para.result_length());
    let visual_map = para.visual_map().unwrap();
    assert_eq!(visual_map.len(), para.result_length());
    assert!(visual_map.contains(&MAP_NOWHERE));
}

#[test]
fn test_runs_only_moves_whole_runs() {
    let mut engine = BidiEngine::new();
    engine.set_reordering_mode(ReorderingMode::RunsOnly);
    let para = resolve_with(&engine, "abc DEF", 0);
    assert_eq!(para.reordering_mode(), ReorderingMode::RunsOnly);
    let out = visual(&para, WriteOptions::empty());
    assert!(out.starts_with("DEF"), "{out:?}");
    assert!(out.contains("abc"), "{out:?}");
    assert_eq!(out.len(), 7);
}

#[test]
fn test_output_reverse() {
    let para = resolve("abc DEF", 0);
    let forward = visual(&para, WriteOptions::empty());
    let reversed = visual(&para, WriteOptions::OUTPUT_REVERSE);
    assert_eq!(reversed, forward.chars().rev().collect::<String>());
}
