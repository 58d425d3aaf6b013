mod common;

use blitz_bidi::{
    invert_map, reorder_logical, reorder_visual, write_reverse, BidiEngine, Level, ReorderingMode,
    WriteOptions, LEVEL_DEFAULT_LTR, LEVEL_DEFAULT_RTL,
};
use common::{resolve_with, utf16};
use proptest::prelude::*;

fn para_levels() -> impl Strategy<Value = Level> {
    prop::sample::select(vec![0, 1, 2, LEVEL_DEFAULT_LTR, LEVEL_DEFAULT_RTL])
}

fn modes() -> impl Strategy<Value = ReorderingMode> {
    prop::sample::select(vec![
        ReorderingMode::Default,
        ReorderingMode::NumbersSpecial,
        ReorderingMode::GroupNumbersWithR,
        ReorderingMode::InverseNumbersAsL,
        ReorderingMode::InverseLikeDirect,
        ReorderingMode::InverseForNumbersSpecial,
    ])
}

/// Mixed text where every bracket pair encloses a strong character,
/// with the positions of each pair.
fn bracketed_text() -> impl Strategy<Value = (String, Vec<(usize, usize)>)> {
    let token = prop::sample::select(vec![
        "a", "B", "1", " ", "(a)", "(B)", "(a B)", "(B 1)", "(c(D)e)",
    ]);
    prop::collection::vec(token, 0..12).prop_map(|tokens| {
        let text = tokens.concat();
        let mut pairs = Vec::new();
        let mut open = Vec::new();
        for (i, b) in text.bytes().enumerate() {
            match b {
                b'(' => open.push(i),
                b')' => pairs.extend(open.pop().map(|start| (start, i))),
                _ => {}
            }
        }
        (text, pairs)
    })
}

fn engine_for(mode: ReorderingMode) -> BidiEngine {
    let mut engine = BidiEngine::new();
    engine.set_reordering_mode(mode);
    engine
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn visual_map_is_a_permutation(
        text in "[a-cA-C@0-9 ()<>~=!\n]{0,40}",
        level in para_levels(),
        mode in modes(),
    ) {
        let para = resolve_with(&engine_for(mode), &text, level);
        let visual_map = para.visual_map().unwrap();
        let mut sorted = visual_map.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..para.processed_length()).collect::<Vec<_>>());
        prop_assert_eq!(invert_map(&visual_map), para.logical_map().unwrap());

        for (visual, &logical) in visual_map.iter().enumerate() {
            prop_assert_eq!(para.visual_index(logical).unwrap(), visual);
            prop_assert_eq!(para.logical_index(visual).unwrap(), logical);
        }
    }

    #[test]
    fn runs_cover_the_text_once(
        text in "[a-cA-C@0-9 ()<>~=!\n]{0,40}",
        level in para_levels(),
        mode in modes(),
    ) {
        let para = resolve_with(&engine_for(mode), &text, level);
        let levels = para.levels();
        let mut runs = (0..para.run_count().unwrap())
            .map(|i| para.visual_run(i).unwrap())
            .collect::<Vec<_>>();
        runs.sort_by_key(|run| run.start);

        let mut next = 0;
        for run in &runs {
            prop_assert_eq!(run.start, next);
            prop_assert!(!run.is_empty());
            for &level in &levels[run.start..run.limit] {
                prop_assert_eq!(level, run.level);
            }
            next = run.limit;
        }
        prop_assert_eq!(next, para.processed_length());
    }

    #[test]
    fn reordered_output_keeps_every_unit(
        text in "[a-cA-C@0-9 ()<>~=!\n]{0,40}",
        level in para_levels(),
    ) {
        let para = resolve_with(&BidiEngine::new(), &text, level);
        for options in [WriteOptions::empty(), WriteOptions::DO_MIRRORING] {
            let out = para.write_reordered(options).unwrap();
            prop_assert_eq!(out.len(), para.processed_length());
        }

        let mut plain = para.write_reordered(WriteOptions::empty()).unwrap();
        plain.sort_unstable();
        let mut units = utf16(&text);
        units.sort_unstable();
        prop_assert_eq!(plain, units);
    }

    #[test]
    fn level_reordering_matches_paragraph_map(
        text in "[a-cA-C@0-9 ()<>~=!]{1,40}",
        level in para_levels(),
    ) {
        let para = resolve_with(&BidiEngine::new(), &text, level);
        let from_levels = reorder_visual(&para.levels()).unwrap();
        prop_assert_eq!(from_levels, para.visual_map().unwrap());
    }

    #[test]
    fn lines_partition_the_paragraph(
        text in "[a-cA-C@0-9 ()!]{1,40}",
        level in para_levels(),
        split in any::<prop::sample::Index>(),
    ) {
        let para = resolve_with(&BidiEngine::new(), &text, level);
        let at = split.index(para.processed_length() + 1);
        let first = para.line(0, at).unwrap();
        let second = para.line(at, para.processed_length()).unwrap();
        prop_assert_eq!(
            first.processed_length() + second.processed_length(),
            para.processed_length()
        );

        let mut joined = first.write_reordered(WriteOptions::empty()).unwrap();
        joined.extend(second.write_reordered(WriteOptions::empty()).unwrap());
        let mut units = utf16(&text);
        joined.sort_unstable();
        units.sort_unstable();
        prop_assert_eq!(joined, units);
    }

    #[test]
    fn bracket_pairs_resolve_alike(
        (text, pairs) in bracketed_text(),
        level in prop::sample::select(vec![0u8, 1]),
    ) {
        let para = resolve_with(&BidiEngine::new(), &text, level);
        let levels = para.levels();
        for (open, close) in pairs {
            prop_assert_eq!(levels[open], levels[close], "pair {}..{} in {:?}", open, close, text);
        }
    }

    #[test]
    fn logical_and_visual_orders_are_inverse(
        levels in prop::collection::vec(0u8..=12, 0..30),
    ) {
        let logical = reorder_logical(&levels).unwrap();
        let visual = reorder_visual(&levels).unwrap();
        prop_assert_eq!(invert_map(&logical), visual.clone());
        prop_assert_eq!(invert_map(&visual), logical);
    }

    #[test]
    fn write_reverse_twice_is_identity(text in "[ -~]{0,60}") {
        let units = utf16(&text);
        let once = write_reverse(&units, WriteOptions::empty());
        prop_assert_eq!(write_reverse(&once, WriteOptions::empty()), units);
    }
}
