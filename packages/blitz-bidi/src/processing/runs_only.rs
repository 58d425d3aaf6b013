//! Runs-only reordering
//!
//! A logical-to-logical transform: whole runs move, the characters inside
//! them stay in logical order. The text is reordered once with the default
//! algorithm, the visual result is resolved again as visual input with the
//! opposite paragraph parity, and the runs of that second pass are mapped
//! back through the first pass's visual map. A second-pass run is split
//! wherever its characters were not adjacent, or not at the same level, in
//! the first pass.

use super::{ResolveInput, Resolved, Resolver};
use crate::error::{reserve, Result};
use crate::flags::{ReorderingOptions, WriteOptions};
use crate::reorder::compute_runs;
use crate::types::{Direction, Level, ReorderingMode, Run, LRM_AFTER, RLM_AFTER};

pub(crate) fn resolve_runs_only(input: ResolveInput<'_>) -> Result<Resolved> {
    let properties = input.lookup.properties;
    if input.embedding_levels.is_some() {
        log::debug!("embedding levels are ignored in runs-only mode");
    }

    let forward_input = ResolveInput {
        mode: ReorderingMode::Default,
        embedding_levels: None,
        ..input
    };
    if input.text.is_empty() {
        let mut resolved = Resolver::new(forward_input).run(None)?;
        resolved.mode = ReorderingMode::RunsOnly;
        return Ok(resolved);
    }

    // Forward pass. Marks cannot be carried through the visual text, so
    // they are traded for control removal here.
    let mut forward_options = input.options;
    if forward_options.contains(ReorderingOptions::INSERT_MARKS) {
        forward_options -= ReorderingOptions::INSERT_MARKS;
        forward_options |= ReorderingOptions::REMOVE_CONTROLS;
    }
    let para_level = input.para_level & 1;
    let forward = Resolver::new(ResolveInput {
        para_level,
        options: forward_options,
        ..forward_input
    })
    .run(None)?;

    let view = forward.view(properties);
    let forward_runs = compute_runs(&view)?;
    let view = view.with_runs(&forward_runs);
    let saved_levels = view.levels();
    let visual_text = view.write_reordered(WriteOptions::DO_MIRRORING)?;
    let visual_map = view.visual_map()?;

    // Reverse pass over the visual text.
    let reverse = Resolver::new(ResolveInput {
        text: &visual_text,
        para_level: para_level ^ 1,
        embedding_levels: None,
        mode: ReorderingMode::InverseLikeDirect,
        ..input
    })
    .run(None)?;
    let mut runs = compute_runs(&reverse.view(properties))?;
    split_runs(&mut runs, &visual_map, &saved_levels)?;

    let direction = if runs.len() > 1 {
        Direction::Mixed
    } else {
        forward.direction
    };
    log::trace!(
        "runs-only: {} run(s) after splitting, result length {}",
        runs.len(),
        reverse.result_length
    );

    let mut text = Vec::new();
    reserve(&mut text, input.text.len(), "text copy")?;
    text.extend_from_slice(input.text);
    Ok(Resolved {
        text,
        classes: forward.classes,
        levels: saved_levels,
        paragraphs: forward.paragraphs,
        para_level: reverse.para_level ^ 1,
        auto_level: false,
        direction,
        length: forward.length,
        original_length: input.text.len(),
        result_length: reverse.result_length,
        // The saved levels already carry the trailing whitespace level.
        trailing_ws_start: forward.length,
        control_count: reverse.control_count,
        insert_points: reverse.insert_points,
        mode: ReorderingMode::RunsOnly,
        options: input.options,
        order_paragraphs_ltr: input.order_paragraphs_ltr,
        runs: Some(runs),
    })
}

/// Rewrite runs over the visual text into runs over the logical text,
/// splitting where the forward pass had a discontinuity.
fn split_runs(runs: &mut Vec<Run>, visual_map: &[usize], levels: &[Level]) -> Result<()> {
    let breaks_between = |a: usize, b: usize| {
        let (index, index1) = (visual_map[a], visual_map[b]);
        index.abs_diff(index1) != 1 || levels[index] != levels[index1]
    };

    let old_count = runs.len();
    let mut added = 0;
    let mut visual_start = 0;
    for run in runs.iter() {
        let length = run.limit - visual_start;
        visual_start = run.limit;
        for j in run.start + 1..run.start + length {
            if breaks_between(j, j - 1) {
                added += 1;
            }
        }
    }
    if added > 0 {
        reserve(runs, added, "split runs")?;
        runs.resize(old_count + added, Run::default());
    }

    for i in (0..old_count).rev() {
        let mut new_i = i + added;
        let length = if i == 0 {
            runs[0].limit
        } else {
            runs[i].limit - runs[i - 1].limit
        };
        let logical_start = runs[i].start;
        let odd = runs[i].level & 1;
        if length < 2 {
            if added > 0 {
                runs[new_i] = runs[i];
            }
            let pos = visual_map[logical_start];
            runs[new_i].start = pos;
            runs[new_i].level = levels[pos] ^ odd;
            continue;
        }

        // Walk the run in forward-pass visual order.
        let (mut start, limit, step) = if odd > 0 {
            (logical_start, logical_start + length - 1, 1isize)
        } else {
            (logical_start + length - 1, logical_start, -1isize)
        };
        let mut j = start;
        while j != limit {
            let next = j.wrapping_add_signed(step);
            if breaks_between(j, next) {
                let pos = visual_map[start].min(visual_map[j]);
                runs[new_i].start = pos;
                runs[new_i].level = levels[pos] ^ odd;
                runs[new_i].limit = runs[i].limit;
                runs[i].limit -= j.abs_diff(start) + 1;
                let after = runs[i].insert_remove & (LRM_AFTER | RLM_AFTER);
                runs[new_i].insert_remove = after;
                runs[i].insert_remove &= !after;
                start = next;
                added -= 1;
                new_i -= 1;
            }
            j = next;
        }
        if added > 0 {
            runs[new_i] = runs[i];
        }
        let pos = visual_map[start].min(visual_map[limit]);
        runs[new_i].start = pos;
        runs[new_i].level = levels[pos] ^ odd;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::resolve;
    use crate::properties::{ClassLookup, UnicodeProperties};

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    fn runs_only(text: &[u16], para_level: Level) -> Resolved {
        resolve(ResolveInput {
            text,
            para_level,
            embedding_levels: None,
            prologue: &[],
            epilogue: &[],
            lookup: ClassLookup::new(&UnicodeProperties, None),
            mode: ReorderingMode::RunsOnly,
            options: ReorderingOptions::empty(),
            order_paragraphs_ltr: false,
        })
        .unwrap()
    }

    #[test]
    fn test_plain_ltr_keeps_one_run() {
        let text = utf16("abc");
        let resolved = runs_only(&text, 0);
        let runs = resolved.runs.unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!((runs[0].start, runs[0].limit, runs[0].level), (0, 3, 0));
        assert_eq!(resolved.direction, Direction::Ltr);
        assert_eq!(resolved.mode, ReorderingMode::RunsOnly);
    }

    #[test]
    fn test_rtl_run_moves_as_a_block() {
        let text = utf16("ab \u{05d0}\u{05d1}");
        let resolved = runs_only(&text, 0);
        assert_eq!(resolved.para_level, 0);
        assert_eq!(resolved.direction, Direction::Mixed);
        let runs = resolved.runs.as_deref().unwrap();
        assert!(runs.len() >= 2);
        // The Hebrew run comes first and keeps its logical order.
        assert_eq!(runs[0].start, 3);
        assert_eq!(runs[0].limit, 2);
        assert_eq!(runs[0].level & 1, 0);
        assert_eq!(runs.last().map(|run| run.limit), Some(5));
    }

    #[test]
    fn test_split_on_discontinuity() {
        // One visual run over positions whose logical indices jump.
        let mut runs = vec![Run::new(0, 3, 1)];
        let visual_map = [0, 2, 1];
        let levels = [1, 0, 0];
        split_runs(&mut runs, &visual_map, &levels).unwrap();
        assert_eq!(runs.len(), 2);
        // Logical 1..3 stays together, logical 0 is split off behind it.
        assert_eq!((runs[0].start, runs[0].limit, runs[0].level), (1, 2, 1));
        assert_eq!((runs[1].start, runs[1].limit, runs[1].level), (0, 3, 0));
    }

    #[test]
    fn test_empty_text() {
        let resolved = runs_only(&[], 1);
        assert_eq!(resolved.mode, ReorderingMode::RunsOnly);
        assert_eq!(resolved.length, 0);
        assert_eq!(resolved.direction, Direction::Rtl);
    }
}
