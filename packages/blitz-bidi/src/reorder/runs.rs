//! Level runs in visual order (rule L2)

use crate::error::{reserve, Result};
use crate::types::{is_bidi_control_char, Direction, Level, Run, MAX_EXPLICIT_LEVEL};
use crate::view::View;

/// Build the visual run table for `view`.
///
/// Each run's `limit` is the cumulative visual limit. Mark flags from the
/// insert points and the negated count of removed controls end up in
/// `insert_remove`.
pub(crate) fn compute_runs(view: &View<'_>) -> Result<Vec<Run>> {
    let length = view.length;
    let mut runs = Vec::new();
    if length == 0 {
        return Ok(runs);
    }

    let limit = view.trailing_ws_start.min(length);
    if view.direction != Direction::Mixed || limit == 0 {
        runs.push(Run::new(0, length, view.para_level));
    } else {
        let levels = &view.levels[..length];
        let level_runs = 1 + levels[..limit].windows(2).filter(|w| w[0] != w[1]).count();
        if level_runs == 1 && limit == length {
            runs.push(Run::new(0, length, levels[0]));
        } else {
            reserve(&mut runs, level_runs + 1, "visual runs")?;
            let mut min_level = MAX_EXPLICIT_LEVEL + 1;
            let mut max_level = 0;
            let mut i = 0;
            while i < limit {
                let start = i;
                let level = levels[i];
                min_level = min_level.min(level);
                max_level = max_level.max(level);
                i += 1;
                while i < limit && levels[i] == level {
                    i += 1;
                }
                // Logical length for now; made cumulative after reordering.
                runs.push(Run::new(start, i - start, level));
            }
            let has_trailing = limit < length;
            if has_trailing {
                runs.push(Run::new(limit, length - limit, view.para_level));
                min_level = min_level.min(view.para_level);
            }

            reorder_runs(&mut runs, levels, min_level, max_level, has_trailing);

            let mut visual_limit = 0;
            for run in runs.iter_mut() {
                run.level = levels[run.start];
                visual_limit += run.limit;
                run.limit = visual_limit;
            }
            if has_trailing {
                let trailing = if view.para_level & 1 != 0 { 0 } else { runs.len() - 1 };
                runs[trailing].level = view.para_level;
            }
        }
    }

    for point in view.insert_points {
        if let Some(index) = run_from_logical_index(&runs, point.pos) {
            runs[index].insert_remove |= point.flag;
        }
    }
    if view.control_count > 0 {
        for (i, &unit) in view.text[..length].iter().enumerate() {
            if is_bidi_control_char(u32::from(unit)) {
                if let Some(index) = run_from_logical_index(&runs, i) {
                    runs[index].insert_remove -= 1;
                }
            }
        }
    }

    log::trace!("computed {} visual run(s) for {} code units", runs.len(), length);
    Ok(runs)
}

/// Reverse every maximal sequence of runs at or above each level, from the
/// highest level down to the lowest odd one. Run limits are still logical
/// lengths here; a trailing whitespace run is left out of the per-level
/// passes and only joins the final full reversal.
fn reorder_runs(
    runs: &mut [Run],
    levels: &[Level],
    min_level: Level,
    max_level: Level,
    has_trailing: bool,
) {
    if max_level <= (min_level | 1) {
        return;
    }
    let min_level = min_level + 1;
    let count = if has_trailing { runs.len() - 1 } else { runs.len() };
    let level_of = |run: &Run| levels[run.start];

    for level in (min_level..max_level).rev() {
        let mut first = 0;
        loop {
            while first < count && level_of(&runs[first]) < level {
                first += 1;
            }
            if first >= count {
                break;
            }
            let mut limit = first + 1;
            while limit < count && level_of(&runs[limit]) >= level {
                limit += 1;
            }
            runs[first..limit].reverse();
            if limit == count {
                break;
            }
            first = limit + 1;
        }
    }

    if min_level & 1 == 0 {
        runs.reverse();
    }
}

/// Index of the run containing the logical position `index`.
pub(crate) fn run_from_logical_index(runs: &[Run], index: usize) -> Option<usize> {
    let mut visual_start = 0;
    for (i, run) in runs.iter().enumerate() {
        let length = run.limit - visual_start;
        if (run.start..run.start + length).contains(&index) {
            return Some(i);
        }
        visual_start += length;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::ReorderingOptions;
    use crate::properties::UnicodeProperties;
    use crate::types::{BidiClass, InsertPoint, ReorderingMode, LRM_BEFORE};

    fn view<'a>(
        text: &'a [u16],
        levels: &'a [Level],
        para_level: Level,
        trailing_ws_start: usize,
    ) -> View<'a> {
        View {
            text,
            classes: &[] as &[BidiClass],
            levels,
            paragraphs: &[],
            auto_level: false,
            para_level,
            direction: Direction::Mixed,
            length: levels.len(),
            result_length: levels.len(),
            trailing_ws_start,
            control_count: 0,
            insert_points: &[],
            mode: ReorderingMode::Default,
            options: ReorderingOptions::empty(),
            properties: &UnicodeProperties,
            runs: &[],
        }
    }

    fn spans(runs: &[Run]) -> Vec<(usize, usize, Level)> {
        let mut visual_start = 0;
        runs.iter()
            .map(|run| {
                let span = (run.start, run.limit - visual_start, run.level);
                visual_start = run.limit;
                span
            })
            .collect()
    }

    #[test]
    fn test_ltr_paragraph_with_rtl_span() {
        let text = [0u16; 6];
        let levels = [0, 0, 1, 1, 0, 0];
        let runs = compute_runs(&view(&text, &levels, 0, 6)).unwrap();
        assert_eq!(spans(&runs), vec![(0, 2, 0), (2, 2, 1), (4, 2, 0)]);
        assert_eq!(runs.last().unwrap().limit, 6);
    }

    #[test]
    fn test_rtl_paragraph_reverses_runs() {
        let text = [0u16; 5];
        let levels = [1, 1, 2, 2, 1];
        let runs = compute_runs(&view(&text, &levels, 1, 5)).unwrap();
        assert_eq!(spans(&runs), vec![(4, 1, 1), (2, 2, 2), (0, 2, 1)]);
    }

    #[test]
    fn test_nested_levels() {
        let text = [0u16; 4];
        let levels = [0, 1, 2, 1];
        let runs = compute_runs(&view(&text, &levels, 0, 4)).unwrap();
        assert_eq!(spans(&runs), vec![(0, 1, 0), (3, 1, 1), (2, 1, 2), (1, 1, 1)]);
    }

    #[test]
    fn test_trailing_whitespace_run() {
        let text = [0u16; 4];
        // Levels past the trailing start are ignored.
        let levels = [1, 2, 1, 1];
        let runs = compute_runs(&view(&text, &levels, 1, 2)).unwrap();
        assert_eq!(spans(&runs), vec![(2, 2, 1), (1, 1, 2), (0, 1, 1)]);
    }

    #[test]
    fn test_flags_land_on_runs() {
        let text: Vec<u16> = "ab\u{200e}cd".encode_utf16().collect();
        let levels = [0, 0, 1, 1, 1];
        let points = [InsertPoint { pos: 3, flag: LRM_BEFORE }];
        let mut v = view(&text, &levels, 0, 5);
        v.insert_points = &points;
        v.control_count = 1;
        let runs = compute_runs(&v).unwrap();
        assert_eq!(runs[0].insert_remove, 0);
        assert_eq!(runs[1].insert_remove, LRM_BEFORE - 1);
    }

    #[test]
    fn test_empty_text_has_no_runs() {
        assert!(compute_runs(&view(&[], &[], 0, 0)).unwrap().is_empty());
        assert_eq!(run_from_logical_index(&[], 0), None);
    }
}
