//! Logical and visual index translation
//!
//! Positions are in code units. Inserted marks occupy visual positions with
//! no logical counterpart, and removed controls occupy logical positions
//! with no visual counterpart; both map to [`MAP_NOWHERE`].

use crate::error::{reserve, Result};
use crate::types::{
    is_bidi_control_char, Direction, Run, LRM_AFTER, LRM_BEFORE, MAP_NOWHERE, RLM_AFTER,
    RLM_BEFORE,
};
use crate::view::{check_index, View};

const MARK_BEFORE: i32 = LRM_BEFORE | RLM_BEFORE;
const MARK_AFTER: i32 = LRM_AFTER | RLM_AFTER;

#[inline]
fn has_mark(run: &Run, mask: i32) -> bool {
    run.insert_remove > 0 && run.insert_remove & mask != 0
}

impl View<'_> {
    #[inline]
    fn is_control_at(&self, index: usize) -> bool {
        is_bidi_control_char(u32::from(self.text[index]))
    }

    /// Visual position of the logical index `logical`.
    pub fn visual_index(&self, logical: usize) -> Result<usize> {
        check_index(logical, 0, self.length)?;
        let visual = match self.direction {
            Direction::Ltr => logical,
            Direction::Rtl => self.length - logical - 1,
            _ => {
                let mut visual_start = 0;
                let mut found = None;
                for (i, run) in self.runs.iter().enumerate() {
                    let length = self.run_length(i);
                    if (run.start..run.start + length).contains(&logical) {
                        let offset = logical - run.start;
                        found = Some(if run.is_even() {
                            visual_start + offset
                        } else {
                            visual_start + length - offset - 1
                        });
                        break;
                    }
                    visual_start += length;
                }
                match found {
                    Some(visual) => visual,
                    None => return Ok(MAP_NOWHERE),
                }
            }
        };

        if !self.insert_points.is_empty() {
            let mut marks = 0;
            for run in self.runs {
                if has_mark(run, MARK_BEFORE) {
                    marks += 1;
                }
                if visual < run.limit {
                    return Ok(visual + marks);
                }
                if has_mark(run, MARK_AFTER) {
                    marks += 1;
                }
            }
            Ok(visual + marks)
        } else if self.control_count > 0 {
            if self.is_control_at(logical) {
                return Ok(MAP_NOWHERE);
            }
            let mut controls = 0usize;
            for (i, run) in self.runs.iter().enumerate() {
                if visual >= run.limit {
                    controls += run.insert_remove.unsigned_abs() as usize;
                    continue;
                }
                if run.insert_remove != 0 {
                    let span = if run.is_even() {
                        run.start..logical
                    } else {
                        logical + 1..run.start + self.run_length(i)
                    };
                    controls += span.filter(|&j| self.is_control_at(j)).count();
                }
                return Ok(visual - controls);
            }
            Ok(visual - controls)
        } else {
            Ok(visual)
        }
    }

    /// Logical position shown at the visual index `visual`.
    pub fn logical_index(&self, visual: usize) -> Result<usize> {
        check_index(visual, 0, self.result_length)?;
        if self.insert_points.is_empty() && self.control_count == 0 {
            match self.direction {
                Direction::Ltr => return Ok(visual),
                Direction::Rtl => return Ok(self.length - visual - 1),
                _ => {}
            }
        }
        let runs = self.runs;
        let mut visual = visual;

        if !self.insert_points.is_empty() {
            let mut marks = 0;
            let mut visual_start = 0;
            for (i, run) in runs.iter().enumerate() {
                let length = self.run_length(i);
                if has_mark(run, MARK_BEFORE) {
                    if visual <= visual_start + marks {
                        return Ok(MAP_NOWHERE);
                    }
                    marks += 1;
                }
                if visual < run.limit + marks {
                    visual -= marks;
                    break;
                }
                if has_mark(run, MARK_AFTER) {
                    if visual == visual_start + length + marks {
                        return Ok(MAP_NOWHERE);
                    }
                    marks += 1;
                }
                visual_start += length;
            }
        } else if self.control_count > 0 {
            let mut controls = 0usize;
            let mut visual_start = 0;
            for (i, run) in runs.iter().enumerate() {
                let length = self.run_length(i);
                let removed = run.insert_remove.unsigned_abs() as usize;
                // Visual limit of this run once its controls are gone.
                if visual + controls + removed >= run.limit {
                    controls += removed;
                    visual_start += length;
                    continue;
                }
                if removed > 0 {
                    let logical_end = run.start + length - 1;
                    for j in 0..length {
                        let k = if run.is_even() { run.start + j } else { logical_end - j };
                        if self.is_control_at(k) {
                            controls += 1;
                        }
                        if visual + controls == visual_start + j {
                            break;
                        }
                    }
                }
                visual += controls;
                break;
            }
        }

        let index = runs.partition_point(|run| visual >= run.limit);
        let Some(run) = runs.get(index) else {
            return Ok(MAP_NOWHERE);
        };
        if run.is_even() {
            let previous = if index > 0 { runs[index - 1].limit } else { 0 };
            Ok(run.start + visual - previous)
        } else {
            Ok(run.start + run.limit - visual - 1)
        }
    }

    /// Visual position of every logical index.
    pub fn logical_map(&self) -> Result<Vec<usize>> {
        let mut map = Vec::new();
        if self.length == 0 {
            return Ok(map);
        }
        reserve(&mut map, self.length, "logical map")?;
        map.resize(self.length, MAP_NOWHERE);

        let mut visual_start = 0;
        for run in self.runs {
            let length = run.limit - visual_start;
            for offset in 0..length {
                let logical = if run.is_even() {
                    run.start + offset
                } else {
                    run.start + length - offset - 1
                };
                map[logical] = visual_start + offset;
            }
            visual_start = run.limit;
        }

        if !self.insert_points.is_empty() {
            let mut marks = 0;
            for (i, run) in self.runs.iter().enumerate() {
                let length = self.run_length(i);
                if has_mark(run, MARK_BEFORE) {
                    marks += 1;
                }
                if marks > 0 {
                    for entry in &mut map[run.start..run.start + length] {
                        *entry += marks;
                    }
                }
                if has_mark(run, MARK_AFTER) {
                    marks += 1;
                }
            }
        } else if self.control_count > 0 {
            let mut controls = 0usize;
            for (i, run) in self.runs.iter().enumerate() {
                let length = self.run_length(i);
                if controls == 0 && run.insert_remove == 0 {
                    continue;
                }
                let logical_limit = run.start + length;
                if run.insert_remove == 0 {
                    for entry in &mut map[run.start..logical_limit] {
                        *entry -= controls;
                    }
                    continue;
                }
                for j in 0..length {
                    let k = if run.is_even() { run.start + j } else { logical_limit - j - 1 };
                    if self.is_control_at(k) {
                        controls += 1;
                        map[k] = MAP_NOWHERE;
                    } else {
                        map[k] -= controls;
                    }
                }
            }
        }
        Ok(map)
    }

    /// Logical index shown at every visual position.
    pub fn visual_map(&self) -> Result<Vec<usize>> {
        let mut map = Vec::new();
        if self.result_length == 0 {
            return Ok(map);
        }
        let alloc = self.length.max(self.result_length);
        reserve(&mut map, alloc, "visual map")?;

        let mut visual_start = 0;
        for run in self.runs {
            let length = run.limit - visual_start;
            if run.is_even() {
                map.extend(run.start..run.start + length);
            } else {
                map.extend((run.start..run.start + length).rev());
            }
            visual_start = run.limit;
        }
        map.resize(alloc, MAP_NOWHERE);

        if !self.insert_points.is_empty() {
            let mut marks: usize = self
                .runs
                .iter()
                .map(|run| has_mark(run, MARK_BEFORE) as usize + has_mark(run, MARK_AFTER) as usize)
                .sum();
            // Shift entries right, back to front, opening gaps for marks.
            let mut k = self.result_length;
            for i in (0..self.runs.len()).rev() {
                if marks == 0 {
                    break;
                }
                let run = &self.runs[i];
                if has_mark(run, MARK_AFTER) {
                    k -= 1;
                    map[k] = MAP_NOWHERE;
                    marks -= 1;
                }
                let visual_start = if i > 0 { self.runs[i - 1].limit } else { 0 };
                let mut j = run.limit;
                while j > visual_start && marks > 0 {
                    j -= 1;
                    k -= 1;
                    map[k] = map[j];
                }
                if has_mark(run, MARK_BEFORE) {
                    k -= 1;
                    map[k] = MAP_NOWHERE;
                    marks -= 1;
                }
            }
        } else if self.control_count > 0 {
            let mut k = 0;
            let mut visual_start = 0;
            for (i, run) in self.runs.iter().enumerate() {
                let length = self.run_length(i);
                if run.insert_remove == 0 {
                    if k != visual_start {
                        map.copy_within(visual_start..run.limit, k);
                    }
                    k += length;
                } else {
                    let logical_end = run.start + length - 1;
                    for j in 0..length {
                        let m = if run.is_even() { run.start + j } else { logical_end - j };
                        if !self.is_control_at(m) {
                            map[k] = m;
                            k += 1;
                        }
                    }
                }
                visual_start += length;
            }
        }

        map.truncate(self.result_length);
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::BidiConfig;
    use crate::engine::BidiEngine;
    use crate::flags::ReorderingOptions;
    use crate::types::{ReorderingMode, MAP_NOWHERE};

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn test_maps_for_mixed_paragraph() {
        let text = utf16("ab \u{05d0}\u{05d1}\u{05d2} cd");
        let para = BidiEngine::new().resolve(&text, 0).unwrap();
        assert_eq!(para.logical_map().unwrap(), vec![0, 1, 2, 5, 4, 3, 6, 7, 8]);
        assert_eq!(para.visual_map().unwrap(), vec![0, 1, 2, 5, 4, 3, 6, 7, 8]);
        assert_eq!(para.visual_index(3).unwrap(), 5);
        assert_eq!(para.logical_index(3).unwrap(), 5);
    }

    #[test]
    fn test_rtl_shortcut() {
        let text = utf16("\u{05d0}\u{05d1}\u{05d2}");
        let para = BidiEngine::new().resolve(&text, 1).unwrap();
        assert_eq!(para.visual_index(0).unwrap(), 2);
        assert_eq!(para.logical_index(0).unwrap(), 2);
        assert_eq!(para.logical_map().unwrap(), vec![2, 1, 0]);
    }

    #[test]
    fn test_removed_controls_map_nowhere() {
        let mut engine = BidiEngine::new();
        engine.set_reordering_options(ReorderingOptions::REMOVE_CONTROLS);
        let text = utf16("a\u{200f}b");
        let para = engine.resolve(&text, 0).unwrap();
        assert_eq!(para.result_length(), 2);
        assert_eq!(para.logical_map().unwrap(), vec![0, MAP_NOWHERE, 1]);
        assert_eq!(para.visual_map().unwrap(), vec![0, 2]);
        assert_eq!(para.visual_index(1).unwrap(), MAP_NOWHERE);
        assert_eq!(para.visual_index(2).unwrap(), 1);
        assert_eq!(para.logical_index(1).unwrap(), 2);
    }

    #[test]
    fn test_inserted_marks_map_nowhere() {
        let engine = BidiEngine::with_config(BidiConfig::for_testing(
            ReorderingMode::InverseNumbersAsL,
            ReorderingOptions::INSERT_MARKS,
        ));
        let text = utf16("\u{05d0}1");
        let para = engine.resolve(&text, 1).unwrap();
        let visual = para.visual_map().unwrap();
        assert_eq!(visual.len(), para.result_length());
        assert!(para.result_length() >= 2);
        for (v, &logical) in visual.iter().enumerate() {
            if logical != MAP_NOWHERE {
                assert_eq!(para.visual_index(logical).unwrap(), v);
                assert_eq!(para.logical_index(v).unwrap(), logical);
            } else {
                assert_eq!(para.logical_index(v).unwrap(), MAP_NOWHERE);
            }
        }
    }

    #[test]
    fn test_index_out_of_range() {
        let text = utf16("abc");
        let para = BidiEngine::new().resolve(&text, 0).unwrap();
        assert!(para.visual_index(3).is_err());
        assert!(para.logical_index(3).is_err());
    }
}
