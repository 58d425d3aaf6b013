//! Standalone reordering helpers working on caller-supplied level arrays

use crate::error::{BidiError, Result};
use crate::types::{Level, MAP_NOWHERE, MAX_EXPLICIT_LEVEL};

/// Validate `levels` and return (min, max, identity map).
fn prepare(levels: &[Level]) -> Result<(Level, Level, Vec<usize>)> {
    let mut min_level = MAX_EXPLICIT_LEVEL + 1;
    let mut max_level = 0;
    for (index, &level) in levels.iter().enumerate() {
        if level > MAX_EXPLICIT_LEVEL + 1 {
            return Err(BidiError::InvalidLevelArray { index, level });
        }
        min_level = min_level.min(level);
        max_level = max_level.max(level);
    }
    Ok((min_level, max_level, (0..levels.len()).collect()))
}

/// Walk every maximal span at or above each level from `max_level` down to
/// the lowest odd level, handing `(start, limit)` to `reverse`.
fn for_each_reversal(
    levels: &[Level],
    min_level: Level,
    max_level: Level,
    mut reverse: impl FnMut(usize, usize),
) {
    let min_level = min_level | 1;
    for level in (min_level..=max_level).rev() {
        let mut start = 0;
        loop {
            while start < levels.len() && levels[start] < level {
                start += 1;
            }
            if start >= levels.len() {
                break;
            }
            let mut limit = start + 1;
            while limit < levels.len() && levels[limit] >= level {
                limit += 1;
            }
            reverse(start, limit);
            if limit == levels.len() {
                break;
            }
            start = limit + 1;
        }
    }
}

/// Logical-to-visual map for a line with the given levels: entry `i` is
/// the visual position of logical index `i`.
pub fn reorder_logical(levels: &[Level]) -> Result<Vec<usize>> {
    let (min_level, max_level, mut map) = prepare(levels)?;
    if levels.is_empty() || (min_level == max_level && min_level & 1 == 0) {
        return Ok(map);
    }
    for_each_reversal(levels, min_level, max_level, |start, limit| {
        let sum = start + limit - 1;
        for entry in &mut map[start..limit] {
            *entry = sum - *entry;
        }
    });
    Ok(map)
}

/// Visual-to-logical map for a line with the given levels: entry `i` is
/// the logical index shown at visual position `i`.
pub fn reorder_visual(levels: &[Level]) -> Result<Vec<usize>> {
    let (min_level, max_level, mut map) = prepare(levels)?;
    if levels.is_empty() || (min_level == max_level && min_level & 1 == 0) {
        return Ok(map);
    }
    for_each_reversal(levels, min_level, max_level, |start, limit| {
        map[start..limit].reverse();
    });
    Ok(map)
}

/// Invert an index map. Source entries equal to [`MAP_NOWHERE`] are
/// skipped; destination slots nothing maps to are [`MAP_NOWHERE`].
pub fn invert_map(map: &[usize]) -> Vec<usize> {
    let dest_len = map
        .iter()
        .filter(|&&entry| entry != MAP_NOWHERE)
        .max()
        .map_or(0, |&max| max + 1);
    let mut inverse = vec![MAP_NOWHERE; dest_len];
    for (i, &entry) in map.iter().enumerate() {
        if entry != MAP_NOWHERE {
            inverse[entry] = i;
        }
    }
    inverse
}

/// Reorder `objects` into visual order according to `levels`.
pub fn reorder_objects_visually<T: Clone>(levels: &[Level], objects: &mut [T]) -> Result<()> {
    if levels.len() != objects.len() {
        return Err(BidiError::LengthMismatch {
            expected: levels.len(),
            actual: objects.len(),
        });
    }
    let map = reorder_visual(levels)?;
    let logical = objects.to_vec();
    for (slot, &index) in objects.iter_mut().zip(&map) {
        *slot = logical[index].clone();
    }
    Ok(())
}
