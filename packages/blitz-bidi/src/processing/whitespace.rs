//! Whitespace levels (rule L1)

use super::Resolver;
use crate::flags::ClassFlags;
use crate::types::{BidiClass, Level};

impl Resolver<'_> {
    fn separator_level(&self, index: usize, flag: ClassFlags) -> Level {
        if self.order_paragraphs_ltr && flag.contains(ClassFlags::B) {
            0
        } else {
            self.para_level_at(index)
        }
    }

    /// Reset separators, and whitespace before them or before the end of
    /// the text, to the paragraph level. Characters removed by X9 take the
    /// level of what follows them.
    pub(crate) fn adjust_ws_levels(&mut self) {
        if !self.flags.intersects(ClassFlags::MASK_WS) {
            return;
        }
        let mut i = self.trailing_ws_start;
        while i > 0 {
            // Whitespace run before `i`.
            while i > 0 {
                i -= 1;
                let flag = ClassFlags::of(self.classes[i]);
                if !flag.intersects(ClassFlags::MASK_WS) {
                    break;
                }
                self.levels[i] = self.separator_level(i, flag);
            }
            // Back to the previous segment or block separator.
            while i > 0 {
                i -= 1;
                let flag = ClassFlags::of(self.classes[i]);
                if flag.intersects(ClassFlags::MASK_BN_EXPLICIT) {
                    self.levels[i] = self.levels[i + 1];
                } else if flag.intersects(ClassFlags::MASK_B_S) {
                    self.levels[i] = self.separator_level(i, flag);
                    break;
                }
            }
        }
    }
}

/// Start of the trailing whitespace of a line, after which every
/// character sits at `para_level`.
pub(crate) fn trailing_ws_start(classes: &[BidiClass], levels: &[Level], para_level: Level) -> usize {
    let mut start = classes.len();
    if classes.last() == Some(&BidiClass::B) {
        return start;
    }
    while start > 0 && ClassFlags::of(classes[start - 1]).intersects(ClassFlags::MASK_WS) {
        start -= 1;
    }
    while start > 0 && levels[start - 1] == para_level {
        start -= 1;
    }
    start
}
