//! Option bit sets and the aggregate class flag set

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::types::{BidiClass, Level};

bitflags! {
    /// Options altering how a paragraph is resolved.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ReorderingOptions: u32 {
        /// Insert LRM/RLM marks so that inverse reordering round-trips.
        const INSERT_MARKS = 1;
        /// Drop Bidi control characters from the reordered output.
        const REMOVE_CONTROLS = 2;
        /// Text may end mid-paragraph; only process complete paragraphs.
        const STREAMING = 4;
    }
}

bitflags! {
    /// Options for [`crate::BidiParagraph::write_reordered`] and [`crate::write_reverse`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct WriteOptions: u16 {
        /// Keep combining marks after their base in RTL runs.
        const KEEP_BASE_COMBINING = 1;
        /// Replace characters in RTL runs with their mirror images.
        const DO_MIRRORING = 2;
        /// Surround runs with LRM/RLM as recorded during resolution.
        const INSERT_LRM_FOR_NUMERIC = 4;
        /// Remove Bidi control characters.
        const REMOVE_BIDI_CONTROLS = 8;
        /// Write the runs in reverse visual order.
        const OUTPUT_REVERSE = 16;
    }
}

bitflags! {
    /// Set of Bidi classes occurring in a text, one bit per class.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub(crate) struct ClassFlags: u32 {
        const L = 1 << BidiClass::L as u8;
        const R = 1 << BidiClass::R as u8;
        const EN = 1 << BidiClass::EN as u8;
        const ES = 1 << BidiClass::ES as u8;
        const ET = 1 << BidiClass::ET as u8;
        const AN = 1 << BidiClass::AN as u8;
        const CS = 1 << BidiClass::CS as u8;
        const B = 1 << BidiClass::B as u8;
        const S = 1 << BidiClass::S as u8;
        const WS = 1 << BidiClass::WS as u8;
        const ON = 1 << BidiClass::ON as u8;
        const LRE = 1 << BidiClass::LRE as u8;
        const LRO = 1 << BidiClass::LRO as u8;
        const AL = 1 << BidiClass::AL as u8;
        const RLE = 1 << BidiClass::RLE as u8;
        const RLO = 1 << BidiClass::RLO as u8;
        const PDF = 1 << BidiClass::PDF as u8;
        const NSM = 1 << BidiClass::NSM as u8;
        const BN = 1 << BidiClass::BN as u8;
        const FSI = 1 << BidiClass::FSI as u8;
        const LRI = 1 << BidiClass::LRI as u8;
        const RLI = 1 << BidiClass::RLI as u8;
        const PDI = 1 << BidiClass::PDI as u8;
        const ENL = 1 << BidiClass::ENL as u8;
        const ENR = 1 << BidiClass::ENR as u8;
        /// Set when a paragraph has more than one level run.
        const MULTI_RUNS = 1 << 31;

        const MASK_LTR = Self::L.bits() | Self::EN.bits() | Self::ENL.bits() | Self::ENR.bits()
            | Self::AN.bits() | Self::LRE.bits() | Self::LRO.bits() | Self::LRI.bits();
        const MASK_RTL = Self::R.bits() | Self::AL.bits() | Self::RLE.bits() | Self::RLO.bits()
            | Self::RLI.bits();
        const MASK_R_AL = Self::R.bits() | Self::AL.bits();
        const MASK_EXPLICIT = Self::LRE.bits() | Self::LRO.bits() | Self::RLE.bits()
            | Self::RLO.bits() | Self::PDF.bits();
        const MASK_BN_EXPLICIT = Self::BN.bits() | Self::MASK_EXPLICIT.bits();
        const MASK_ISO = Self::LRI.bits() | Self::RLI.bits() | Self::FSI.bits() | Self::PDI.bits();
        const MASK_B_S = Self::B.bits() | Self::S.bits();
        const MASK_WS = Self::MASK_B_S.bits() | Self::WS.bits() | Self::MASK_BN_EXPLICIT.bits()
            | Self::MASK_ISO.bits();
        const MASK_POSSIBLE_N = Self::ON.bits() | Self::CS.bits() | Self::ES.bits()
            | Self::ET.bits() | Self::MASK_WS.bits();
        const MASK_EMBEDDING = Self::NSM.bits() | Self::MASK_POSSIBLE_N.bits();
    }
}

impl ClassFlags {
    #[inline]
    pub fn of(class: BidiClass) -> Self {
        Self::from_bits_retain(class.bit())
    }

    /// True when `class` belongs to this set.
    #[inline]
    pub fn has(self, class: BidiClass) -> bool {
        self.intersects(Self::of(class))
    }

    /// L or R, from the parity of `level`.
    #[inline]
    pub fn lr(level: Level) -> Self {
        if level & 1 == 0 { Self::L } else { Self::R }
    }

    /// LRE or RLE, from the parity of `level`.
    #[inline]
    pub fn embedding(level: Level) -> Self {
        if level & 1 == 0 { Self::LRE } else { Self::RLE }
    }

    /// LRO or RLO, from the parity of `level`.
    #[inline]
    pub fn override_(level: Level) -> Self {
        if level & 1 == 0 { Self::LRO } else { Self::RLO }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_are_disjoint_where_expected() {
        assert!(!ClassFlags::MASK_LTR.intersects(ClassFlags::MASK_RTL));
        assert!(ClassFlags::MASK_WS.contains(ClassFlags::BN | ClassFlags::PDI | ClassFlags::S));
        assert!(ClassFlags::MASK_EMBEDDING.contains(ClassFlags::NSM | ClassFlags::ON));
    }

    #[test]
    fn test_class_bits_follow_discriminants() {
        assert_eq!(ClassFlags::of(BidiClass::AL), ClassFlags::AL);
        assert!(ClassFlags::MASK_R_AL.has(BidiClass::R));
        assert!(!ClassFlags::MASK_R_AL.has(BidiClass::L));
        assert_eq!(ClassFlags::lr(3), ClassFlags::R);
        assert_eq!(ClassFlags::override_(2), ClassFlags::LRO);
    }
}
