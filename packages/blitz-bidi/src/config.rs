//! Engine configuration
//!
//! Reordering mode, reordering options and paragraph ordering are the only
//! settings that persist between resolve calls; everything else is passed
//! per call in a [`crate::ResolveRequest`].

use serde::{Deserialize, Serialize};

use crate::flags::ReorderingOptions;
use crate::types::ReorderingMode;

/// Configuration for [`crate::BidiEngine`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BidiConfig {
    /// Algorithm variant.
    pub reordering_mode: ReorderingMode,
    /// Mark insertion, control removal and streaming.
    pub reordering_options: ReorderingOptions,
    /// Give block separators level 0 and lay paragraphs out left to right.
    pub order_paragraphs_ltr: bool,
}

impl BidiConfig {
    /// Configuration with the given mode and default options.
    pub fn with_mode(reordering_mode: ReorderingMode) -> Self {
        Self {
            reordering_mode,
            ..Self::default()
        }
    }

    /// Apply `options`, dropping INSERT_MARKS when REMOVE_CONTROLS is set.
    pub fn set_reordering_options(&mut self, options: ReorderingOptions) {
        self.reordering_options = normalize_options(options);
    }

    /// True when the mode is the classic inverse algorithm.
    pub fn is_inverse(&self) -> bool {
        self.reordering_mode == ReorderingMode::InverseNumbersAsL
    }

    /// Enable or disable the classic inverse algorithm.
    pub fn set_inverse(&mut self, inverse: bool) {
        self.reordering_mode = if inverse {
            ReorderingMode::InverseNumbersAsL
        } else {
            ReorderingMode::Default
        };
    }

    #[cfg(test)]
    pub(crate) fn for_testing(mode: ReorderingMode, options: ReorderingOptions) -> Self {
        let mut config = Self::with_mode(mode);
        config.set_reordering_options(options);
        config
    }
}

pub(crate) fn normalize_options(options: ReorderingOptions) -> ReorderingOptions {
    if options.contains(ReorderingOptions::REMOVE_CONTROLS)
        && options.contains(ReorderingOptions::INSERT_MARKS)
    {
        log::debug!("REMOVE_CONTROLS set, dropping INSERT_MARKS");
        options - ReorderingOptions::INSERT_MARKS
    } else {
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_controls_wins_over_insert_marks() {
        let mut config = BidiConfig::default();
        config.set_reordering_options(
            ReorderingOptions::INSERT_MARKS | ReorderingOptions::REMOVE_CONTROLS,
        );
        assert_eq!(config.reordering_options, ReorderingOptions::REMOVE_CONTROLS);
    }

    #[test]
    fn test_inverse_toggles_mode() {
        let mut config = BidiConfig::default();
        config.set_inverse(true);
        assert!(config.is_inverse());
        assert_eq!(config.reordering_mode, ReorderingMode::InverseNumbersAsL);
        config.set_inverse(false);
        assert_eq!(config.reordering_mode, ReorderingMode::Default);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: BidiConfig =
            serde_json::from_str(r#"{"reordering_mode":"InverseLikeDirect"}"#).unwrap();
        assert_eq!(config.reordering_mode, ReorderingMode::InverseLikeDirect);
        assert!(config.reordering_options.is_empty());
        assert!(!config.order_paragraphs_ltr);
    }
}
