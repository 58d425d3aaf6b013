//! Error handling for bidirectional resolution and reordering

use crate::types::Level;

/// Errors reported by the BiDi engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BidiError {
    #[error("Invalid paragraph level {level}")]
    InvalidParaLevel { level: Level },

    #[error("Level {level} out of bounds at index {index}")]
    InvalidLevel { index: usize, level: Level },

    #[error("Embedding levels cover {actual} positions but the text has {expected}")]
    LevelsLengthMismatch { expected: usize, actual: usize },

    #[error("Index {index} is out of range {start} to {limit}")]
    IndexOutOfRange {
        index: usize,
        start: usize,
        limit: usize,
    },

    #[error("Invalid line range {start}..{limit} for processed length {length}")]
    InvalidLineRange {
        start: usize,
        limit: usize,
        length: usize,
    },

    #[error("Line {start}..{limit} crosses a paragraph boundary")]
    CrossesParagraphBoundary { start: usize, limit: usize },

    #[error("Level array entry {level} at index {index} is not a valid embedding level")]
    InvalidLevelArray { index: usize, level: Level },

    #[error("Expected {expected} objects for the level array, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Memory allocation failed for {0}")]
    ResourceExhaustion(&'static str),
}

impl From<std::collections::TryReserveError> for BidiError {
    fn from(_: std::collections::TryReserveError) -> Self {
        BidiError::ResourceExhaustion("scratch buffer")
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, BidiError>;

/// Reserve room for `additional` more elements or report exhaustion for `label`.
pub(crate) fn reserve<T>(vec: &mut Vec<T>, additional: usize, label: &'static str) -> Result<()> {
    vec.try_reserve(additional)
        .map_err(|_| BidiError::ResourceExhaustion(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = BidiError::InvalidLevel {
            index: 4,
            level: 126,
        };
        assert_eq!(err.to_string(), "Level 126 out of bounds at index 4");

        let err = BidiError::CrossesParagraphBoundary { start: 2, limit: 9 };
        assert!(err.to_string().contains("2..9"));
    }

    #[test]
    fn test_try_reserve_failure_maps_to_exhaustion() {
        let mut v: Vec<u64> = Vec::new();
        let err = v.try_reserve(usize::MAX).map_err(BidiError::from).unwrap_err();
        assert!(matches!(err, BidiError::ResourceExhaustion(_)));
        assert!(matches!(
            reserve(&mut v, usize::MAX, "levels"),
            Err(BidiError::ResourceExhaustion("levels"))
        ));
    }
}
