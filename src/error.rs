//! Error Taxonomy
//!
//! Every failure the engine can report is local, synchronous and
//! recoverable. None of them is fatal to the process.

use thiserror::Error;

/// Errors surfaced by the generator, the algorithm set and the player
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    /// A sequence was requested with a non-positive length
    #[error("invalid sequence size {0}: size must be at least 1")]
    InvalidSize(String),

    /// The algorithm selector did not name a known algorithm
    #[error("unknown algorithm '{0}' (expected one of: bubble, insertion, selection, merge, quick)")]
    UnknownAlgorithm(String),

    /// The inter-frame delay is outside the accepted range
    #[error("invalid delay {requested}ms: must be within {min}..={max}ms")]
    InvalidDelay { requested: u64, min: u64, max: u64 },

    /// A run was requested while another one is still in flight
    #[error("run {active} is still in flight; abort it or wait for completion first")]
    ConcurrentRunConflict { active: uuid::Uuid },

    /// The configuration file or environment could not be read
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SortError>;

impl From<serde_json::Error> for SortError {
    fn from(err: serde_json::Error) -> Self {
        SortError::Config(err.to_string())
    }
}

impl From<std::io::Error> for SortError {
    fn from(err: std::io::Error) -> Self {
        SortError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        let err = SortError::UnknownAlgorithm("heap".to_string());
        assert!(err.to_string().contains("'heap'"));

        let err = SortError::InvalidDelay { requested: 0, min: 1, max: 100 };
        assert_eq!(err.to_string(), "invalid delay 0ms: must be within 1..=100ms");
    }
}
