//! Error types for stop/move classification

use thiserror::Error;

/// Errors raised by the classifiers, estimators and statistics
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Size mismatch: expected {expected} entries, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Trajectory too short: {len} points, at least {min} required")]
    TooShort { len: usize, min: usize },

    #[error("Timestamps must be non-decreasing, violated at index {index}")]
    NonMonotonicTime { index: usize },

    #[error("Degenerate input: {0}")]
    Degenerate(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`]
    pub fn invalid(name: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for stop/move operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fails with [`Error::TooShort`] unless `len >= min`
pub fn ensure_len(len: usize, min: usize) -> Result<()> {
    if len < min {
        return Err(Error::TooShort { len, min });
    }
    Ok(())
}
