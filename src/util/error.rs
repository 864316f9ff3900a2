//! Error types for buffer and mesh operations.

use thiserror::Error;

/// Main error type for buffer and mesh operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Element index or byte range violates the view's bounds
    #[error("index {index} out of range (count: {count})")]
    OutOfRange { index: usize, count: usize },

    /// Requested arity or kind is incompatible with the element format
    #[error("format mismatch: expected {expected}, got {actual}")]
    FormatMismatch { expected: String, actual: String },

    /// Construction-time format or view invariant violation
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Buffer memory could not be obtained
    #[error("allocation of {0} bytes failed")]
    AllocationFailure(usize),

    /// Fatal failure while rebuilding a required mesh buffer during a weld
    #[error("weld failed while rebuilding {stage}: {source}")]
    Weld {
        stage: &'static str,
        source: Box<Error>,
    },
}

impl Error {
    /// Create an invalid-format error from a message.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    /// Create a format-mismatch error from two format descriptions.
    pub fn mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::FormatMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Wrap a fatal per-stage weld failure.
    pub fn weld(stage: &'static str, source: Error) -> Self {
        Self::Weld {
            stage,
            source: Box::new(source),
        }
    }
}

/// Result type alias for buffer and mesh operations.
pub type Result<T> = std::result::Result<T, Error>;
