use thiserror::Error;

/// Errors returned by curve math and path operations.
///
/// Structural refusals such as deleting the last segment are not errors;
/// those operations return `false` instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplineError {
    /// An argument was outside the range the operation accepts.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// An index was outside the current bounds.
    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The offending index
        index: usize,
        /// The length of the indexed sequence
        len: usize,
    },
}

/// Result alias used throughout the spline module.
pub type SplineResult<T> = Result<T, SplineError>;

impl SplineError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Check `index < len`, returning `IndexOutOfRange` otherwise.
    pub(crate) fn check_index(index: usize, len: usize) -> SplineResult<()> {
        if index < len {
            Ok(())
        } else {
            Err(Self::IndexOutOfRange { index, len })
        }
    }
}
