//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// Lower and upper bounds of a space have different lengths.
    #[error("Bounds have different lengths: low has {low}, high has {high}")]
    ShapeMismatch {
        /// Length of the lower bound.
        low: usize,
        /// Length of the upper bound.
        high: usize,
    },

    /// Lower bound exceeds upper bound, or a bound is NaN.
    #[error("Invalid bounds at dimension {dim}: low = {low}, high = {high}")]
    InvalidBounds {
        /// Dimension where the bounds are inconsistent.
        dim: usize,
        /// Lower bound.
        low: f32,
        /// Upper bound.
        high: f32,
    },
}
