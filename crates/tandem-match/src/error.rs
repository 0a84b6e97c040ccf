//! Error types for series and tolerance validation.

/// Errors from timestamp series validation.
#[derive(Debug, thiserror::Error)]
pub enum SeriesError {
    /// Returned when a series contains NaN, infinity, or negative infinity.
    #[error("timestamp series contains non-finite value at index {index}")]
    NonFiniteTimestamp {
        /// Position of the first non-finite value found.
        index: usize,
    },

    /// Returned when a series is not in non-decreasing order.
    #[error("timestamp series is not non-decreasing at index {index}: {value} < {prev}")]
    NonMonotonic {
        /// Position of the first out-of-order value.
        index: usize,
        /// The preceding value.
        prev: f64,
        /// The offending value.
        value: f64,
    },
}

/// Errors from match tolerance validation.
#[derive(Debug, thiserror::Error)]
pub enum DeltaError {
    /// Returned when the tolerance is negative.
    #[error("match tolerance must be non-negative, got {0}")]
    Negative(f64),

    /// Returned when the tolerance is NaN or infinite.
    #[error("match tolerance must be finite")]
    NonFinite,
}
