//! Match tolerance newtype.

use std::fmt;

use crate::error::DeltaError;

/// A validated, non-negative, finite match tolerance.
///
/// Two timestamps may be paired only if their absolute difference is at most
/// this value (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Delta(f64);

impl Delta {
    /// Create a new tolerance from a raw value.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DeltaError::NonFinite`] | `value` is NaN or infinite |
    /// | [`DeltaError::Negative`] | `value` is negative |
    pub fn new(value: f64) -> Result<Self, DeltaError> {
        if !value.is_finite() {
            return Err(DeltaError::NonFinite);
        }
        if value < 0.0 {
            return Err(DeltaError::Negative(value));
        }
        Ok(Self(value))
    }

    /// Return the raw tolerance value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for Delta {
    type Error = DeltaError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
