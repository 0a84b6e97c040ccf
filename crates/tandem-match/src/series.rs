//! Timestamp series types with validation guarantees.

use std::ops::Index;

use crate::error::SeriesError;

/// Owned, validated timestamp series. Guaranteed finite and non-decreasing.
///
/// An empty series is valid: matching an empty series against anything
/// produces an empty matching.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampSeries(Vec<f64>);

impl TimestampSeries {
    /// Create a new timestamp series, validating that all values are finite
    /// and the sequence is non-decreasing.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SeriesError::NonFiniteTimestamp`] | Any value is NaN or infinite |
    /// | [`SeriesError::NonMonotonic`] | Any value is smaller than its predecessor |
    pub fn new(values: Vec<f64>) -> Result<Self, SeriesError> {
        validate(&values)?;
        Ok(Self(values))
    }

    /// Borrow this series as a zero-copy view.
    #[must_use]
    pub fn as_view(&self) -> TimestampSeriesView<'_> {
        TimestampSeriesView::new_unchecked(&self.0)
    }

    /// Return the number of timestamps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the series has no timestamps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume and return the inner vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl AsRef<[f64]> for TimestampSeries {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for TimestampSeries {
    type Error = SeriesError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

/// Borrowed, validated view into a timestamp series. Zero-copy reference.
#[derive(Debug, Clone, Copy)]
pub struct TimestampSeriesView<'a>(&'a [f64]);

impl<'a> TimestampSeriesView<'a> {
    /// Create a new view, validating that all values are finite and the
    /// sequence is non-decreasing.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`SeriesError::NonFiniteTimestamp`] | Any value is NaN or infinite |
    /// | [`SeriesError::NonMonotonic`] | Any value is smaller than its predecessor |
    pub fn new(slice: &'a [f64]) -> Result<Self, SeriesError> {
        validate(slice)?;
        Ok(Self(slice))
    }

    /// Create a view without validation. For internal use where data is
    /// already validated — contiguous sub-slices of a valid series are valid.
    pub(crate) fn new_unchecked(slice: &'a [f64]) -> Self {
        Self(slice)
    }

    /// Return the underlying slice.
    #[must_use]
    pub fn as_slice(&self) -> &'a [f64] {
        self.0
    }

    /// Return the number of timestamps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the view has no timestamps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<usize> for TimestampSeriesView<'_> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl AsRef<[f64]> for TimestampSeriesView<'_> {
    fn as_ref(&self) -> &[f64] {
        self.0
    }
}

fn validate(values: &[f64]) -> Result<(), SeriesError> {
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(SeriesError::NonFiniteTimestamp { index });
    }
    if let Some(index) = values.windows(2).position(|w| w[1] < w[0]) {
        return Err(SeriesError::NonMonotonic {
            index: index + 1,
            prev: values[index],
            value: values[index + 1],
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_empty() {
        let ts = TimestampSeries::new(vec![]).unwrap();
        assert!(ts.is_empty());
        assert_eq!(ts.len(), 0);
    }

    #[test]
    fn accepts_non_decreasing() {
        let ts = TimestampSeries::new(vec![1.0, 2.0, 2.0, 5.0]).unwrap();
        assert_eq!(ts.len(), 4);
        assert_eq!(ts.as_ref(), &[1.0, 2.0, 2.0, 5.0]);
    }

    #[test]
    fn rejects_nan() {
        let result = TimestampSeries::new(vec![1.0, f64::NAN, 3.0]);
        assert!(matches!(
            result,
            Err(SeriesError::NonFiniteTimestamp { index: 1 })
        ));
    }

    #[test]
    fn rejects_infinity() {
        let result = TimestampSeries::new(vec![1.0, 2.0, f64::INFINITY]);
        assert!(matches!(
            result,
            Err(SeriesError::NonFiniteTimestamp { index: 2 })
        ));
    }

    #[test]
    fn rejects_decreasing() {
        let result = TimestampSeries::new(vec![1.0, 3.0, 2.0]);
        assert!(matches!(result, Err(SeriesError::NonMonotonic { index: 2, .. })));
    }

    #[test]
    fn non_finite_reported_before_order() {
        // A NaN makes order comparisons meaningless; the finiteness check fires first.
        let result = TimestampSeries::new(vec![5.0, f64::NAN, 1.0]);
        assert!(matches!(
            result,
            Err(SeriesError::NonFiniteTimestamp { index: 1 })
        ));
    }

    #[test]
    fn view_rejects_decreasing() {
        let data = [3.0, 1.0];
        let result = TimestampSeriesView::new(&data);
        assert!(matches!(result, Err(SeriesError::NonMonotonic { index: 1, .. })));
    }

    #[test]
    fn view_accepts_empty() {
        let view = TimestampSeriesView::new(&[]).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn view_indexing() {
        let data = [10.0, 20.0, 30.0];
        let view = TimestampSeriesView::new(&data).unwrap();
        assert_eq!(view[0], 10.0);
        assert_eq!(view[2], 30.0);
    }

    #[test]
    fn as_view_roundtrip() {
        let ts = TimestampSeries::new(vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(ts.as_view().as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn try_from_vec() {
        let ts: Result<TimestampSeries, _> = vec![1.0, 2.0].try_into();
        assert!(ts.is_ok());
    }
}
