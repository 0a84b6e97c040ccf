//! Match pair and matching result types.

use serde::Serialize;

/// A single matched pair, mapping index `i` in the first series to index `j`
/// in the second series at absolute cost `|series1[i] - series2[j]|`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchPair {
    /// Index in the first timestamp series.
    pub i: usize,
    /// Index in the second timestamp series.
    pub j: usize,
    /// Absolute difference between the matched timestamps.
    pub cost: f64,
}

/// An order-preserving partial bijection between two timestamp series.
///
/// Pairs are stored in ascending order of `i` (and therefore of `j`). Each
/// index of either series appears in at most one pair, and every pair's cost
/// is within the tolerance the matching was computed under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matching(Vec<MatchPair>);

impl Matching {
    /// Create a matching from pairs already sorted ascending by `i`.
    pub(crate) fn new(pairs: Vec<MatchPair>) -> Self {
        debug_assert!(
            pairs.windows(2).all(|w| w[0].i < w[1].i && w[0].j < w[1].j),
            "matching pairs must be strictly increasing in both indices"
        );
        Self(pairs)
    }

    /// Create an empty matching.
    pub(crate) fn empty() -> Self {
        Self(Vec::new())
    }

    /// Return the matched pairs, ascending by first-series index.
    #[must_use]
    pub fn pairs(&self) -> &[MatchPair] {
        &self.0
    }

    /// Return the number of matched pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if no pairs were matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the total matching error: the sum of all pair costs.
    #[must_use]
    pub fn error(&self) -> f64 {
        self.0.iter().map(|p| p.cost).sum()
    }
}

impl<'a> IntoIterator for &'a Matching {
    type Item = &'a MatchPair;
    type IntoIter = std::slice::Iter<'a, MatchPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(i: usize, j: usize, cost: f64) -> MatchPair {
        MatchPair { i, j, cost }
    }

    #[test]
    fn error_sums_costs() {
        let m = Matching::new(vec![pair(0, 0, 1.0), pair(1, 1, 0.5), pair(2, 2, 1.5)]);
        assert_eq!(m.len(), 3);
        assert!((m.error() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_matching() {
        let m = Matching::empty();
        assert!(m.is_empty());
        assert_eq!(m.len(), 0);
        assert_eq!(m.error(), 0.0);
    }

    #[test]
    fn iteration_order() {
        let m = Matching::new(vec![pair(0, 1, 0.0), pair(2, 3, 0.0)]);
        let indices: Vec<(usize, usize)> = (&m).into_iter().map(|p| (p.i, p.j)).collect();
        assert_eq!(indices, vec![(0, 1), (2, 3)]);
    }
}
