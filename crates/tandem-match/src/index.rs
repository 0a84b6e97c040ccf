//! Ordered, removable candidate index over the second series.

use std::collections::{BTreeSet, HashSet};
use std::ops::Bound;

use crate::delta::Delta;
use crate::series::TimestampSeriesView;

/// Total-order key over finite timestamps.
///
/// Series validation guarantees all values are finite, so [`f64::total_cmp`]
/// is a proper total order here.
#[derive(Debug, Clone, Copy)]
struct TotalF64(f64);

impl PartialEq for TotalF64 {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0).is_eq()
    }
}

impl Eq for TotalF64 {}

impl PartialOrd for TotalF64 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TotalF64 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// A live entry in the index: a second-series timestamp and its original position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// The timestamp value.
    pub value: f64,
    /// Original index in the second series.
    pub index: usize,
}

/// A mutable set of `(value, original_index)` entries ordered by value,
/// supporting O(log N) nearest-neighbor queries and removal.
///
/// Tie policy for equidistant candidates: the smaller value wins, then the
/// smaller original index. All greedy matchers inherit this policy.
#[derive(Debug, Clone)]
pub struct OrderedIndex {
    entries: BTreeSet<(TotalF64, usize)>,
    /// Original value per index, for removal lookups.
    values: Vec<f64>,
    live: Vec<bool>,
}

impl OrderedIndex {
    /// Build an index over every entry of the given series.
    #[must_use]
    pub fn new(series: TimestampSeriesView<'_>) -> Self {
        let values: Vec<f64> = series.as_slice().to_vec();
        let entries = values
            .iter()
            .enumerate()
            .map(|(index, &value)| (TotalF64(value), index))
            .collect();
        let live = vec![true; values.len()];
        Self {
            entries,
            values,
            live,
        }
    }

    /// Return the number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return true if no entries remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the live entry closest to `target` among those within `delta`,
    /// or `None` if no candidate qualifies.
    ///
    /// `None` is an expected, frequent outcome, not a failure. Equidistant
    /// candidates resolve to the smaller value, then the smaller index.
    #[must_use]
    pub fn nearest_within(&self, target: f64, delta: Delta) -> Option<Candidate> {
        let below = self
            .entries
            .range(..=(TotalF64(target), usize::MAX))
            .next_back()
            .copied();
        let above = self
            .entries
            .range((
                Bound::Excluded((TotalF64(target), usize::MAX)),
                Bound::Unbounded,
            ))
            .next()
            .copied();
        self.pick(target, delta, below, above)
            .map(|(value, _)| self.canonical(value))
    }

    /// Remove the entry with the given original index. Returns `false` if it
    /// is absent (already removed or out of range).
    pub fn remove(&mut self, original_index: usize) -> bool {
        if original_index >= self.live.len() || !self.live[original_index] {
            return false;
        }
        self.live[original_index] = false;
        self.entries
            .remove(&(TotalF64(self.values[original_index]), original_index))
    }

    /// Remove every live entry with an original index below `original_index`.
    ///
    /// Relies on the source series being non-decreasing: all such entries sort
    /// strictly before `(value[original_index], original_index)`, so they form
    /// a contiguous prefix of the set. Each entry is purged at most once over
    /// the index's lifetime, so a full popping scan stays O(N log N).
    pub(crate) fn purge_below(&mut self, original_index: usize) {
        if original_index >= self.values.len() {
            return;
        }
        let bound = (TotalF64(self.values[original_index]), original_index);
        let stale: Vec<(TotalF64, usize)> = self.entries.range(..bound).copied().collect();
        for key in stale {
            self.live[key.1] = false;
            self.entries.remove(&key);
        }
    }

    /// Like [`nearest_within`][Self::nearest_within], but skipping the given
    /// original indices. Used by the non-popping greedy scan to re-search
    /// after a lost conflict.
    pub(crate) fn nearest_within_excluding(
        &self,
        target: f64,
        delta: Delta,
        exclude: &HashSet<usize>,
    ) -> Option<Candidate> {
        let below = self
            .entries
            .range(..=(TotalF64(target), usize::MAX))
            .rev()
            .find(|(v, idx)| target - v.0 > delta.value() || !exclude.contains(idx))
            .copied();
        let above = self
            .entries
            .range((
                Bound::Excluded((TotalF64(target), usize::MAX)),
                Bound::Unbounded,
            ))
            .find(|(v, idx)| v.0 - target > delta.value() || !exclude.contains(idx))
            .copied();
        self.pick(target, delta, below, above)
            .map(|(value, _)| self.canonical_excluding(value, exclude))
    }

    /// Choose between the nearest below-or-equal and above candidates.
    /// Returns the winning raw entry, before index canonicalization.
    fn pick(
        &self,
        target: f64,
        delta: Delta,
        below: Option<(TotalF64, usize)>,
        above: Option<(TotalF64, usize)>,
    ) -> Option<(f64, usize)> {
        let below = below.filter(|(v, _)| target - v.0 <= delta.value());
        let above = above.filter(|(v, _)| v.0 - target <= delta.value());
        match (below, above) {
            (None, None) => None,
            (Some((v, idx)), None) | (None, Some((v, idx))) => Some((v.0, idx)),
            (Some((vb, ib)), Some((va, ia))) => {
                // Tie resolves to the below side: smaller value wins.
                if target - vb.0 <= va.0 - target {
                    Some((vb.0, ib))
                } else {
                    Some((va.0, ia))
                }
            }
        }
    }

    /// Return the live entry with the smallest index for the given value.
    ///
    /// The range walks in `pick` may land on an arbitrary index among
    /// duplicate values; the documented tie policy demands the smallest.
    fn canonical(&self, value: f64) -> Candidate {
        let (v, index) = self
            .entries
            .range((TotalF64(value), 0)..=(TotalF64(value), usize::MAX))
            .next()
            .copied()
            .expect("picked value must have a live entry");
        Candidate { value: v.0, index }
    }

    fn canonical_excluding(&self, value: f64, exclude: &HashSet<usize>) -> Candidate {
        let (v, index) = self
            .entries
            .range((TotalF64(value), 0)..=(TotalF64(value), usize::MAX))
            .find(|(_, idx)| !exclude.contains(idx))
            .copied()
            .expect("picked value must have a non-excluded live entry");
        Candidate { value: v.0, index }
    }
}
