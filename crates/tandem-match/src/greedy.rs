//! One-pass greedy matchers.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::instrument;

use crate::delta::Delta;
use crate::index::OrderedIndex;
use crate::pair::{MatchPair, Matching};
use crate::series::TimestampSeriesView;

/// Match two series greedily, consuming second-series candidates as they are
/// used.
///
/// For each first-series index in increasing order, the nearest unconsumed
/// candidate within `delta` and past the last-consumed second-series index is
/// popped and paired. A locally nearest pick can block a better later
/// pairing, so this is the cheapest baseline with no optimality guarantee.
/// Runs in O(M log N).
#[must_use]
#[instrument(skip(series1, series2), fields(m = series1.len(), n = series2.len()))]
pub fn popping_greedy_timestamp_match(
    series1: TimestampSeriesView<'_>,
    series2: TimestampSeriesView<'_>,
    delta: Delta,
) -> Matching {
    let mut index = OrderedIndex::new(series2);
    let mut pairs = Vec::new();
    for (i, &target) in series1.as_slice().iter().enumerate() {
        let Some(c) = index.nearest_within(target, delta) else {
            continue;
        };
        index.remove(c.index);
        // Entries before the consumed index would cross this pair; they can
        // never be used again.
        index.purge_below(c.index);
        pairs.push(MatchPair {
            i,
            j: c.index,
            cost: (target - c.value).abs(),
        });
    }
    Matching::new(pairs)
}

/// Match two series greedily without consuming candidates.
///
/// Each first-series index tentatively claims its nearest candidate; when two
/// indices contest the same candidate, the cheaper pairing keeps it and the
/// displaced index re-searches among the remaining candidates. If the scan
/// finishes with no conflicts and an order-preserving assignment, the result
/// is optimal; otherwise a valid but possibly sub-optimal matching is
/// returned. Use [`hybrid_timestamp_match`][crate::hybrid_timestamp_match]
/// when optimality is required.
#[must_use]
#[instrument(skip(series1, series2), fields(m = series1.len(), n = series2.len()))]
pub fn greedy_timestamp_match(
    series1: TimestampSeriesView<'_>,
    series2: TimestampSeriesView<'_>,
    delta: Delta,
) -> Matching {
    greedy_scan(series1, series2, delta).0
}

/// The non-popping greedy scan. Returns the matching and whether it is
/// certified optimal.
///
/// Certification requires a conflict-free scan (every index took its globally
/// nearest in-delta candidate on the first try) plus an order-preserving
/// result: under those conditions the matching is simultaneously
/// maximum-size (every matchable index is matched) and minimum-error (every
/// pair cost is that index's lower bound). Any conflict, even one resolved by
/// displacement, voids the certificate.
pub(crate) fn greedy_scan(
    series1: TimestampSeriesView<'_>,
    series2: TimestampSeriesView<'_>,
    delta: Delta,
) -> (Matching, bool) {
    let targets = series1.as_slice();
    let m = targets.len();
    let index = OrderedIndex::new(series2);

    // assignment[i] = (second-series index, cost); claims is its inverse.
    let mut assignment: Vec<Option<(usize, f64)>> = vec![None; m];
    let mut claims: HashMap<usize, (usize, f64)> = HashMap::new();
    let mut blocked: Vec<HashSet<usize>> = vec![HashSet::new(); m];
    let mut queue: VecDeque<usize> = (0..m).collect();
    let mut conflicted = false;

    while let Some(i) = queue.pop_front() {
        let target = targets[i];
        let Some(c) = index.nearest_within_excluding(target, delta, &blocked[i]) else {
            continue;
        };
        let cost = (target - c.value).abs();
        match claims.get(&c.index).copied() {
            None => {
                claims.insert(c.index, (i, cost));
                assignment[i] = Some((c.index, cost));
            }
            Some((holder, held_cost)) => {
                conflicted = true;
                if cost < held_cost {
                    // Displace the current holder and let it re-search.
                    claims.insert(c.index, (i, cost));
                    assignment[i] = Some((c.index, cost));
                    assignment[holder] = None;
                    blocked[holder].insert(c.index);
                    queue.push_back(holder);
                } else {
                    blocked[i].insert(c.index);
                    queue.push_back(i);
                }
            }
        }
    }

    let tentative: Vec<MatchPair> = assignment
        .iter()
        .enumerate()
        .filter_map(|(i, a)| a.map(|(j, cost)| MatchPair { i, j, cost }))
        .collect();
    let ordered = tentative.windows(2).all(|w| w[0].j < w[1].j);
    let certified = !conflicted && ordered;

    if ordered {
        (Matching::new(tentative), certified)
    } else {
        // Crossing pairs violate the matching contract; keep the first of
        // each crossing, dropping the rest.
        let mut kept = Vec::with_capacity(tentative.len());
        let mut last_j = None;
        for pair in tentative {
            if last_j.map_or(true, |j| pair.j > j) {
                last_j = Some(pair.j);
                kept.push(pair);
            }
        }
        (Matching::new(kept), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(values: &[f64]) -> TimestampSeriesView<'_> {
        TimestampSeriesView::new(values).unwrap()
    }

    fn delta(v: f64) -> Delta {
        Delta::new(v).unwrap()
    }

    fn index_pairs(m: &Matching) -> Vec<(usize, usize)> {
        m.pairs().iter().map(|p| (p.i, p.j)).collect()
    }

    #[test]
    fn popping_matches_aligned_series() {
        let m = popping_greedy_timestamp_match(
            view(&[10.0, 20.0, 30.0]),
            view(&[11.0, 21.0, 29.0]),
            delta(2.0),
        );
        assert_eq!(index_pairs(&m), vec![(0, 0), (1, 1), (2, 2)]);
        assert!((m.error() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn popping_leaves_unmatchable_unmatched() {
        let m = popping_greedy_timestamp_match(view(&[10.0, 50.0]), view(&[11.0]), delta(2.0));
        assert_eq!(index_pairs(&m), vec![(0, 0)]);
        assert!((m.error() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn popping_empty_series() {
        let m = popping_greedy_timestamp_match(view(&[]), view(&[5.0, 6.0]), delta(1.0));
        assert!(m.is_empty());
        let m = popping_greedy_timestamp_match(view(&[5.0, 6.0]), view(&[]), delta(1.0));
        assert!(m.is_empty());
    }

    #[test]
    fn popping_can_be_suboptimal() {
        // 0 grabs the candidate at 1.0 that 1 needs; 1 is left unmatched.
        let m = popping_greedy_timestamp_match(view(&[0.0, 1.0]), view(&[1.0]), delta(1.0));
        assert_eq!(m.len(), 1);
        assert_eq!(m.pairs()[0].i, 0);
    }

    #[test]
    fn popping_respects_order() {
        // The nearest candidate for index 1 (value 10.0) by value alone would
        // be at j=0, but j=0 is consumed by index 0 first.
        let m = popping_greedy_timestamp_match(
            view(&[9.0, 10.0]),
            view(&[9.5, 11.0]),
            delta(3.0),
        );
        assert_eq!(index_pairs(&m), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn greedy_certifies_conflict_free_scan() {
        let (m, certified) = greedy_scan(
            view(&[10.0, 20.0, 30.0]),
            view(&[11.0, 21.0, 29.0]),
            delta(2.0),
        );
        assert!(certified);
        assert_eq!(index_pairs(&m), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn greedy_conflict_voids_certificate() {
        // Both first-series values are nearest to the single candidate.
        let (m, certified) = greedy_scan(view(&[0.0, 1.0]), view(&[1.0]), delta(2.0));
        assert!(!certified);
        // The cheaper pairing keeps the candidate.
        assert_eq!(index_pairs(&m), vec![(1, 0)]);
    }

    #[test]
    fn greedy_displacement_resolves_to_cheaper_pair() {
        // Both contest the candidate at 5.0; index 1 is closer and displaces
        // index 0, which then falls back to the candidate at 2.0.
        let (m, certified) = greedy_scan(view(&[4.0, 5.0]), view(&[2.0, 5.0]), delta(3.0));
        assert!(!certified);
        assert_eq!(index_pairs(&m), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn greedy_empty_series_certifies() {
        let (m, certified) = greedy_scan(view(&[]), view(&[1.0]), delta(1.0));
        assert!(m.is_empty());
        assert!(certified);
    }

    #[test]
    fn greedy_public_result_is_order_preserving() {
        let m = greedy_timestamp_match(
            view(&[0.0, 0.5, 1.0, 7.0]),
            view(&[0.4, 0.6, 6.9]),
            delta(1.0),
        );
        let pairs = m.pairs();
        for w in pairs.windows(2) {
            assert!(w[0].i < w[1].i && w[0].j < w[1].j);
        }
    }
}
