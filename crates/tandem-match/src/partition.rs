//! Gap-based partitioning matcher and the matcher strategy enum.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::delta::Delta;
use crate::dynamic::dynamic_timestamp_match;
use crate::greedy::{greedy_timestamp_match, popping_greedy_timestamp_match};
use crate::hybrid::hybrid_timestamp_match;
use crate::pair::{MatchPair, Matching};
use crate::series::TimestampSeriesView;
use crate::vertical::vertical_aligned_timestamp_match;

/// The closed set of matcher strategies.
///
/// Used to plug an inner matcher into
/// [`delta_partitioned_timestamp_match`]; the partitioned result is optimal
/// exactly when the inner strategy is (`Dynamic` or `Hybrid`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatcherKind {
    /// One-pass greedy with candidate consumption. Fastest, no guarantee.
    PoppingGreedy,
    /// One-pass greedy without consumption. Optimal only when it certifies.
    Greedy,
    /// Full dynamic programming. Always optimal.
    Dynamic,
    /// Greedy with dynamic fallback. Always optimal (default).
    #[default]
    Hybrid,
    /// Vertical-anchored partitioning over the hybrid. No guarantee.
    VerticalAligned,
}

impl MatcherKind {
    /// Run this strategy on the given series pair.
    #[must_use]
    pub fn run(
        self,
        series1: TimestampSeriesView<'_>,
        series2: TimestampSeriesView<'_>,
        delta: Delta,
    ) -> Matching {
        match self {
            Self::PoppingGreedy => popping_greedy_timestamp_match(series1, series2, delta),
            Self::Greedy => greedy_timestamp_match(series1, series2, delta),
            Self::Dynamic => dynamic_timestamp_match(series1, series2, delta),
            Self::Hybrid => hybrid_timestamp_match(series1, series2, delta),
            Self::VerticalAligned => vertical_aligned_timestamp_match(series1, series2, delta),
        }
    }
}

/// Match two series by splitting the first at gaps wider than `2 * delta`.
///
/// A gap between consecutive first-series timestamps exceeding `2 * delta`
/// proves that no legal pair can span it: given non-decreasing inputs, any
/// second-series candidate within `delta` of one side is more than `delta`
/// from everything on the other. The first series splits into contiguous
/// buckets at such gaps, the second series is cut at the same value
/// boundaries (each bucket takes the candidates within `delta` of its span,
/// which are provably disjoint between buckets), and each bucket pair is
/// solved independently by `inner` and concatenated with index offsets.
///
/// Buckets have no data dependency and are dispatched in parallel; the
/// reassembled result is identical to the sequential composition. Not
/// symmetric: swapping the two series partitions along the other series and
/// may produce a different (non-mirrored) matching.
#[must_use]
#[instrument(skip(series1, series2), fields(m = series1.len(), n = series2.len()))]
pub fn delta_partitioned_timestamp_match(
    series1: TimestampSeriesView<'_>,
    series2: TimestampSeriesView<'_>,
    delta: Delta,
    inner: MatcherKind,
) -> Matching {
    let a = series1.as_slice();
    let b = series2.as_slice();
    if a.is_empty() || b.is_empty() {
        return Matching::empty();
    }

    // Bucket boundaries: indices where the gap to the predecessor exceeds 2δ.
    let mut starts = vec![0usize];
    for i in 1..a.len() {
        if a[i] - a[i - 1] > 2.0 * delta.value() {
            starts.push(i);
        }
    }
    starts.push(a.len());
    debug!(buckets = starts.len() - 1, "partitioned first series");

    let bucket_pairs: Vec<Vec<MatchPair>> = starts
        .par_windows(2)
        .map(|w| {
            let (lo, hi) = (w[0], w[1]);
            let lo_val = a[lo] - delta.value();
            let hi_val = a[hi - 1] + delta.value();
            let start = b.partition_point(|&v| v < lo_val);
            let end = b.partition_point(|&v| v <= hi_val);
            let sub = inner.run(
                TimestampSeriesView::new_unchecked(&a[lo..hi]),
                TimestampSeriesView::new_unchecked(&b[start..end]),
                delta,
            );
            sub.pairs()
                .iter()
                .map(|p| MatchPair {
                    i: p.i + lo,
                    j: p.j + start,
                    cost: p.cost,
                })
                .collect()
        })
        .collect();

    Matching::new(bucket_pairs.concat())
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
    fn wide_gap_splits_into_singleton_buckets() {
        // Gap of 100 > 2 * 5, so each first-series entry forms its own bucket.
        let m = delta_partitioned_timestamp_match(
            view(&[0.0, 100.0]),
            view(&[2.0, 99.0]),
            delta(5.0),
            MatcherKind::Hybrid,
        );
        assert_eq!(index_pairs(&m), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn partitioned_dynamic_equals_plain_dynamic() {
        let s1 = [1.0, 2.0, 3.0, 50.0, 51.0, 120.0];
        let s2 = [0.5, 2.2, 3.1, 49.0, 52.0, 119.0, 121.0];
        let d = delta(2.0);
        let partitioned =
            delta_partitioned_timestamp_match(view(&s1), view(&s2), d, MatcherKind::Dynamic);
        let plain = dynamic_timestamp_match(view(&s1), view(&s2), d);
        assert_eq!(partitioned.len(), plain.len());
        assert!((partitioned.error() - plain.error()).abs() < 1e-12);
    }

    #[test]
    fn gap_exactly_two_delta_does_not_split() {
        // Gap of 10 == 2 * 5 is not strictly greater; a single bucket covers
        // both entries and the shared candidate is matched exactly once.
        let m = delta_partitioned_timestamp_match(
            view(&[0.0, 10.0]),
            view(&[5.0]),
            delta(5.0),
            MatcherKind::Dynamic,
        );
        assert_eq!(m.len(), 1);
        assert!((m.error() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn second_series_entries_between_buckets_stay_unmatched() {
        let m = delta_partitioned_timestamp_match(
            view(&[0.0, 100.0]),
            view(&[1.0, 50.0, 99.5]),
            delta(2.0),
            MatcherKind::Hybrid,
        );
        assert_eq!(index_pairs(&m), vec![(0, 0), (1, 2)]);
    }

    #[test]
    fn empty_series() {
        let m = delta_partitioned_timestamp_match(
            view(&[]),
            view(&[5.0, 6.0]),
            delta(1.0),
            MatcherKind::Hybrid,
        );
        assert!(m.is_empty());
    }

    #[test]
    fn strategies_all_produce_valid_matchings() {
        let s1 = [1.0, 2.0, 8.0, 9.0, 30.0];
        let s2 = [1.5, 2.5, 8.5, 29.0, 31.0];
        let d = delta(1.5);
        for kind in [
            MatcherKind::PoppingGreedy,
            MatcherKind::Greedy,
            MatcherKind::Dynamic,
            MatcherKind::Hybrid,
            MatcherKind::VerticalAligned,
        ] {
            let m = delta_partitioned_timestamp_match(view(&s1), view(&s2), d, kind);
            for w in m.pairs().windows(2) {
                assert!(w[0].i < w[1].i && w[0].j < w[1].j, "{kind:?} crossed");
            }
            for p in m.pairs() {
                assert!(p.cost <= d.value(), "{kind:?} exceeded delta");
            }
        }
    }

    #[test]
    fn default_kind_is_hybrid() {
        assert_eq!(MatcherKind::default(), MatcherKind::Hybrid);
    }
}
