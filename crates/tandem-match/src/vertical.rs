//! Vertical-anchored partitioning matcher.

use tracing::instrument;

use crate::delta::Delta;
use crate::hybrid::hybrid_timestamp_match;
use crate::pair::{MatchPair, Matching};
use crate::series::TimestampSeriesView;

/// Match two series by partitioning at verticals.
///
/// A vertical is a pair of indices whose timestamps are exactly equal (value
/// equality, not within-delta). Verticals are forced into the result as
/// zero-cost pairs and act as hard partition boundaries; the regions
/// between and around them are matched independently with
/// [`hybrid_timestamp_match`] and concatenated.
///
/// Because a forced vertical is never reconsidered, overall optimality is
/// not guaranteed — leaving an anchor unmatched can occasionally admit a
/// better global matching.
#[must_use]
#[instrument(skip(series1, series2), fields(m = series1.len(), n = series2.len()))]
pub fn vertical_aligned_timestamp_match(
    series1: TimestampSeriesView<'_>,
    series2: TimestampSeriesView<'_>,
    delta: Delta,
) -> Matching {
    let a = series1.as_slice();
    let b = series2.as_slice();
    if a.is_empty() || b.is_empty() {
        return Matching::empty();
    }

    // Synchronous scan for exactly-equal pairs.
    let mut anchors = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            anchors.push((i, j));
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            i += 1;
        } else {
            j += 1;
        }
    }

    let mut pairs = Vec::new();
    let (mut lo1, mut lo2) = (0usize, 0usize);
    for &(ai, aj) in &anchors {
        solve_segment(a, b, lo1..ai, lo2..aj, delta, &mut pairs);
        pairs.push(MatchPair {
            i: ai,
            j: aj,
            cost: 0.0,
        });
        lo1 = ai + 1;
        lo2 = aj + 1;
    }
    solve_segment(a, b, lo1..a.len(), lo2..b.len(), delta, &mut pairs);

    Matching::new(pairs)
}

/// Match one inter-anchor region and append its offset-adjusted pairs.
fn solve_segment(
    a: &[f64],
    b: &[f64],
    r1: std::ops::Range<usize>,
    r2: std::ops::Range<usize>,
    delta: Delta,
    pairs: &mut Vec<MatchPair>,
) {
    if r1.is_empty() || r2.is_empty() {
        return;
    }
    let (off1, off2) = (r1.start, r2.start);
    let sub = hybrid_timestamp_match(
        TimestampSeriesView::new_unchecked(&a[r1]),
        TimestampSeriesView::new_unchecked(&b[r2]),
        delta,
    );
    pairs.extend(sub.pairs().iter().map(|p| MatchPair {
        i: p.i + off1,
        j: p.j + off2,
        cost: p.cost,
    }));
}
