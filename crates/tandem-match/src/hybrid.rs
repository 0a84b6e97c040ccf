//! Greedy-first matcher with a dynamic-programming fallback.

use tracing::{debug, instrument};

use crate::delta::Delta;
use crate::dynamic::dynamic_timestamp_match;
use crate::greedy::greedy_scan;
use crate::pair::Matching;
use crate::series::TimestampSeriesView;

/// Match two series optimally, trying the greedy scan first.
///
/// When the greedy scan certifies its result (conflict-free and
/// order-preserving), that result is returned directly; otherwise the full
/// dynamic-programming matcher runs. Always optimal, with an expected
/// runtime near O(M log N) on inputs where the greedy pass is
/// self-consistent and O(M*N) in the worst case.
#[must_use]
#[instrument(skip(series1, series2), fields(m = series1.len(), n = series2.len()))]
pub fn hybrid_timestamp_match(
    series1: TimestampSeriesView<'_>,
    series2: TimestampSeriesView<'_>,
    delta: Delta,
) -> Matching {
    let (matching, certified) = greedy_scan(series1, series2, delta);
    if certified {
        debug!(pairs = matching.len(), "greedy scan certified");
        return matching;
    }
    debug!("greedy scan uncertified, falling back to dynamic matcher");
    dynamic_timestamp_match(series1, series2, delta)
}
