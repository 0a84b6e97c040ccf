//! Order-preserving matching of source-sharing derivative timestamp series.
//!
//! Pure algorithms — zero I/O. Two ordered series of timestamps are assumed
//! to describe the same underlying events as seen through two imperfect
//! channels; the matchers here compute a partial bijection between them that
//! never crosses (matched pairs keep their relative order) and never pairs
//! timestamps further apart than a tolerance `delta`. The optimal matchers
//! maximize the number of matched pairs first and minimize the summed
//! absolute difference second.
//!
//! Six strategies are provided, from the O(M log N) greedy baselines through
//! the O(M*N) dynamic-programming reference to the partitioning compositions
//! that cut large problems into provably independent pieces.

mod delta;
mod dynamic;
mod error;
mod greedy;
mod hybrid;
mod index;
mod pair;
mod partition;
mod series;
mod vertical;

pub use delta::Delta;
pub use dynamic::dynamic_timestamp_match;
pub use error::{DeltaError, SeriesError};
pub use greedy::{greedy_timestamp_match, popping_greedy_timestamp_match};
pub use hybrid::hybrid_timestamp_match;
pub use index::{Candidate, OrderedIndex};
pub use pair::{MatchPair, Matching};
pub use partition::{delta_partitioned_timestamp_match, MatcherKind};
pub use series::{TimestampSeries, TimestampSeriesView};
pub use vertical::vertical_aligned_timestamp_match;
