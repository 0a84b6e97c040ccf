//! Dynamic-programming optimal matcher.

use tracing::instrument;

use crate::delta::Delta;
use crate::pair::{MatchPair, Matching};
use crate::series::TimestampSeriesView;

// Direction bits for traceback.
const START: u8 = 0;
const DIAGONAL: u8 = 1;
const UP: u8 = 2;
const LEFT: u8 = 3;

/// Best value for a prefix sub-problem, compared lexicographically:
/// larger size wins, then smaller error.
#[derive(Debug, Clone, Copy)]
struct Cell {
    size: u32,
    error: f64,
}

impl Cell {
    const ZERO: Self = Self {
        size: 0,
        error: 0.0,
    };

    fn beats(self, other: Self) -> bool {
        self.size > other.size || (self.size == other.size && self.error < other.error)
    }
}

/// Match two series optimally using dynamic programming.
///
/// Builds a flat row-major `(M+1) x (N+1)` table where cell `(i, j)` holds
/// the best achievable `(size, error)` for matching `series1[0..i)` against
/// `series2[0..j)`, plus a parallel direction array for traceback. A pair is
/// legal when its cost is at most `delta`. Among all order-preserving
/// matchings this maximizes pair count first, then minimizes total error.
/// Runs in O(M*N) time and memory.
///
/// Ties between transitions resolve deterministically: extend by a pair,
/// then skip a first-series entry, then skip a second-series entry.
#[must_use]
#[instrument(skip(series1, series2), fields(m = series1.len(), n = series2.len()))]
pub fn dynamic_timestamp_match(
    series1: TimestampSeriesView<'_>,
    series2: TimestampSeriesView<'_>,
    delta: Delta,
) -> Matching {
    let a = series1.as_slice();
    let b = series2.as_slice();
    let m = a.len();
    let n = b.len();
    if m == 0 || n == 0 {
        return Matching::empty();
    }

    let width = n + 1;
    let mut cells = vec![Cell::ZERO; (m + 1) * width];
    let mut dirs = vec![START; (m + 1) * width];

    for i in 0..=m {
        for j in 0..=n {
            if i == 0 && j == 0 {
                continue;
            }
            let mut best: Option<(Cell, u8)> = None;

            if i > 0 && j > 0 {
                let cost = (a[i - 1] - b[j - 1]).abs();
                if cost <= delta.value() {
                    let prev = cells[(i - 1) * width + (j - 1)];
                    best = Some((
                        Cell {
                            size: prev.size + 1,
                            error: prev.error + cost,
                        },
                        DIAGONAL,
                    ));
                }
            }
            if i > 0 {
                let up = cells[(i - 1) * width + j];
                if best.map_or(true, |(c, _)| up.beats(c)) {
                    best = Some((up, UP));
                }
            }
            if j > 0 {
                let left = cells[i * width + (j - 1)];
                if best.map_or(true, |(c, _)| left.beats(c)) {
                    best = Some((left, LEFT));
                }
            }

            // At least one of up/left exists for every cell but (0, 0).
            let (cell, dir) = best.expect("unreachable: no transition candidate");
            cells[i * width + j] = cell;
            dirs[i * width + j] = dir;
        }
    }

    // Traceback from (m, n) to (0, 0).
    let mut pairs = Vec::with_capacity(cells[m * width + n].size as usize);
    let mut i = m;
    let mut j = n;
    loop {
        match dirs[i * width + j] {
            DIAGONAL => {
                pairs.push(MatchPair {
                    i: i - 1,
                    j: j - 1,
                    cost: (a[i - 1] - b[j - 1]).abs(),
                });
                i -= 1;
                j -= 1;
            }
            UP => i -= 1,
            LEFT => j -= 1,
            START => break,
            _ => unreachable!("invalid direction byte"),
        }
    }
    pairs.reverse();
    Matching::new(pairs)
}
