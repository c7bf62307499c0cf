//! Splits the output rows into one contiguous block per worker.

use std::fmt;

use crate::error::{EngineError, Result};

/// Half-open interval `[start, end)` of row indices owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted range [{}, {})", start, end);
        RowRange { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for RowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Number of workers that will actually run for an `n`-row matrix.
///
/// Zero workers or an empty matrix are rejected; more workers than rows
/// are clamped to one row each.
pub fn effective_workers(n: usize, requested: usize) -> Result<usize> {
    if requested == 0 {
        return Err(EngineError::InvalidWorkerCount(requested));
    }
    if n == 0 {
        return Err(EngineError::EmptyMatrix);
    }
    Ok(requested.min(n))
}

/// Split `[0, n)` into contiguous ranges, one per worker.
///
/// The first `n % t` ranges get one extra row, so sizes differ by at most
/// one. Ranges come back in increasing order with no gaps.
///
/// # Example
///
/// ```
/// use matmul_sync::threaded::partition::{partition, RowRange};
///
/// let ranges = partition(10, 3).unwrap();
/// assert_eq!(ranges, vec![
///     RowRange::new(0, 4),
///     RowRange::new(4, 7),
///     RowRange::new(7, 10),
/// ]);
/// ```
pub fn partition(n: usize, workers: usize) -> Result<Vec<RowRange>> {
    let t = effective_workers(n, workers)?;
    let base = n / t;
    let rem = n % t;

    let mut ranges = Vec::with_capacity(t);
    let mut start = 0;
    for w in 0..t {
        let rows = base + usize::from(w < rem);
        ranges.push(RowRange::new(start, start + rows));
        start += rows;
    }
    debug_assert_eq!(start, n);
    Ok(ranges)
}

/// Checks that `ranges` are non-empty, ordered, and cover `[0, n)` exactly once.
pub fn validate(n: usize, ranges: &[RowRange]) -> Result<()> {
    let bad = |reason: String| EngineError::BadPartition { dim: n, reason };
    let mut expected_start = 0;
    for (w, r) in ranges.iter().enumerate() {
        if r.is_empty() || r.start > r.end {
            return Err(bad(format!("range {} for worker {} is empty", r, w)));
        }
        if r.start != expected_start {
            return Err(bad(format!(
                "range {} for worker {} should start at {}",
                r, w, expected_start
            )));
        }
        expected_start = r.end;
    }
    if expected_start != n {
        return Err(bad(format!("ranges end at {}", expected_start)));
    }
    Ok(())
}
