//! Inner-product kernel over a pre-transposed right operand.

use crate::matrix::square::Matrix;
use crate::threaded::partition::RowRange;

/// Dot product of two contiguous rows, wrapping on overflow.
///
/// Both slices are walked front to back with stride 1.
#[inline]
pub fn dot(a_row: &[i64], bt_row: &[i64]) -> i64 {
    a_row
        .iter()
        .zip(bt_row)
        .fold(0i64, |acc, (&x, &y)| acc.wrapping_add(x.wrapping_mul(y)))
}

/// Compute rows `range` of C = A × B given `b_t` = B^T.
///
/// `c_rows` holds only the output rows of `range`, so its length must be
/// `range.len() * n`. Every cell is overwritten; nothing accumulates.
///
/// # Panics
///
/// Panics if `c_rows` is the wrong length or `range` runs past `n`.
pub fn multiply_rows(a: &Matrix, b_t: &Matrix, c_rows: &mut [i64], range: RowRange) {
    let n = a.dim();
    assert_eq!(
        c_rows.len(),
        range.len() * n,
        "C slice: expected {}x{}={} elements",
        range.len(),
        n,
        range.len() * n
    );

    for (i, c_row) in (range.start..range.end).zip(c_rows.chunks_exact_mut(n.max(1))) {
        let a_row = a.row(i);
        for (j, out) in c_row.iter_mut().enumerate() {
            *out = dot(a_row, b_t.row(j));
        }
    }
}

/// Whole product on the calling thread. Same kernel, one range, no workers.
pub fn multiply_serial(a: &Matrix, b_t: &Matrix, c: &mut Matrix) {
    let n = a.dim();
    multiply_rows(a, b_t, c.as_mut_slice(), RowRange::new(0, n));
}
