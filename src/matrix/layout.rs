//! Builds the operands for one multiplication run.
//!
//! `prepare` fills A and B from a fixed function of (row, col) so every
//! run of the benchmark sees the same inputs, zeroes C, and materializes
//! the transposed copy of B that the kernels read from.

use super::square::Matrix;
use super::transpose::transpose;

/// Everything one run needs, owned by the caller for the run's duration.
#[derive(Debug, Clone)]
pub struct Operands {
    pub a: Matrix,
    pub b: Matrix,
    /// `b_t[j][i] == b[i][j]`. Read-only once built.
    pub b_t: Matrix,
    pub c: Matrix,
}

impl Operands {
    pub fn dim(&self) -> usize {
        self.a.dim()
    }
}

/// Default fill for operand A: `A[i][j] = i + j`.
pub fn fill_a(i: usize, j: usize) -> i64 {
    i as i64 + j as i64
}

/// Default fill for operand B: `B[i][j] = i - j`.
pub fn fill_b(i: usize, j: usize) -> i64 {
    i as i64 - j as i64
}

/// Prepare N×N operands with the default fill formulas.
pub fn prepare(n: usize) -> Operands {
    prepare_with(n, fill_a, fill_b)
}

/// Prepare N×N operands from caller-supplied deterministic formulas.
pub fn prepare_with<FA, FB>(n: usize, fa: FA, fb: FB) -> Operands
where
    FA: FnMut(usize, usize) -> i64,
    FB: FnMut(usize, usize) -> i64,
{
    let a = Matrix::from_fn(n, fa);
    let b = Matrix::from_fn(n, fb);
    let b_t = transpose(&b);
    let c = Matrix::zeros(n);
    Operands { a, b, b_t, c }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_fills_and_transposes() {
        let ops = prepare(4);
        assert_eq!(ops.dim(), 4);
        assert_eq!(ops.a.get(2, 3), 5);
        assert_eq!(ops.b.get(1, 3), -2);
        assert_eq!(ops.b_t.get(3, 1), -2);
        assert!(ops.c.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_prepare_is_deterministic() {
        let x = prepare(9);
        let y = prepare(9);
        assert_eq!(x.a, y.a);
        assert_eq!(x.b, y.b);
        assert_eq!(x.b_t, y.b_t);
    }

    #[test]
    fn test_prepare_with_custom_formulas() {
        let ops = prepare_with(3, |i, _| i as i64, |_, j| j as i64 * 2);
        assert_eq!(ops.a.row(2), &[2, 2, 2]);
        assert_eq!(ops.b_t.row(1), &[2, 2, 2]);
    }
}
