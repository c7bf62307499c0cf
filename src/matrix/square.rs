//! Owned square matrix of `i64`, stored row-major in one contiguous buffer.

use crate::error::{EngineError, Result};

/// An N×N matrix of signed 64-bit integers.
///
/// Rows are laid out back to back, so `row(i)` is a contiguous slice of
/// length N. Indexing goes through slice bounds checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    dim: usize,
    data: Vec<i64>,
}

impl Matrix {
    /// Zero-filled N×N matrix.
    pub fn zeros(dim: usize) -> Self {
        Matrix {
            dim,
            data: vec![0; dim * dim],
        }
    }

    /// Builds a matrix by evaluating `f(row, col)` for every cell.
    ///
    /// # Example
    ///
    /// ```
    /// use matmul_sync::Matrix;
    ///
    /// let m = Matrix::from_fn(2, |i, j| (i * 10 + j) as i64);
    /// assert_eq!(m.as_slice(), &[0, 1, 10, 11]);
    /// ```
    pub fn from_fn<F>(dim: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> i64,
    {
        let mut data = Vec::with_capacity(dim * dim);
        for i in 0..dim {
            for j in 0..dim {
                data.push(f(i, j));
            }
        }
        Matrix { dim, data }
    }

    /// Wraps an existing row-major buffer. Fails unless `data.len() == dim * dim`.
    pub fn from_vec(dim: usize, data: Vec<i64>) -> Result<Self> {
        if data.len() != dim * dim {
            return Err(EngineError::ElementCount {
                expected: dim * dim,
                got: data.len(),
            });
        }
        Ok(Matrix { dim, data })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, row: usize, col: usize) -> i64 {
        assert!(col < self.dim, "column {} out of range for dim {}", col, self.dim);
        self.data[row * self.dim + col]
    }

    /// Row `i` as a contiguous slice.
    pub fn row(&self, i: usize) -> &[i64] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[i64]> {
        // chunks_exact panics on 0, and a 0×0 matrix has no rows anyway
        self.data.chunks_exact(self.dim.max(1))
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [i64] {
        &mut self.data
    }
}
