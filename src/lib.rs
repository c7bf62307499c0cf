//! Barrier-synchronized multi-threaded matrix multiplication.
//!
//! Computes C = A × B for square `i64` matrices on a fixed set of worker
//! threads. Each worker owns a contiguous block of output rows, and all
//! of them are held at a start gate until the orchestrator has taken its
//! start timestamp, so the measured time covers only the multiply.
//!
//! B is transposed once up front. The inner product for cell (i, j) then
//! reads row i of A and row j of B^T, both contiguous, instead of walking
//! a column of B with stride N.
//!
//! ## Usage
//!
//! ```
//! use matmul_sync::{Matrix, multiply_parallel};
//!
//! let a = Matrix::from_fn(64, |i, j| (i + j) as i64);
//! let b = Matrix::from_fn(64, |i, j| i as i64 - j as i64);
//!
//! let c = multiply_parallel(&a, &b, 4).unwrap();
//! assert_eq!(c.dim(), 64);
//! ```
//!
//! Arithmetic wraps on overflow; results are bit-identical for any
//! worker count.

pub mod config;
pub mod error;
pub mod kernels;
pub mod matrix;
pub mod report;
pub mod threaded;

pub use error::{EngineError, Result};
pub use matrix::layout::{Operands, prepare};
pub use matrix::square::Matrix;
pub use threaded::multiplier::{RunStats, SyncMultiplier, WorkerStats, run_parallel};
pub use threaded::partition::{RowRange, partition};

use kernels::transposed_dot::multiply_serial;
use matrix::transpose::transpose;

/// Both operands must share one dimension.
pub(crate) fn check_dims(a: &Matrix, b: &Matrix) -> Result<()> {
    if a.dim() != b.dim() {
        return Err(EngineError::DimensionMismatch {
            expected: a.dim(),
            got: b.dim(),
        });
    }
    Ok(())
}

/// C = A × B on the calling thread.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    check_dims(a, b)?;
    let b_t = transpose(b);
    let mut c = Matrix::zeros(a.dim());
    multiply_serial(a, &b_t, &mut c);
    Ok(c)
}

/// Same as [`multiply`] but split across `threads` workers
/// (clamped to the dimension).
pub fn multiply_parallel(a: &Matrix, b: &Matrix, threads: usize) -> Result<Matrix> {
    check_dims(a, b)?;
    let b_t = transpose(b);
    let mut c = Matrix::zeros(a.dim());
    SyncMultiplier::for_dim(a.dim(), threads)?.run(a, &b_t, &mut c)?;
    Ok(c)
}
