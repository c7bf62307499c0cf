use super::square::Matrix;
use crate::check_dims;
use crate::error::Result;

/// Reference product straight from the definition, reading B in place.
///
/// Works on the untransposed B, so each output cell walks a column of B
/// N elements apart, and shares no code with the threaded kernel. Sums
/// wrap on `i64` overflow exactly like the engine, so the two compare
/// with `==`.
pub fn multiply_naive(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    check_dims(a, b)?;
    let n = a.dim();
    let (a, b_data) = (a.as_slice(), b.as_slice());
    let mut c = Matrix::zeros(n);
    let out = c.as_mut_slice();
    for i in 0..n {
        for j in 0..n {
            let mut sum = 0i64;
            for p in 0..n {
                sum = sum.wrapping_add(a[i * n + p].wrapping_mul(b_data[p * n + j]));
            }
            out[i * n + j] = sum;
        }
    }
    Ok(c)
}
