use super::square::Matrix;

/// Transpose a square matrix: `dst[j][i] = src[i][j]`.
///
/// After transpose, what was column j of `src` becomes row j of the
/// result, so the inner product for output cell (i, j) can walk two
/// contiguous rows instead of one row and one strided column.
///
/// # Example
///
/// ```
/// use matmul_sync::Matrix;
/// use matmul_sync::matrix::transpose::transpose;
///
/// let src = Matrix::from_vec(2, vec![1, 2,
///                                    3, 4]).unwrap();
/// let dst = transpose(&src);
///
/// assert_eq!(dst.as_slice(), &[1, 3,
///                              2, 4]);
/// ```
pub fn transpose(src: &Matrix) -> Matrix {
    let n = src.dim();
    let s = src.as_slice();
    let mut dst = Matrix::zeros(n);
    let d = dst.as_mut_slice();
    for i in 0..n {
        for j in 0..n {
            d[j * n + i] = s[i * n + j];
        }
    }
    dst
}
