//! Dense-matrix API on top of Faer.
//!
//! Provides the `DenseMatrix` construction trait for `faer::Mat<T>` and the
//! dense inversion primitive used by the Woodbury identity and the
//! non-singularity check.

use crate::core::traits::{Indexing, MatVec};
use crate::error::KError;
use faer::linalg::solvers::{FullPivLu, SolveCore};
use faer::traits::{ComplexField, RealField};
use faer::{Conj, Mat, MatMut, MatRef};
use num_traits::Float;

/// Blanket impl so any Faer Mat<T> is a DenseMatrix.
pub trait DenseMatrix<T>: MatVec<Vec<T>> + Indexing {
    /// Construct from raw column-major storage.
    fn from_raw(nrows: usize, ncols: usize, data: Vec<T>) -> Self;
}

impl<T: Copy + Float> DenseMatrix<T> for Mat<T> {
    fn from_raw(nrows: usize, ncols: usize, data: Vec<T>) -> Self {
        Mat::from_fn(nrows, ncols, |i, j| data[j * nrows + i])
    }
}

/// Invert a square dense matrix.
///
/// Factors with full-pivot LU and solves against the columns of the identity.
/// A singular input surfaces as `KError::SingularMatrix`: a zero pivot turns
/// the triangular solves non-finite, which is what we detect.
pub fn invert<T>(a: MatRef<'_, T>) -> Result<Mat<T>, KError>
where
    T: ComplexField + RealField + Float,
{
    let n = a.nrows();
    if a.ncols() != n {
        return Err(KError::ShapeMismatch(format!(
            "cannot invert a {}x{} matrix",
            a.nrows(),
            a.ncols()
        )));
    }
    let lu = FullPivLu::new(a);
    let mut inv = Mat::from_fn(n, n, |_, _| T::zero());
    let mut col = vec![T::zero(); n];
    for j in 0..n {
        col.iter_mut().for_each(|c| *c = T::zero());
        col[j] = T::one();
        let col_mat = MatMut::from_column_major_slice_mut(&mut col, n, 1);
        lu.solve_in_place_with_conj(Conj::No, col_mat);
        for i in 0..n {
            if !Float::is_finite(col[i]) {
                return Err(KError::SingularMatrix(format!(
                    "LU solve produced a non-finite entry in column {j}"
                )));
            }
            inv[(i, j)] = col[i];
        }
    }
    Ok(inv)
}
