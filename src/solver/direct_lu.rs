//! Direct dense solver using Faer's full-pivot LU.
//!
//! Suitable for small to medium dense systems, and used by the tests and
//! benches as the reference the iterative solvers are compared against.

use crate::error::KError;
use crate::solver::LinearSolver;
use crate::utils::convergence::SolveStats;
use faer::linalg::solvers::{FullPivLu, SolveCore};
use faer::traits::{ComplexField, RealField};
use faer::{Conj, Mat, MatMut};
use num_traits::Float;

/// LU solver with full pivoting. The factorization is kept for reuse.
pub struct LuSolver<T> {
    factor: Option<FullPivLu<T>>,
}

impl<T: ComplexField + RealField> LuSolver<T> {
    pub fn new() -> Self {
        LuSolver { factor: None }
    }

    /// Solve against the cached factorization.
    pub fn solve_cached(&self, b: &[T], x: &mut [T]) -> Result<(), KError> {
        let factor = self.factor.as_ref().ok_or_else(|| {
            KError::SolveError("solve_cached called before factorization".into())
        })?;
        let n = b.len();
        x.clone_from_slice(b);
        let x_mat = MatMut::from_column_major_slice_mut(x, n, 1);
        factor.solve_in_place_with_conj(Conj::No, x_mat);
        Ok(())
    }
}

impl<T: ComplexField + RealField> Default for LuSolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LinearSolver<Mat<T>, Vec<T>> for LuSolver<T>
where
    T: ComplexField + RealField + Float + From<f64>,
{
    type Error = KError;
    type Scalar = T;

    /// Solve Ax = b by LU factorization. Direct, so the preconditioner slot
    /// is ignored and the stats always report one iteration.
    fn solve(
        &mut self,
        a: &Mat<T>,
        pc: Option<&dyn crate::preconditioner::Preconditioner<Mat<T>, Vec<T>>>,
        b: &Vec<T>,
        x: &mut Vec<T>,
    ) -> Result<SolveStats<T>, KError> {
        let _ = pc;
        if a.nrows() != a.ncols() || a.nrows() != b.len() {
            return Err(KError::ShapeMismatch(format!(
                "A is {}x{} with b of length {}",
                a.nrows(),
                a.ncols(),
                b.len()
            )));
        }
        self.factor = Some(FullPivLu::new(a.as_ref()));
        x.clone_from(b);
        let n = x.len();
        let x_mat = MatMut::from_column_major_slice_mut(x.as_mut_slice(), n, 1);
        self.factor
            .as_ref()
            .ok_or_else(|| KError::SolveError("factorization missing".into()))?
            .solve_in_place_with_conj(Conj::No, x_mat);
        if x.iter().any(|xi| !Float::is_finite(*xi)) {
            return Err(KError::SingularMatrix(
                "LU solve produced non-finite entries".into(),
            ));
        }
        Ok(SolveStats {
            iterations: 1,
            final_residual: T::zero(),
            converged: true,
        })
    }
}
