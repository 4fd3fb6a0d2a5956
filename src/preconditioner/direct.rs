//! Explicit preconditioner matrix applied by direct solve.
//!
//! Holds M and a full-pivot LU factorization of it. Each application solves
//! M·z = r against the cached factor; M is never inverted explicitly.

use crate::error::KError;
use crate::preconditioner::Preconditioner;
use faer::linalg::solvers::{FullPivLu, SolveCore};
use faer::traits::{ComplexField, RealField};
use faer::{Conj, Mat, MatMut};
use num_traits::Float;

pub struct DirectSolve<T> {
    m: Mat<T>,
    factor: Option<FullPivLu<T>>,
}

impl<T: ComplexField + RealField> DirectSolve<T> {
    /// Wrap the preconditioner matrix M; factorization happens in `setup`.
    pub fn new(m: Mat<T>) -> Self {
        Self { m, factor: None }
    }
}

impl<T> Preconditioner<Mat<T>, Vec<T>> for DirectSolve<T>
where
    T: ComplexField + RealField + Float,
{
    /// Factor M once. The system matrix is not consulted.
    fn setup(&mut self, _a: &Mat<T>) -> Result<(), KError> {
        if self.m.nrows() != self.m.ncols() {
            return Err(KError::ShapeMismatch(format!(
                "preconditioner M is {}x{}, expected square",
                self.m.nrows(),
                self.m.ncols()
            )));
        }
        self.factor = Some(FullPivLu::new(self.m.as_ref()));
        Ok(())
    }

    /// z = M⁻¹ r by triangular solves against the cached factorization.
    fn apply(&self, r: &Vec<T>, z: &mut Vec<T>) -> Result<(), KError> {
        let factor = self.factor.as_ref().ok_or_else(|| {
            KError::SolveError("preconditioner applied before setup".into())
        })?;
        if r.len() != self.m.nrows() {
            return Err(KError::ShapeMismatch(format!(
                "residual has length {} but M has dimension {}",
                r.len(),
                self.m.nrows()
            )));
        }
        z.clone_from(r);
        let n = z.len();
        let z_mat = MatMut::from_column_major_slice_mut(z.as_mut_slice(), n, 1);
        factor.solve_in_place_with_conj(Conj::No, z_mat);
        for (i, zi) in z.iter().enumerate() {
            if !Float::is_finite(*zi) {
                return Err(KError::SingularMatrix(format!(
                    "preconditioner solve produced a non-finite entry at {i}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use faer::Mat;

    #[test]
    fn diagonal_preconditioner_scales_residual() {
        let m = Mat::from_fn(3, 3, |i, j| if i == j { (i + 1) as f64 } else { 0.0 });
        let a = Mat::<f64>::identity(3, 3);
        let mut pc = DirectSolve::new(m);
        pc.setup(&a).unwrap();
        let r = vec![2.0, 4.0, 9.0];
        let mut z = vec![0.0; 3];
        pc.apply(&r, &mut z).unwrap();
        assert_relative_eq!(z[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(z[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(z[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn singular_preconditioner_fails_on_apply() {
        let m = Mat::<f64>::from_fn(2, 2, |_, _| 0.0);
        let a = Mat::<f64>::identity(2, 2);
        let mut pc = DirectSolve::new(m);
        pc.setup(&a).unwrap();
        let r = vec![1.0, 1.0];
        let mut z = vec![0.0; 2];
        assert!(matches!(
            pc.apply(&r, &mut z),
            Err(KError::SingularMatrix(_))
        ));
    }
}
