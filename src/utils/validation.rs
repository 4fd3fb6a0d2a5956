//! Precondition checks run before a solve starts.
//!
//! Each helper returns `Ok(())` or a `KError` naming what failed. The
//! symmetry and positive-definiteness checks are opt-in via
//! [`Validation`](crate::config::options::Validation) flags; shape and
//! singularity checks are on by default.

use crate::config::options::Validation;
use crate::error::KError;
use crate::matrix::dense;
use faer::Mat;
use faer::traits::{ComplexField, RealField};
use num_traits::Float;

/// A must be square.
pub fn check_square<T: Copy + Float>(a: &Mat<T>) -> Result<(), KError> {
    if a.nrows() != a.ncols() {
        return Err(KError::ShapeMismatch(format!(
            "matrix A is {}x{}, expected square",
            a.nrows(),
            a.ncols()
        )));
    }
    Ok(())
}

/// Row count of A must match the length of b.
pub fn check_system_shapes<T: Copy + Float>(a: &Mat<T>, b: &[T]) -> Result<(), KError> {
    if a.nrows() != b.len() {
        return Err(KError::ShapeMismatch(format!(
            "matrix A has {} rows but b has length {}",
            a.nrows(),
            b.len()
        )));
    }
    Ok(())
}

/// A must be invertible. Detected through the dense inversion primitive.
pub fn check_not_singular<T>(a: &Mat<T>) -> Result<(), KError>
where
    T: ComplexField + RealField + Float,
{
    dense::invert(a.as_ref()).map(|_| ())
}

/// |A − Aᵀ| must stay below `tol` elementwise.
pub fn check_symmetric<T: Copy + Float>(a: &Mat<T>, tol: T) -> Result<(), KError> {
    check_square(a)?;
    let n = a.nrows();
    for i in 0..n {
        for j in (i + 1)..n {
            if Float::abs(a[(i, j)] - a[(j, i)]) > tol {
                return Err(KError::NotSymmetric(format!(
                    "entries ({i}, {j}) and ({j}, {i}) differ"
                )));
            }
        }
    }
    Ok(())
}

/// A must admit a Cholesky factorization: every pivot strictly positive.
pub fn check_positive_definite<T: Copy + Float>(a: &Mat<T>) -> Result<(), KError> {
    check_square(a)?;
    let n = a.nrows();
    let mut l = vec![vec![T::zero(); n]; n];
    for j in 0..n {
        let mut pivot = a[(j, j)];
        for k in 0..j {
            pivot = pivot - l[j][k] * l[j][k];
        }
        if !(pivot > T::zero()) || !Float::is_finite(pivot) {
            return Err(KError::NotPositiveDefinite(format!(
                "Cholesky pivot {j} is not strictly positive"
            )));
        }
        let root = Float::sqrt(pivot);
        l[j][j] = root;
        for i in (j + 1)..n {
            let mut off = a[(i, j)];
            for k in 0..j {
                off = off - l[i][k] * l[j][k];
            }
            l[i][j] = off / root;
        }
    }
    Ok(())
}

/// Run the checks selected by `flags` against A.
pub fn run_checks<T>(a: &Mat<T>, flags: Validation) -> Result<(), KError>
where
    T: ComplexField + RealField + Float + From<f64>,
{
    if flags.contains(Validation::SQUARE) {
        check_square(a)?;
    }
    if flags.contains(Validation::NOT_SINGULAR) {
        check_not_singular(a)?;
    }
    if flags.contains(Validation::SYMMETRIC) {
        check_symmetric(a, <T as From<f64>>::from(1e-10))?;
    }
    if flags.contains(Validation::POSITIVE_DEFINITE) {
        check_positive_definite(a)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::Mat;

    fn spd2() -> Mat<f64> {
        Mat::from_fn(2, 2, |i, j| match (i, j) {
            (0, 0) => 4.0,
            (1, 1) => 3.0,
            _ => 1.0,
        })
    }

    #[test]
    fn square_check_rejects_rectangular() {
        let a = Mat::<f64>::from_fn(3, 2, |_, _| 1.0);
        assert!(matches!(check_square(&a), Err(KError::ShapeMismatch(_))));
    }

    #[test]
    fn singularity_check_rejects_zero_matrix() {
        let a = Mat::<f64>::from_fn(3, 3, |_, _| 0.0);
        assert!(matches!(
            check_not_singular(&a),
            Err(KError::SingularMatrix(_))
        ));
    }

    #[test]
    fn symmetry_check_flags_asymmetric_entry() {
        let mut a = spd2();
        a[(0, 1)] = 2.0;
        assert!(matches!(
            check_symmetric(&a, 1e-12),
            Err(KError::NotSymmetric(_))
        ));
        assert!(check_symmetric(&spd2(), 1e-12).is_ok());
    }

    #[test]
    fn definiteness_check_flags_indefinite_matrix() {
        // eigenvalues of [[1, 2], [2, 1]] are 3 and -1
        let a = Mat::from_fn(2, 2, |i, j| if i == j { 1.0 } else { 2.0 });
        assert!(matches!(
            check_positive_definite(&a),
            Err(KError::NotPositiveDefinite(_))
        ));
        assert!(check_positive_definite(&spd2()).is_ok());
    }

    #[test]
    fn default_flags_skip_symmetry_and_definiteness() {
        let mut a = spd2();
        a[(0, 1)] = 2.0; // asymmetric, but still invertible
        assert!(run_checks(&a, Validation::default()).is_ok());
        assert!(run_checks(&a, Validation::default() | Validation::SYMMETRIC).is_err());
    }
}
