//! Woodbury identity (matrix inversion lemma) for dense matrices.

use crate::error::KError;
use crate::matrix::dense::invert;
use faer::Mat;
use faer::traits::{ComplexField, RealField};
use num_traits::Float;

/// Compute (A + U·C·Vᵀ)⁻¹ as
///
/// A⁻¹ − A⁻¹U·(C⁻¹ + Vᵀ·A⁻¹·U)⁻¹·Vᵀ·A⁻¹
///
/// for A (n×n), U (n×k), C (k×k), V (n×k). Both A and C must be invertible;
/// a singular one fails with `SingularMatrix` out of the inversion primitive.
/// Only shapes are checked here; the result is as good as the conditioning
/// of A and C.
pub fn mat_inv_lemma<T>(a: &Mat<T>, u: &Mat<T>, c: &Mat<T>, v: &Mat<T>) -> Result<Mat<T>, KError>
where
    T: ComplexField + RealField + Float,
{
    let n = a.nrows();
    let k = c.nrows();
    if a.ncols() != n {
        return Err(KError::ShapeMismatch(format!(
            "A is {}x{}, expected square",
            a.nrows(),
            a.ncols()
        )));
    }
    if c.ncols() != k {
        return Err(KError::ShapeMismatch(format!(
            "C is {}x{}, expected square",
            c.nrows(),
            c.ncols()
        )));
    }
    if u.nrows() != n || u.ncols() != k {
        return Err(KError::ShapeMismatch(format!(
            "U is {}x{}, expected {n}x{k}",
            u.nrows(),
            u.ncols()
        )));
    }
    if v.nrows() != n || v.ncols() != k {
        return Err(KError::ShapeMismatch(format!(
            "V is {}x{}, expected {n}x{k}",
            v.nrows(),
            v.ncols()
        )));
    }

    let inv_a = invert(a.as_ref())?;
    let inv_c = invert(c.as_ref())?;

    let vt = v.transpose();
    let a_u = &inv_a * u; // A⁻¹U, n×k
    let vt_a_u = &vt * &a_u;
    let capacitance = &inv_c + &vt_a_u; // C⁻¹ + VᵀA⁻¹U, k×k
    let inv_cap = invert(capacitance.as_ref())?;
    let vt_a = &vt * &inv_a; // VᵀA⁻¹, k×n

    let correction_tail = &inv_cap * &vt_a;
    let correction = &a_u * &correction_tail;
    Ok(&inv_a - &correction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use faer::Mat;

    #[test]
    fn rank_one_update_of_identity() {
        // (I + u uᵀ)⁻¹ has the closed form I − u uᵀ / (1 + uᵀu)
        let u_vec = [1.0, 2.0, 3.0];
        let a = Mat::<f64>::identity(3, 3);
        let u = Mat::from_fn(3, 1, |i, _| u_vec[i]);
        let c = Mat::<f64>::identity(1, 1);
        let inv = mat_inv_lemma(&a, &u, &c, &u).unwrap();
        let denom = 1.0 + u_vec.iter().map(|ui| ui * ui).sum::<f64>();
        for i in 0..3 {
            for j in 0..3 {
                let expected =
                    if i == j { 1.0 } else { 0.0 } - u_vec[i] * u_vec[j] / denom;
                assert_relative_eq!(inv[(i, j)], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn rejects_mismatched_factor_shape() {
        let a = Mat::<f64>::identity(3, 3);
        let u = Mat::from_fn(2, 1, |_, _| 1.0); // wrong row count
        let c = Mat::<f64>::identity(1, 1);
        let err = mat_inv_lemma(&a, &u, &c, &u).unwrap_err();
        assert!(matches!(err, KError::ShapeMismatch(_)));
    }

    #[test]
    fn rejects_singular_core() {
        let a = Mat::<f64>::identity(2, 2);
        let u = Mat::from_fn(2, 2, |i, j| if i == j { 1.0 } else { 0.0 });
        let c = Mat::from_fn(2, 2, |_, _| 0.0); // singular C
        let err = mat_inv_lemma(&a, &u, &c, &u).unwrap_err();
        assert!(matches!(err, KError::SingularMatrix(_)));
    }
}
