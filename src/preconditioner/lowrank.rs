//! Low-rank ridge preconditioner built through the Woodbury identity.
//!
//! For a factor P (n×p) the preconditioner inverse is
//! (ridge·I + P·I_p·Pᵀ)⁻¹, assembled once in `setup` and applied as a dense
//! product. With no factor configured, P defaults to the identity.

use crate::config::options::DEFAULT_RIDGE;
use crate::core::traits::MatVec;
use crate::error::KError;
use crate::preconditioner::{Preconditioner, mat_inv_lemma};
use faer::Mat;
use faer::traits::{ComplexField, RealField};
use num_traits::Float;

pub struct LowRank<T> {
    pub factor: Option<Mat<T>>,
    pub ridge: T,
    inv: Option<Mat<T>>,
}

impl<T: Copy + Float + From<f64>> LowRank<T> {
    pub fn new() -> Self {
        Self {
            factor: None,
            ridge: <T as From<f64>>::from(DEFAULT_RIDGE),
            inv: None,
        }
    }

    /// Use P (n×p) as the low-rank factor instead of the identity.
    pub fn with_factor(mut self, p: Mat<T>) -> Self {
        self.factor = Some(p);
        self
    }

    pub fn with_ridge(mut self, ridge: T) -> Self {
        self.ridge = ridge;
        self
    }

    /// The assembled preconditioner inverse, once `setup` has run.
    pub fn inverse(&self) -> Option<&Mat<T>> {
        self.inv.as_ref()
    }
}

impl<T: Copy + Float + From<f64>> Default for LowRank<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Preconditioner<Mat<T>, Vec<T>> for LowRank<T>
where
    T: ComplexField + RealField + Float + From<f64>,
{
    /// Assemble invP = (ridge·I + P·Pᵀ)⁻¹ for the dimension of `a`.
    fn setup(&mut self, a: &Mat<T>) -> Result<(), KError> {
        let n = a.nrows();
        let p = match &self.factor {
            Some(p) => {
                if p.nrows() != n {
                    return Err(KError::ShapeMismatch(format!(
                        "factor P has {} rows but the system has dimension {n}",
                        p.nrows()
                    )));
                }
                p.clone()
            }
            None => Mat::identity(n, n),
        };
        let ridge = self.ridge;
        let ridged = Mat::from_fn(n, n, |i, j| if i == j { ridge } else { T::zero() });
        let coupling = Mat::identity(p.ncols(), p.ncols());
        self.inv = Some(mat_inv_lemma(&ridged, &p, &coupling, &p)?);
        Ok(())
    }

    fn apply(&self, r: &Vec<T>, z: &mut Vec<T>) -> Result<(), KError> {
        match &self.inv {
            Some(inv) => {
                inv.matvec(r, z);
                Ok(())
            }
            None => Err(KError::SolveError(
                "low-rank preconditioner applied before setup".into(),
            )),
        }
    }
}
