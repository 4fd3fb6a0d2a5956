//! Trait implementations for faer dense matrices and plain vectors.
//!
//! These impls let `faer::Mat` and `Vec<T>` flow through the generic solver
//! and preconditioner interfaces. Inner products and norms use Rayon when the
//! `rayon` feature is enabled.

use crate::core::traits::{Indexing, InnerProduct, MatVec};
use faer::Mat;
use num_traits::Float;

/// y = A · x for a dense faer matrix.
impl<T: Float> MatVec<Vec<T>> for Mat<T> {
    fn matvec(&self, x: &Vec<T>, y: &mut Vec<T>) {
        assert_eq!(self.nrows(), y.len(), "output vector y has incorrect length");
        assert_eq!(self.ncols(), x.len(), "input vector x has incorrect length");
        for i in 0..self.nrows() {
            y[i] = T::zero();
            for j in 0..self.ncols() {
                y[i] = y[i] + self[(i, j)] * x[j];
            }
        }
    }
}

impl<T: Float + From<f64> + Send + Sync> InnerProduct<Vec<T>> for () {
    type Scalar = T;
    /// x^T y.
    fn dot(&self, x: &Vec<T>, y: &Vec<T>) -> T {
        assert_eq!(x.len(), y.len(), "vectors must have the same length");
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            x.as_slice()
                .par_iter()
                .zip(y.as_slice().par_iter())
                .map(|(xi, yi)| *xi * *yi)
                .reduce(|| T::zero(), |acc, v| acc + v)
        }
        #[cfg(not(feature = "rayon"))]
        {
            x.iter()
                .zip(y.iter())
                .map(|(xi, yi)| *xi * *yi)
                .fold(T::zero(), |acc, v| acc + v)
        }
    }
    /// ‖x‖₂.
    fn norm(&self, x: &Vec<T>) -> T {
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            x.as_slice()
                .par_iter()
                .map(|xi| *xi * *xi)
                .reduce(|| T::zero(), |acc, v| acc + v)
                .sqrt()
        }
        #[cfg(not(feature = "rayon"))]
        {
            x.iter()
                .map(|xi| *xi * *xi)
                .fold(T::zero(), |acc, v| acc + v)
                .sqrt()
        }
    }
}

/// A vector is a single column.
impl<T> Indexing for Vec<T> {
    fn nrows(&self) -> usize {
        self.len()
    }
}

impl<T> Indexing for Mat<T> {
    fn nrows(&self) -> usize {
        self.nrows()
    }
}
