//! Matrix module: dense matrix helpers and the validated linear system pair.

pub mod dense;
pub use dense::{DenseMatrix, invert};

use crate::error::KError;
use crate::utils::validation;
use faer::Mat;
use num_traits::Float;

/// The pair (A, b) with shape invariants established at construction:
/// A is square and its dimension matches the length of b.
pub struct LinearSystem<T> {
    pub a: Mat<T>,
    pub b: Vec<T>,
}

impl<T: Copy + Float> LinearSystem<T> {
    /// Validate shapes and build the system. Fails with `ShapeMismatch`
    /// when A is not square or does not match b.
    pub fn new(a: Mat<T>, b: Vec<T>) -> Result<Self, KError> {
        validation::check_square(&a)?;
        validation::check_system_shapes(&a, &b)?;
        Ok(Self { a, b })
    }

    /// Dimension n of the system.
    pub fn order(&self) -> usize {
        self.b.len()
    }
}
