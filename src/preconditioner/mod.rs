//! Preconditioners for the conjugate-gradient solvers.
//!
//! Defines the `Preconditioner` trait and the two implementations the crate
//! ships: an explicit matrix applied by direct solve, and a low-rank ridge
//! approximation built through the Woodbury identity.

use crate::error::KError;

/// A preconditioner M ≈ A⁻¹.
pub trait Preconditioner<M, V> {
    /// Apply M⁻¹ to r, writing z = M⁻¹ r
    fn apply(&self, r: &V, z: &mut V) -> Result<(), KError>;
    /// Optionally: setup/factorize from A
    fn setup(&mut self, _a: &M) -> Result<(), KError> {
        Ok(())
    }
}

pub mod direct;
pub mod lowrank;
pub mod woodbury;

pub use direct::DirectSolve;
pub use lowrank::LowRank;
pub use woodbury::mat_inv_lemma;
