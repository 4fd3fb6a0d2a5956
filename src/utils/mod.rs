//! Convergence bookkeeping and pre-solve validation helpers.

pub mod convergence;
pub mod validation;

pub use convergence::{Convergence, SolveStats};
