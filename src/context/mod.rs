//! Context/factory types for configuring and running the solvers.

pub mod ksp_context;
pub use ksp_context::{KspContext, SolverKind};
