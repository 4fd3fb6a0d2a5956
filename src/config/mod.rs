//! Configuration types for solvers and validation.

pub mod options;
pub use options::{DEFAULT_RIDGE, Validation};
