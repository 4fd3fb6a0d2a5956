use thiserror::Error;

// Unified error type for wbcg

#[derive(Error, Debug)]
pub enum KError {
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("singular matrix: {0}")]
    SingularMatrix(String),
    #[error("missing operand: {0} must be set before solving")]
    MissingOperand(&'static str),
    #[error("no convergence after {iterations} iterations")]
    NoConvergence { iterations: usize },
    #[error("breakdown: {0}")]
    Breakdown(String),
    #[error("solve error: {0}")]
    SolveError(String),
    #[error("matrix is not symmetric: {0}")]
    NotSymmetric(String),
    #[error("matrix is not positive definite: {0}")]
    NotPositiveDefinite(String),
}
