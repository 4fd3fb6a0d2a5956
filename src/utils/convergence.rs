//! Convergence tracking & tolerance checks for the iterative solvers.

/// Stopping criteria.
///
/// `max_iters` of `None` resolves to the conventional 10·n cap at solve time.
pub struct Convergence<T> {
    pub tol: T,
    pub max_iters: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct SolveStats<T> {
    pub iterations: usize,
    pub final_residual: T,
    pub converged: bool,
}

impl<T: Copy> Convergence<T> {
    /// Iteration cap for a system of dimension `n`.
    pub fn limit(&self, n: usize) -> usize {
        self.max_iters.unwrap_or(10 * n)
    }
}
