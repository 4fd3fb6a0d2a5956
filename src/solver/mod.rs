//! Solver interfaces: direct LU and the two conjugate-gradient variants.

use crate::preconditioner::Preconditioner;
use crate::utils::convergence::SolveStats;

/// Common interface for any direct or iterative solver.
pub trait LinearSolver<M, V> {
    type Error;
    type Scalar: Copy + PartialOrd + From<f64>;

    /// Solve A·x = b, writing the result into `x`.
    /// Returns iteration stats (including convergence info).
    fn solve(
        &mut self,
        a: &M,
        pc: Option<&dyn Preconditioner<M, V>>,
        b: &V,
        x: &mut V,
    ) -> Result<SolveStats<Self::Scalar>, Self::Error>;
}

pub mod direct_lu;
pub use direct_lu::LuSolver;

pub mod pcg;
pub use pcg::PcgSolver;

pub mod woodbury_cg;
pub use woodbury_cg::WoodburyCgSolver;
