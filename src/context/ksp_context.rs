//! Factory and context for the conjugate-gradient solvers.
//!
//! `KspContext` collects the operands, preconditioner and tolerances, then
//! dispatches to the solver selected by `SolverKind`. Operands are optional
//! until solve time; a missing A or b fails with `MissingOperand` before any
//! iteration runs.

use crate::config::options::Validation;
use crate::error::KError;
use crate::matrix::LinearSystem;
use crate::preconditioner::Preconditioner;
use crate::solver::{LinearSolver, PcgSolver, WoodburyCgSolver};
use crate::utils::convergence::SolveStats;
use faer::Mat;
use faer::traits::{ComplexField, RealField};
use num_traits::Float;

/// The available solver variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverKind {
    /// PCG with an explicit preconditioner matrix; errors on non-convergence.
    Pcg,
    /// CG with incremental inverse estimation; silent on non-convergence.
    WoodburyCg,
}

pub struct KspContext<T> {
    pub kind: SolverKind,
    pub a: Option<Mat<T>>,
    pub b: Option<Vec<T>>,
    pub pc: Option<Box<dyn Preconditioner<Mat<T>, Vec<T>>>>,
    /// Absolute tolerance for the explicit-preconditioner variant.
    pub tol: T,
    /// Relative/absolute tolerances for the estimating variant.
    pub rtol: T,
    pub atol: T,
    pub max_it: Option<usize>,
    pub validate: Validation,
    /// Low-rank factor for the estimating variant.
    pub factor: Option<Mat<T>>,
}

impl<T: Copy + Float + From<f64>> KspContext<T> {
    pub fn new(kind: SolverKind) -> Self {
        Self {
            kind,
            a: None,
            b: None,
            pc: None,
            tol: <T as From<f64>>::from(1e-8),
            rtol: <T as From<f64>>::from(1e-6),
            atol: <T as From<f64>>::from(1e-6),
            max_it: None,
            validate: Validation::default(),
            factor: None,
        }
    }

    /// Install a validated (A, b) pair in one step.
    pub fn with_system(mut self, system: LinearSystem<T>) -> Self {
        self.a = Some(system.a);
        self.b = Some(system.b);
        self
    }

    pub fn with_matrix(mut self, a: Mat<T>) -> Self {
        self.a = Some(a);
        self
    }

    pub fn with_rhs(mut self, b: Vec<T>) -> Self {
        self.b = Some(b);
        self
    }

    pub fn with_preconditioner(
        mut self,
        pc: Box<dyn Preconditioner<Mat<T>, Vec<T>>>,
    ) -> Self {
        self.pc = Some(pc);
        self
    }

    pub fn with_max_iters(mut self, max_it: usize) -> Self {
        self.max_it = Some(max_it);
        self
    }

    pub fn with_validation(mut self, validate: Validation) -> Self {
        self.validate = validate;
        self
    }
}

impl<T> KspContext<T>
where
    T: ComplexField + RealField + Float + From<f64> + Send + Sync,
{
    /// Solve the configured system, writing the result into `x`.
    pub fn solve_context(&mut self, x: &mut Vec<T>) -> Result<SolveStats<T>, KError> {
        let a = self.a.as_ref().ok_or(KError::MissingOperand("matrix A"))?;
        let b = self.b.as_ref().ok_or(KError::MissingOperand("vector b"))?;
        match self.kind {
            SolverKind::Pcg => {
                let mut solver = PcgSolver::new(self.tol).with_validation(self.validate);
                if let Some(it) = self.max_it {
                    solver = solver.with_max_iters(it);
                }
                solver.solve(a, self.pc.as_deref(), b, x)
            }
            SolverKind::WoodburyCg => {
                let mut solver = WoodburyCgSolver::new().with_tolerances(self.rtol, self.atol);
                if let Some(it) = self.max_it {
                    solver = solver.with_max_iters(it);
                }
                if let Some(p) = &self.factor {
                    solver = solver.with_factor(p.clone());
                }
                solver.solve(a, None, b, x)
            }
        }
    }
}
