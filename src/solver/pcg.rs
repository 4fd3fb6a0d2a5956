//! Preconditioned Conjugate Gradient with an explicit preconditioner matrix.
//!
//! The preconditioner is applied through the `Preconditioner` trait (`None`
//! means identity). Validation runs before the first iteration. Failing to
//! converge within the iteration cap is a hard error here, while the
//! estimate-building variant returns its best iterate silently.

use crate::config::options::Validation;
use crate::core::traits::{InnerProduct, MatVec};
use crate::error::KError;
use crate::preconditioner::Preconditioner;
use crate::solver::LinearSolver;
use crate::utils::convergence::{Convergence, SolveStats};
use crate::utils::validation;
use faer::Mat;
use faer::traits::{ComplexField, RealField};
use num_traits::Float;

pub struct PcgSolver<T> {
    pub conv: Convergence<T>,
    pub validate: Validation,
    pub monitor: Option<Box<dyn FnMut(usize, T)>>,
    pub residual_history: Vec<T>,
}

impl<T: Copy + Float + From<f64>> PcgSolver<T> {
    /// Solver with the given tolerance, the default 10·n iteration cap and
    /// default validation (shape + singularity).
    pub fn new(tol: T) -> Self {
        Self {
            conv: Convergence {
                tol,
                max_iters: None,
            },
            validate: Validation::default(),
            monitor: None,
            residual_history: Vec::new(),
        }
    }

    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.conv.max_iters = Some(max_iters);
        self
    }

    pub fn with_validation(mut self, validate: Validation) -> Self {
        self.validate = validate;
        self
    }

    pub fn with_monitor<F>(mut self, f: F) -> Self
    where
        F: FnMut(usize, T) + 'static,
    {
        self.monitor = Some(Box::new(f));
        self
    }

    pub fn clear_history(&mut self) {
        self.residual_history.clear();
    }
}

impl<T> LinearSolver<Mat<T>, Vec<T>> for PcgSolver<T>
where
    T: ComplexField + RealField + Float + From<f64> + Send + Sync,
{
    type Error = KError;
    type Scalar = T;

    fn solve(
        &mut self,
        a: &Mat<T>,
        pc: Option<&dyn Preconditioner<Mat<T>, Vec<T>>>,
        b: &Vec<T>,
        x: &mut Vec<T>,
    ) -> Result<SolveStats<T>, KError> {
        validation::check_system_shapes(a, b)?;
        validation::run_checks(a, self.validate)?;

        let n = b.len();
        let max_iters = self.conv.limit(n);
        let ip = ();

        // x starts from zero regardless of what the caller passed in
        x.iter_mut().for_each(|xi| *xi = T::zero());

        let mut r = {
            let mut ax = vec![T::zero(); n];
            a.matvec(x, &mut ax);
            b.iter()
                .zip(&ax)
                .map(|(&bi, &axi)| bi - axi)
                .collect::<Vec<_>>()
        };
        let mut z = vec![T::zero(); n];
        match pc {
            Some(pc) => pc.apply(&r, &mut z)?,
            None => z.clone_from(&r),
        }
        let mut d = z.clone();
        let mut delta_new = ip.dot(&r, &z);
        let mut i = 0usize;

        let res0 = Float::sqrt(delta_new);
        if let Some(ref mut monitor) = self.monitor {
            monitor(0, res0);
        }
        self.residual_history.push(res0);

        let mut q = vec![T::zero(); n];
        while Float::sqrt(delta_new) > self.conv.tol && i < max_iters {
            a.matvec(&d, &mut q);
            let dq = ip.dot(&d, &q);
            let alpha = delta_new / dq;
            if !Float::is_finite(alpha) {
                return Err(KError::Breakdown(format!(
                    "search-direction curvature dᵀq vanished at iteration {i}"
                )));
            }
            for (xj, dj) in x.iter_mut().zip(&d) {
                *xj = *xj + alpha * *dj;
            }
            for (rj, qj) in r.iter_mut().zip(&q) {
                *rj = *rj - alpha * *qj;
            }
            match pc {
                Some(pc) => pc.apply(&r, &mut z)?,
                None => z.clone_from(&r),
            }
            let delta_old = delta_new;
            delta_new = ip.dot(&r, &z);
            let beta = delta_new / delta_old;
            for (dj, zj) in d.iter_mut().zip(&z) {
                *dj = *zj + beta * *dj;
            }
            i += 1;

            let res = Float::sqrt(delta_new);
            if let Some(ref mut monitor) = self.monitor {
                monitor(i, res);
            }
            self.residual_history.push(res);
        }

        let final_residual = Float::sqrt(delta_new);
        if final_residual > self.conv.tol {
            return Err(KError::NoConvergence { iterations: i });
        }
        Ok(SolveStats {
            iterations: i,
            final_residual,
            converged: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preconditioner::DirectSolve;
    use faer::Mat;

    fn small_spd() -> (Mat<f64>, Vec<f64>) {
        let a = Mat::from_fn(2, 2, |i, j| match (i, j) {
            (0, 0) => 4.0,
            (1, 1) => 3.0,
            _ => 1.0,
        });
        (a, vec![1.0, 2.0])
    }

    #[test]
    fn identity_preconditioner_matches_unpreconditioned_run() {
        let (a, b) = small_spd();
        let mut x_plain = vec![0.0; 2];
        let mut x_pc = vec![0.0; 2];

        let mut plain = PcgSolver::new(1e-10);
        plain.solve(&a, None, &b, &mut x_plain).unwrap();

        let mut pc = DirectSolve::new(Mat::<f64>::identity(2, 2));
        pc.setup(&a).unwrap();
        let mut preconditioned = PcgSolver::new(1e-10);
        preconditioned.solve(&a, Some(&pc), &b, &mut x_pc).unwrap();

        for (xi, xj) in x_plain.iter().zip(&x_pc) {
            assert!((xi - xj).abs() < 1e-8, "{} vs {}", xi, xj);
        }
    }

    #[test]
    fn monitor_sees_every_iteration() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let (a, b) = small_spd();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut solver =
            PcgSolver::new(1e-10).with_monitor(move |i, res| sink.borrow_mut().push((i, res)));
        let mut x = vec![0.0; 2];
        let stats = solver.solve(&a, None, &b, &mut x).unwrap();
        let calls = seen.borrow();
        assert_eq!(calls.len(), stats.iterations + 1);
        assert_eq!(calls[0].0, 0);
        assert_eq!(solver.residual_history.len(), calls.len());
    }

    #[test]
    fn breakdown_on_zero_curvature() {
        // A annihilates d on the first step: dᵀ(A·d) = 0 with A singular but
        // singularity checks disabled, so the loop itself has to notice.
        let a = Mat::<f64>::from_fn(2, 2, |_, _| 0.0);
        let b = vec![1.0, 1.0];
        let mut x = vec![0.0; 2];
        let mut solver = PcgSolver::new(1e-10).with_validation(Validation::empty());
        assert!(matches!(
            solver.solve(&a, None, &b, &mut x),
            Err(KError::Breakdown(_))
        ));
    }
}
