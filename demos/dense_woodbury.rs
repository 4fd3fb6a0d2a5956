use faer::Mat;
use rand::Rng;
use wbcg::core::traits::MatVec;
use wbcg::solver::{LinearSolver, PcgSolver, WoodburyCgSolver};

fn main() {
    let n = 10;
    // build a random SPD matrix: A = MᵀM + I
    let mut rng = rand::thread_rng();
    let data: Vec<f64> = (0..n * n).map(|_| rng.r#gen()).collect();
    let m = Mat::from_fn(n, n, |i, j| data[j * n + i]);
    let m_t = m.transpose();
    let a = &m_t * &m + Mat::<f64>::identity(n, n);
    let b: Vec<f64> = (0..n).map(|_| rng.r#gen()).collect();

    // classic PCG, unpreconditioned
    let mut x = vec![0.0; n];
    let mut pcg = PcgSolver::new(1e-8);
    let stats = pcg.solve(&a, None, &b, &mut x).unwrap();
    println!("PCG: {} iterations, residual {:.3e}", stats.iterations, stats.final_residual);

    // estimating variant: solution plus an approximation of A⁻¹
    let mut x = vec![0.0; n];
    let mut wcg = WoodburyCgSolver::new();
    let (stats, c) = wcg.solve_with_estimate(&a, &b, &mut x).unwrap();
    println!(
        "WoodburyCG: {} iterations, residual {:.3e}, converged = {}",
        stats.iterations, stats.final_residual, stats.converged
    );

    // how well does the estimate act as an inverse on b?
    let mut cb = vec![0.0; n];
    c.matvec(&b, &mut cb);
    let err = cb
        .iter()
        .zip(&x)
        .map(|(ci, xi)| (ci - xi) * (ci - xi))
        .sum::<f64>()
        .sqrt();
    println!("‖C·b − x‖₂ = {err:.3e}");
}
