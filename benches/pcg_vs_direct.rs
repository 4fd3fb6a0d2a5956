use criterion::{Criterion, black_box, criterion_group, criterion_main};
use faer::Mat;
use wbcg::solver::{LinearSolver, LuSolver, PcgSolver};

/// SPD tridiagonal test matrix with a smooth right-hand side.
fn laplacian_system(n: usize) -> (Mat<f64>, Vec<f64>) {
    let mut a = Mat::zeros(n, n);
    for i in 0..n {
        a[(i, i)] = 2.0;
        if i > 0 {
            a[(i, i - 1)] = -1.0;
            a[(i - 1, i)] = -1.0;
        }
    }
    let b: Vec<f64> = (0..n).map(|i| (i as f64).cos()).collect();
    (a, b)
}

fn bench_pcg_vs_direct(c: &mut Criterion) {
    let n = 200;
    let (a, b) = laplacian_system(n);
    let mut x = vec![0.0; n];

    c.bench_function("wbcg PCG", |ben| {
        ben.iter(|| {
            let mut solver = PcgSolver::new(1e-8);
            let _stats = solver
                .solve(black_box(&a), None, black_box(&b), black_box(&mut x))
                .unwrap();
        })
    });

    c.bench_function("wbcg direct LU", |ben| {
        ben.iter(|| {
            let mut solver = LuSolver::new();
            let _stats = solver
                .solve(black_box(&a), None, black_box(&b), black_box(&mut x))
                .unwrap();
        })
    });
}

criterion_group!(benches, bench_pcg_vs_direct);
criterion_main!(benches);
