//! Tridiagonal solve and the locally-one-dimensional diffusion–decay sweep.

use ndarray::Array2;

/// Solve a tridiagonal system with the Thomas algorithm.
///
/// `sub[i]` is the subdiagonal coefficient of row `i` (index 0 unused),
/// `sup[i]` the superdiagonal (last index unused).  `diag` and `rhs` are
/// consumed as scratch; the solution lands in `out`.  All slices must have
/// equal length ≥ 1.
pub fn solve_tridiagonal(
    sub: &[f64],
    diag: &mut [f64],
    sup: &[f64],
    rhs: &mut [f64],
    out: &mut [f64],
) {
    let n = diag.len();
    for i in 1..n {
        let w = sub[i] / diag[i - 1];
        diag[i] -= w * sup[i - 1];
        rhs[i] -= w * rhs[i - 1];
    }
    out[n - 1] = rhs[n - 1] / diag[n - 1];
    for i in (0..n - 1).rev() {
        out[i] = (rhs[i] - sup[i] * out[i + 1]) / diag[i];
    }
}

/// One full diffusion–decay step of the 2D field by operator splitting.
///
/// The 2D operator is split into two one-dimensional sweeps — all lattice
/// rows, then all lattice columns — each solving diffusion along its axis
/// plus half of the first-order decay with Crank–Nicolson coefficients:
///
///   α = D·dt / (2·dx²)        β = k·dt / 4
///
///   −α·C'ᵢ₋₁ + (1 + 2α + β)·C'ᵢ − α·C'ᵢ₊₁
///       = α·Cᵢ₋₁ + (1 − 2α − β)·Cᵢ + α·Cᵢ₊₁
///
/// Boundaries are zero-flux (Neumann): the missing neighbor term folds into
/// the boundary row, `1 + α + β` against `1 − α − β`.
pub fn diffusion_decay_lod(
    concentration: &mut Array2<f64>,
    diffusion: f64,
    decay: f64,
    dt: f64,
    dx: f64,
) {
    let alpha = diffusion * dt / (2.0 * dx * dx);
    let beta = decay * dt / 4.0;
    let (size_x, size_y) = concentration.dim();

    // Sweep along x for every row index y.
    let mut line = vec![0.0; size_x];
    for y in 0..size_y {
        for x in 0..size_x {
            line[x] = concentration[(x, y)];
        }
        sweep_line(&mut line, alpha, beta);
        for x in 0..size_x {
            concentration[(x, y)] = line[x];
        }
    }

    // Sweep along y for every column index x.
    let mut line = vec![0.0; size_y];
    for x in 0..size_x {
        for y in 0..size_y {
            line[y] = concentration[(x, y)];
        }
        sweep_line(&mut line, alpha, beta);
        for y in 0..size_y {
            concentration[(x, y)] = line[y];
        }
    }
}

/// Crank–Nicolson solve of one lattice line in place.
fn sweep_line(line: &mut [f64], alpha: f64, beta: f64) {
    let n = line.len();
    if n == 1 {
        // No room for diffusion; only the decay half-step remains.
        line[0] *= (1.0 - beta) / (1.0 + beta);
        return;
    }

    let mut sub = vec![-alpha; n];
    let mut sup = vec![-alpha; n];
    let mut diag = vec![1.0 + 2.0 * alpha + beta; n];
    let mut rhs = vec![0.0; n];
    let mut out = vec![0.0; n];

    diag[0] = 1.0 + alpha + beta;
    diag[n - 1] = 1.0 + alpha + beta;
    sub[0] = 0.0;
    sup[n - 1] = 0.0;

    rhs[0] = (1.0 - alpha - beta) * line[0] + alpha * line[1];
    rhs[n - 1] = (1.0 - alpha - beta) * line[n - 1] + alpha * line[n - 2];
    for i in 1..n - 1 {
        rhs[i] = alpha * line[i - 1] + (1.0 - 2.0 * alpha - beta) * line[i] + alpha * line[i + 1];
    }

    solve_tridiagonal(&sub, &mut diag, &sup, &mut rhs, &mut out);
    line.copy_from_slice(&out);
}
