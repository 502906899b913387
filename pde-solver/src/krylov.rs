//! Hand-rolled replacements for the HYPRE/BoomerAMG numerics
//! `spec.md` §1 names as an out-of-scope external collaborator: a
//! sparse matvec plus Jacobi, CG, BiCGStab and restarted GMRES against
//! the crate's own [`pde_equation::Csr`]. Single-rank, dense right-hand
//! vectors — the `solvers` wrappers are what give these the backend
//! names (`PcgSolver`, `GmresSolver`, ...) the spec's contract expects.

use pde_equation::Csr;
use pde_types::Real;

pub fn matvec(a: &Csr, x: &[Real]) -> Vec<Real> {
    let mut y = vec![0.0; a.nrows()];
    for r in 0..a.nrows() {
        let (cols, vals) = a.row(r);
        let mut acc = 0.0;
        for (&c, &v) in cols.iter().zip(vals) {
            acc += v * x[c];
        }
        y[r] = acc;
    }
    y
}

pub fn dot(a: &[Real], b: &[Real]) -> Real {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn norm2(a: &[Real]) -> Real {
    dot(a, a).sqrt()
}

fn axpy(alpha: Real, x: &[Real], y: &mut [Real]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += alpha * xi;
    }
}

/// The matrix's diagonal, `0.0` for a row with no diagonal entry (the
/// row is then left unscaled by Jacobi, a degenerate but non-panicking
/// choice for a non-square/singular system).
fn diagonal(a: &Csr) -> Vec<Real> {
    (0..a.nrows())
        .map(|r| {
            let (cols, vals) = a.row(r);
            cols.iter().zip(vals).find(|(&c, _)| c == r).map(|(_, &v)| v).unwrap_or(0.0)
        })
        .collect()
}

/// Result of one reference Krylov/relaxation run: the best iterate
/// found, the iteration count it took, and the residual 2-norm at that
/// iterate — `spec.md` §4.6's `getIterNum`/`getFinalRes` diagnostics.
pub struct IterResult {
    pub x: Vec<Real>,
    pub iters: usize,
    pub final_res: Real,
}

/// Weighted Jacobi relaxation (`omega = 2/3`, the standard multigrid
/// smoothing weight): `x_{k+1} = x_k + omega * D^-1 (b - A x_k)`.
pub fn jacobi(a: &Csr, b: &[Real], x0: &[Real], tol: Real, max_iter: usize) -> IterResult {
    const OMEGA: Real = 2.0 / 3.0;
    let d = diagonal(a);
    let mut x = x0.to_vec();
    let b_norm = norm2(b).max(1e-30);
    let mut res_norm = 0.0;
    let mut iters = 0;
    for k in 0..max_iter {
        iters = k;
        let r = residual(a, b, &x);
        res_norm = norm2(&r) / b_norm;
        if res_norm <= tol {
            break;
        }
        for i in 0..x.len() {
            if d[i] != 0.0 {
                x[i] += OMEGA * r[i] / d[i];
            }
        }
    }
    IterResult { x, iters, final_res: res_norm }
}

fn residual(a: &Csr, b: &[Real], x: &[Real]) -> Vec<Real> {
    let ax = matvec(a, x);
    b.iter().zip(&ax).map(|(bi, axi)| bi - axi).collect()
}

/// Unpreconditioned conjugate gradient, for symmetric positive-definite
/// `A` (the discretized Poisson operator this crate targets).
pub fn conjugate_gradient(a: &Csr, b: &[Real], x0: &[Real], tol: Real, max_iter: usize) -> IterResult {
    let mut x = x0.to_vec();
    let mut r = residual(a, b, &x);
    let mut p = r.clone();
    let b_norm = norm2(b).max(1e-30);
    let mut rs_old = dot(&r, &r);
    let mut res_norm = rs_old.sqrt() / b_norm;
    let mut iters = 0;
    for k in 0..max_iter {
        iters = k;
        if res_norm <= tol {
            break;
        }
        let ap = matvec(a, &p);
        let pap = dot(&p, &ap);
        if pap.abs() < 1e-300 {
            break;
        }
        let alpha = rs_old / pap;
        axpy(alpha, &p, &mut x);
        axpy(-alpha, &ap, &mut r);
        let rs_new = dot(&r, &r);
        res_norm = rs_new.sqrt() / b_norm;
        if res_norm <= tol {
            break;
        }
        let beta = rs_new / rs_old;
        for (pi, ri) in p.iter_mut().zip(&r) {
            *pi = *ri + beta * *pi;
        }
        rs_old = rs_new;
    }
    IterResult { x, iters, final_res: res_norm }
}

/// BiCGStab for general (non-symmetric) `A`.
pub fn bicgstab(a: &Csr, b: &[Real], x0: &[Real], tol: Real, max_iter: usize) -> IterResult {
    let mut x = x0.to_vec();
    let mut r = residual(a, b, &x);
    let r_hat = r.clone();
    let b_norm = norm2(b).max(1e-30);
    let mut res_norm = norm2(&r) / b_norm;

    let mut rho_old = 1.0;
    let mut alpha = 1.0;
    let mut omega = 1.0;
    let mut v = vec![0.0; x.len()];
    let mut p = vec![0.0; x.len()];
    let mut iters = 0;

    for k in 0..max_iter {
        iters = k;
        if res_norm <= tol {
            break;
        }
        let rho = dot(&r_hat, &r);
        if rho.abs() < 1e-300 || omega.abs() < 1e-300 {
            break;
        }
        let beta = (rho / rho_old) * (alpha / omega);
        for i in 0..p.len() {
            p[i] = r[i] + beta * (p[i] - omega * v[i]);
        }
        v = matvec(a, &p);
        let denom = dot(&r_hat, &v);
        if denom.abs() < 1e-300 {
            break;
        }
        alpha = rho / denom;
        let mut s = r.clone();
        axpy(-alpha, &v, &mut s);
        let s_norm = norm2(&s) / b_norm;
        if s_norm <= tol {
            axpy(alpha, &p, &mut x);
            res_norm = s_norm;
            break;
        }
        let t = matvec(a, &s);
        let tt = dot(&t, &t);
        omega = if tt.abs() < 1e-300 { 0.0 } else { dot(&t, &s) / tt };
        axpy(alpha, &p, &mut x);
        axpy(omega, &s, &mut x);
        r = s;
        axpy(-omega, &t, &mut r);
        res_norm = norm2(&r) / b_norm;
        rho_old = rho;
    }
    IterResult { x, iters, final_res: res_norm }
}

/// Restarted GMRES(`k_dim`): modified Gram-Schmidt Arnoldi with Givens
/// rotations applied incrementally to the Hessenberg matrix, restarting
/// every `k_dim` inner iterations. `k_dim` is `spec.md` §4.6's GMRES
/// `kDim` parameter.
pub fn gmres(a: &Csr, b: &[Real], x0: &[Real], tol: Real, max_iter: usize, k_dim: usize) -> IterResult {
    let n = x0.len();
    let k_dim = k_dim.max(1);
    let mut x = x0.to_vec();
    let b_norm = norm2(b).max(1e-30);
    let mut iters = 0;
    let mut res_norm = norm2(&residual(a, b, &x)) / b_norm;

    'outer: while iters < max_iter {
        let r0 = residual(a, b, &x);
        let beta = norm2(&r0);
        if beta / b_norm <= tol {
            break;
        }
        let m = k_dim.min(max_iter - iters);
        let mut v: Vec<Vec<Real>> = vec![r0.iter().map(|ri| ri / beta).collect()];
        let mut h = vec![vec![0.0; m]; m + 1];
        let mut cs = vec![0.0; m];
        let mut sn = vec![0.0; m];
        let mut g = vec![0.0; m + 1];
        g[0] = beta;

        let mut j_used = 0;
        for j in 0..m {
            j_used = j;
            iters += 1;
            let mut w = matvec(a, &v[j]);
            for i in 0..=j {
                h[i][j] = dot(&w, &v[i]);
                axpy(-h[i][j], &v[i], &mut w);
            }
            h[j + 1][j] = norm2(&w);

            for i in 0..j {
                let (hij, hi1j) = (h[i][j], h[i + 1][j]);
                h[i][j] = cs[i] * hij + sn[i] * hi1j;
                h[i + 1][j] = -sn[i] * hij + cs[i] * hi1j;
            }
            let denom = (h[j][j] * h[j][j] + h[j + 1][j] * h[j + 1][j]).sqrt();
            if denom > 1e-300 {
                cs[j] = h[j][j] / denom;
                sn[j] = h[j + 1][j] / denom;
            } else {
                cs[j] = 1.0;
                sn[j] = 0.0;
            }
            h[j][j] = cs[j] * h[j][j] + sn[j] * h[j + 1][j];
            h[j + 1][j] = 0.0;
            let g_j = g[j];
            g[j] = cs[j] * g_j;
            g[j + 1] = -sn[j] * g_j;

            res_norm = g[j + 1].abs() / b_norm;
            if h[j + 1][j].abs() < 1e-300 && h[j][j].abs() < 1e-300 {
                break;
            }
            if res_norm <= tol || j + 1 == m {
                break;
            }
            let wn = norm2(&w);
            if wn < 1e-300 {
                break;
            }
            v.push(w.iter().map(|wi| wi / wn).collect());
        }

        let mdim = j_used + 1;
        let mut y = vec![0.0; mdim];
        for i in (0..mdim).rev() {
            let mut s = g[i];
            for k in (i + 1)..mdim {
                s -= h[i][k] * y[k];
            }
            y[i] = if h[i][i].abs() > 1e-300 { s / h[i][i] } else { 0.0 };
        }
        for i in 0..mdim {
            axpy(y[i], &v[i], &mut x);
        }

        if res_norm <= tol || iters >= max_iter {
            break 'outer;
        }
    }
    let _ = n;
    IterResult { x, iters, final_res: res_norm }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tridiag(n: usize) -> Csr {
        let mut rows = Vec::with_capacity(n);
        for i in 0..n {
            let mut row = vec![(i, 2.0)];
            if i > 0 {
                row.push((i - 1, -1.0));
            }
            if i + 1 < n {
                row.push((i + 1, -1.0));
            }
            rows.push(row);
        }
        Csr::from_rows(rows, vec![1.0; n], n)
    }

    #[test]
    fn cg_solves_a_small_spd_system() {
        let a = tridiag(5);
        let b = a.rhs.clone();
        let x0 = vec![0.0; 5];
        let result = conjugate_gradient(&a, &b, &x0, 1e-10, 100);
        let r = residual(&a, &b, &result.x);
        assert!(norm2(&r) < 1e-6);
    }

    #[test]
    fn gmres_solves_the_same_system() {
        let a = tridiag(6);
        let b = a.rhs.clone();
        let x0 = vec![0.0; 6];
        let result = gmres(&a, &b, &x0, 1e-10, 50, 4);
        let r = residual(&a, &b, &result.x);
        assert!(norm2(&r) < 1e-6);
    }

    #[test]
    fn bicgstab_solves_the_same_system() {
        let a = tridiag(6);
        let b = a.rhs.clone();
        let x0 = vec![0.0; 6];
        let result = bicgstab(&a, &b, &x0, 1e-10, 100);
        let r = residual(&a, &b, &result.x);
        assert!(norm2(&r) < 1e-6);
    }

    #[test]
    fn jacobi_reduces_the_residual() {
        let a = tridiag(5);
        let b = a.rhs.clone();
        let x0 = vec![0.0; 5];
        let r0 = norm2(&residual(&a, &b, &x0));
        let result = jacobi(&a, &b, &x0, 1e-12, 200);
        let r1 = norm2(&residual(&a, &b, &result.x));
        assert!(r1 < r0);
    }

    #[test]
    fn matvec_matches_hand_computed_product() {
        let a = Csr::from_rows(vec![vec![(0, 2.0), (1, 3.0)], vec![(0, 1.0)]], vec![0.0, 0.0], 2);
        let y = matvec(&a, &[1.0, 1.0]);
        assert_eq!(y, vec![5.0, 1.0]);
    }
}
