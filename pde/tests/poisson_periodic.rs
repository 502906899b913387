//! Periodic Poisson solve (`spec.md` §8 scenario 3): `u_true =
//! sin(x)*cos(y)` is periodic on `[0, 2*pi]^2`, so both axes carry
//! `BcSpec::Periodic`, the discrete system is singular (periodic BCs
//! leave the same constant-mode nullspace pure Neumann does) until
//! `pinned()` removes it, and the assembled system should be solvable
//! by GMRES to tight residual. This also checks the distinctive
//! periodic-wrap structure directly: a cell one step from a periodic
//! face must reference the column on the *opposite* face, not a
//! Dirichlet-style mirror or an out-of-range index.

use pde::equation::{compile, EqnSet, Equation};
use pde::expr::{Add, D2SecondOrderCentered, NamedFn, Scale, StencilLeaf};
use pde::field::{BcSpec, Field, Location, StencilRow};
use pde::mesh::CartesianMesh;
use pde::solver::{krylov, GmresSolver, SolverBackend, SolverParams};
use std::f64::consts::PI;
use std::sync::Arc;

#[test]
fn periodic_poisson_wraps_ghosts_and_converges() {
    const N: usize = 33;
    let mesh = Arc::new(CartesianMesh::<2>::uniform([0.0, 0.0], [2.0 * PI, 2.0 * PI], [N, N], 1).unwrap());
    let u = Arc::new(Field::new(
        mesh.clone(),
        "u",
        [Location::Center, Location::Center],
        [BcSpec::Periodic, BcSpec::Periodic],
        [BcSpec::Periodic, BcSpec::Periodic],
    ));

    let d2x: D2SecondOrderCentered<2, StencilRow<2>> =
        D2SecondOrderCentered::new(0, mesh.clone(), Location::Center, Box::new(StencilLeaf::new(u.clone(), 0)));
    let d2y: D2SecondOrderCentered<2, StencilRow<2>> =
        D2SecondOrderCentered::new(1, mesh.clone(), Location::Center, Box::new(StencilLeaf::new(u.clone(), 0)));
    let lhs = Box::new(Scale::constant(-1.0, Box::new(Add::new(Box::new(d2x), Box::new(d2y)))));
    let rhs = Box::new(NamedFn::<2, StencilRow<2>>::new(
        "f",
        mesh.clone(),
        Arc::new(|x: [f64; 2]| 2.0 * x[0].sin() * x[1].cos()),
    ));

    let mut eqnset = EqnSet::new(vec![Equation::new(lhs, rhs).pinned()], vec![u.clone()]);
    let csr = compile(&mut eqnset).unwrap();
    assert_eq!(csr.nrows(), N * N);

    // Cell (0, 5)'s x-lo neighbor is a ghost one step past the x=0 face;
    // a periodic wrap must land it on column (N-1, 5), not (-1, 5).
    let row_of = |i: i64, j: i64| (i as usize) + (j as usize) * N;
    let (cols, _) = csr.row(row_of(0, 5));
    assert!(
        cols.contains(&row_of(N as i64 - 1, 5)),
        "row (0,5) must reference its periodic-wrapped x-neighbor at column {}",
        row_of(N as i64 - 1, 5)
    );
    assert!(
        !cols.iter().any(|&c| c >= csr.ncols.max(csr.nrows())),
        "no column should escape the assembled system's bounds"
    );

    let mut solver = GmresSolver {
        params: SolverParams {
            tol: 1e-8,
            max_iter: 500,
            k_dim: Some(40),
            ..Default::default()
        },
    };
    let x0 = vec![0.0; csr.nrows()];
    let (x, _stats) = solver.solve(&csr, &csr.rhs, &x0).unwrap();

    let ax = krylov::matvec(&csr, &x);
    let residual: Vec<f64> = csr.rhs.iter().zip(&ax).map(|(b, a)| b - a).collect();
    assert!(krylov::norm2(&residual) / krylov::norm2(&csr.rhs).max(1e-30) <= 1e-6);
}
