//! Manufactured pure-Neumann Poisson solve (`spec.md` §8 scenario 2):
//! `u_true = cos(x)cos(y)` has zero normal derivative on every face of
//! `[0, 2*pi]^2`, so homogeneous Neumann boundary conditions are exact
//! and the discrete system is singular (no Dirichlet face to anchor the
//! constant mode) until `pinned()` removes the nullspace.

use pde::equation::{compile, EqnSet, Equation};
use pde::expr::{Add, D2SecondOrderCentered, NamedFn, Scale, StencilLeaf};
use pde::field::{BcSpec, Field, Location, StencilRow};
use pde::mesh::CartesianMesh;
use pde::solver::{krylov, BiCgStabSolver, SolverBackend, SolverParams};
use std::f64::consts::PI;
use std::sync::Arc;

#[test]
fn pinned_pure_neumann_system_has_a_unit_first_row_and_converges() {
    const N: usize = 33;
    let mesh = Arc::new(CartesianMesh::<2>::uniform([0.0, 0.0], [2.0 * PI, 2.0 * PI], [N, N], 1).unwrap());
    let bc = BcSpec::neumann(0.0);
    let u = Arc::new(Field::new(
        mesh.clone(),
        "u",
        [Location::Center, Location::Center],
        [bc.clone(), bc.clone()],
        [bc.clone(), bc],
    ));

    let d2x: D2SecondOrderCentered<2, StencilRow<2>> =
        D2SecondOrderCentered::new(0, mesh.clone(), Location::Center, Box::new(StencilLeaf::new(u.clone(), 0)));
    let d2y: D2SecondOrderCentered<2, StencilRow<2>> =
        D2SecondOrderCentered::new(1, mesh.clone(), Location::Center, Box::new(StencilLeaf::new(u.clone(), 0)));
    let lhs = Box::new(Scale::constant(-1.0, Box::new(Add::new(Box::new(d2x), Box::new(d2y)))));
    let rhs = Box::new(NamedFn::<2, StencilRow<2>>::new(
        "f",
        mesh.clone(),
        Arc::new(|x: [f64; 2]| 2.0 * x[0].cos() * x[1].cos()),
    ));

    let mut eqnset = EqnSet::new(vec![Equation::new(lhs, rhs).pinned()], vec![u.clone()]);
    let csr = compile(&mut eqnset).unwrap();

    // The pinned row replaces the first writable cell's equation with
    // `1*u_0 = 0`, eliminating the constant-mode nullspace.
    let (cols, vals) = csr.row(0);
    assert_eq!(cols, &[0]);
    assert_eq!(vals, &[1.0]);
    assert_eq!(csr.rhs[0], 0.0);

    let mut solver = BiCgStabSolver {
        params: SolverParams {
            tol: 1e-9,
            max_iter: 2000,
            ..Default::default()
        },
    };
    let x0 = vec![0.0; csr.nrows()];
    let (x, _stats) = solver.solve(&csr, &csr.rhs, &x0).unwrap();

    let ax = krylov::matvec(&csr, &x);
    let residual: Vec<f64> = csr.rhs.iter().zip(&ax).map(|(b, a)| b - a).collect();
    assert!(krylov::norm2(&residual) / krylov::norm2(&csr.rhs).max(1e-30) <= 1e-7);
    assert!(x[0].abs() <= 1e-8, "pinned degree of freedom must stay fixed at 0, got {}", x[0]);
}
