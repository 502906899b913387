//! Two-target, two-color assembly (`spec.md` §8 scenario 4): stacking
//! two structurally identical Dirichlet Poisson equations over two
//! distinct target fields on the same mesh must interleave their rows
//! and columns one-for-one — `ColoredBlockedMDRangeMapper` puts every
//! color's `n`-th cell at consecutive integers `2n`/`2n+1` — so the two
//! equations' assembled rows are column-shifted copies of each other.

use pde::equation::{compile, EqnSet, Equation};
use pde::expr::{D2SecondOrderCentered, NamedFn, Scale, StencilLeaf};
use pde::field::{BcSpec, Field, Location, StencilRow};
use pde::mesh::CartesianMesh;
use std::sync::Arc;

#[test]
fn stacked_identical_equations_interleave_colors_one_for_one() {
    const N: usize = 9;
    let mesh = Arc::new(CartesianMesh::<1>::uniform([0.0], [1.0], [N], 1).unwrap());
    let bc = BcSpec::dirichlet(0.0);
    let u0 = Arc::new(Field::new(mesh.clone(), "u0", [Location::Center], [bc.clone()], [bc.clone()]));
    let u1 = Arc::new(Field::new(mesh.clone(), "u1", [Location::Center], [bc.clone()], [bc]));

    let build_eqn = |field: Arc<Field<1>>, color: u32| -> Equation<1> {
        let d2: D2SecondOrderCentered<1, StencilRow<1>> =
            D2SecondOrderCentered::new(0, mesh.clone(), Location::Center, Box::new(StencilLeaf::new(field, color)));
        let lhs = Box::new(Scale::constant(-1.0, Box::new(d2)));
        let rhs = Box::new(NamedFn::<1, StencilRow<1>>::new("f", mesh.clone(), Arc::new(|_x: [f64; 1]| -2.0)));
        Equation::new(lhs, rhs)
    };

    let eq0 = build_eqn(u0.clone(), 0);
    let eq1 = build_eqn(u1.clone(), 1);
    let mut eqnset = EqnSet::new(vec![eq0, eq1], vec![u0, u1]);
    let csr = compile(&mut eqnset).unwrap();

    assert_eq!(csr.nrows(), 2 * N);
    for n in 0..N {
        let (cols0, vals0) = csr.row(2 * n);
        let (cols1, vals1) = csr.row(2 * n + 1);
        assert_eq!(cols0.len(), cols1.len(), "row {n}: differing nonzero counts");
        assert_eq!(vals0, vals1, "row {n}: coefficients must match between the two stacked equations");
        for (&c0, &c1) in cols0.iter().zip(cols1) {
            assert_eq!(c1, c0 + 1, "row {n}: color-1 column must sit exactly one past its color-0 counterpart");
        }
        assert_eq!(csr.rhs[2 * n], csr.rhs[2 * n + 1], "row {n}: right-hand sides must match");
    }
}
