use crate::expr::Expr;
use crate::meta::ExprMeta;
use pde_mesh::CartesianMesh;
use pde_types::{Axis, MDIndex, Real};
use std::sync::Arc;

fn offset<const D: usize>(idx: MDIndex<D>, axis: Axis, delta: i64) -> MDIndex<D> {
    let mut out = idx;
    out[axis] += delta;
    out
}

/// The Jiang-Shu fifth-order WENO nonlinear weights and reconstruction,
/// applied to five divided-difference candidates `d = [d1..d5]` (this is
/// the Hamilton-Jacobi form: `d_k` are themselves one-sided first
/// differences, not point values, per `original_source`'s WENO53
/// operator). `eps = 1e-6 * max(d_i^2) + 1e-99` exactly as `spec.md`
/// §4.4 specifies.
fn weno5_combine(d: [Real; 5]) -> Real {
    let [d1, d2, d3, d4, d5] = d;

    let phi1 = d1 / 3.0 - 7.0 * d2 / 6.0 + 11.0 * d3 / 6.0;
    let phi2 = -d2 / 6.0 + 5.0 * d3 / 6.0 + d4 / 3.0;
    let phi3 = d3 / 3.0 + 5.0 * d4 / 6.0 - d5 / 6.0;

    let s1 = 13.0 / 12.0 * (d1 - 2.0 * d2 + d3).powi(2) + 0.25 * (d1 - 4.0 * d2 + 3.0 * d3).powi(2);
    let s2 = 13.0 / 12.0 * (d2 - 2.0 * d3 + d4).powi(2) + 0.25 * (d2 - d4).powi(2);
    let s3 = 13.0 / 12.0 * (d3 - 2.0 * d4 + d5).powi(2) + 0.25 * (3.0 * d3 - 4.0 * d4 + d5).powi(2);

    let max_d2 = d.iter().map(|v| v * v).fold(0.0, Real::max);
    let eps = 1e-6 * max_d2 + 1e-99;

    let a1 = 0.1 / (s1 + eps).powi(2);
    let a2 = 0.6 / (s2 + eps).powi(2);
    let a3 = 0.3 / (s3 + eps).powi(2);
    let sum = a1 + a2 + a3;

    (a1 * phi1 + a2 * phi2 + a3 * phi3) / sum
}

/// Fifth-order WENO, biased upwind (uses the ascending-index side of the
/// six-point stencil `i-2..=i+3`). Falls back, through a
/// [`crate::ops::decayable::Decayable`] wrapper, to
/// [`crate::ops::fd::D1FirstOrderBiasedUpwind`] near a boundary where
/// the full stencil doesn't fit. Nonlinear in `u` (the weights depend on
/// local smoothness), so unlike the linear finite-difference operators
/// this one is `Real`-only: it belongs to the explicit-assignment
/// evaluation path, not the equation compiler's linear stencil
/// extraction.
pub struct D1Weno53Upwind<const D: usize> {
    axis: Axis,
    mesh: Arc<CartesianMesh<D>>,
    arg: Box<dyn Expr<D, Real>>,
    meta: ExprMeta<D>,
}

impl<const D: usize> D1Weno53Upwind<D> {
    pub fn new(axis: Axis, mesh: Arc<CartesianMesh<D>>, arg: Box<dyn Expr<D, Real>>) -> Self {
        let am = arg.meta();
        let meta = ExprMeta::derived(format!("weno5up{axis}({})", am.name), am.accessible, am.local, am.logical);
        Self { axis, mesh, arg, meta }
    }

    fn divided_diffs(&self, idx: MDIndex<D>, eval: impl Fn(MDIndex<D>) -> Real) -> [Real; 5] {
        let dx = self.mesh.dx(self.axis, idx[self.axis]);
        std::array::from_fn(|k| {
            let shift = k as i64 - 2;
            let lo = offset(idx, self.axis, shift);
            let hi = offset(idx, self.axis, shift + 1);
            (eval(hi) - eval(lo)) / dx
        })
    }
}

impl<const D: usize> Expr<D, Real> for D1Weno53Upwind<D> {
    fn bc_width(&self) -> i64 {
        self.arg.bc_width() + 3
    }
    fn eval(&self, idx: MDIndex<D>) -> Real {
        weno5_combine(self.divided_diffs(idx, |i| self.arg.eval(i)))
    }
    fn eval_safe(&self, idx: MDIndex<D>) -> Real {
        weno5_combine(self.divided_diffs(idx, |i| self.arg.eval_safe(i)))
    }
    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool {
        (-2..=3).all(|k| self.arg.could_safe_eval(offset(idx, self.axis, k)))
    }
    fn prepare(&mut self) -> ExprMeta<D> {
        let am = self.arg.prepare();
        let accessible = am.accessible.shrink_start(self.axis, 2).shrink_end(self.axis, 3);
        let local = am.local.shrink_start(self.axis, 2).shrink_end(self.axis, 3);
        let logical = am.logical.shrink_start(self.axis, 2).shrink_end(self.axis, 3);
        self.meta = ExprMeta::derived(format!("weno5up{}({})", self.axis, am.name), accessible, local, logical);
        self.meta.clone()
    }
    fn meta(&self) -> &ExprMeta<D> {
        &self.meta
    }
}

/// WENO5 biased toward the descending-index side of the stencil:
/// mirrors [`D1Weno53Upwind`] by reversing which five divided
/// differences feed the reconstruction.
pub struct D1Weno53Downwind<const D: usize> {
    axis: Axis,
    mesh: Arc<CartesianMesh<D>>,
    arg: Box<dyn Expr<D, Real>>,
    meta: ExprMeta<D>,
}

impl<const D: usize> D1Weno53Downwind<D> {
    pub fn new(axis: Axis, mesh: Arc<CartesianMesh<D>>, arg: Box<dyn Expr<D, Real>>) -> Self {
        let am = arg.meta();
        let meta = ExprMeta::derived(format!("weno5down{axis}({})", am.name), am.accessible, am.local, am.logical);
        Self { axis, mesh, arg, meta }
    }

    fn divided_diffs(&self, idx: MDIndex<D>, eval: impl Fn(MDIndex<D>) -> Real) -> [Real; 5] {
        let dx = self.mesh.dx(self.axis, idx[self.axis]);
        std::array::from_fn(|k| {
            let shift = 2 - k as i64;
            let hi = offset(idx, self.axis, shift);
            let lo = offset(idx, self.axis, shift - 1);
            (eval(hi) - eval(lo)) / dx
        })
    }
}

impl<const D: usize> Expr<D, Real> for D1Weno53Downwind<D> {
    fn bc_width(&self) -> i64 {
        self.arg.bc_width() + 3
    }
    fn eval(&self, idx: MDIndex<D>) -> Real {
        weno5_combine(self.divided_diffs(idx, |i| self.arg.eval(i)))
    }
    fn eval_safe(&self, idx: MDIndex<D>) -> Real {
        weno5_combine(self.divided_diffs(idx, |i| self.arg.eval_safe(i)))
    }
    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool {
        (-3..=2).all(|k| self.arg.could_safe_eval(offset(idx, self.axis, k)))
    }
    fn prepare(&mut self) -> ExprMeta<D> {
        let am = self.arg.prepare();
        let accessible = am.accessible.shrink_start(self.axis, 3).shrink_end(self.axis, 2);
        let local = am.local.shrink_start(self.axis, 3).shrink_end(self.axis, 2);
        let logical = am.logical.shrink_start(self.axis, 3).shrink_end(self.axis, 2);
        self.meta = ExprMeta::derived(format!("weno5down{}({})", self.axis, am.name), accessible, local, logical);
        self.meta.clone()
    }
    fn meta(&self) -> &ExprMeta<D> {
        &self.meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::FieldLeaf;
    use pde_field::{BcSpec, Field, Location};
    use std::sync::Arc as StdArc;

    #[test]
    fn weno_upwind_reproduces_linear_slope_exactly() {
        let mesh = StdArc::new(CartesianMesh::<1>::uniform([0.0], [1.0], [21], 4).unwrap());
        let mut f = Field::new(mesh.clone(), "u", [Location::Center], [BcSpec::Periodic], [BcSpec::Periodic]);
        f.fill_assignable(|idx| mesh.x(0, idx[0]) * 3.0);
        let leaf = FieldLeaf::new(StdArc::new(f));
        let mut op = D1Weno53Upwind::new(0, mesh, Box::new(leaf));
        op.prepare();
        let v = op.eval_safe(MDIndex::new([10]));
        assert!((v - 3.0).abs() < 1e-8, "weno of a linear ramp should recover the exact slope, got {v}");
    }
}
