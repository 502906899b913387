use crate::expr::Expr;
use crate::meta::ExprMeta;
use crate::value::Value;
use pde_field::Location;
use pde_mesh::CartesianMesh;
use pde_types::{AxisBox, Axis, MDIndex, Real};
use std::sync::Arc;

fn offset<const D: usize>(idx: MDIndex<D>, axis: Axis, delta: i64) -> MDIndex<D> {
    let mut out = idx;
    out[axis] += delta;
    out
}

/// `(u[i+1] - u[i]) / dx_face`: a first-order one-sided difference
/// biased toward the downwind (ascending-index) neighbor. `dx_face` is
/// the mesh spacing at `i` for a corner-located field, or the average of
/// the two adjacent cell spacings for a center-located field. Shrinks
/// `end[axis]` by one cell (the footprint needs `i+1`).
pub struct D1FirstOrderBiasedUpwind<const D: usize, V: Value<D>> {
    axis: Axis,
    mesh: Arc<CartesianMesh<D>>,
    location: Location,
    arg: Box<dyn Expr<D, V>>,
    meta: ExprMeta<D>,
}

impl<const D: usize, V: Value<D>> D1FirstOrderBiasedUpwind<D, V> {
    pub fn new(axis: Axis, mesh: Arc<CartesianMesh<D>>, location: Location, arg: Box<dyn Expr<D, V>>) -> Self {
        let am = arg.meta();
        let meta = ExprMeta::derived(format!("d{axis}up({})", am.name), am.accessible, am.local, am.logical);
        Self {
            axis,
            mesh,
            location,
            arg,
            meta,
        }
    }

    fn dx_face(&self, i: i64) -> Real {
        match self.location {
            Location::Corner => self.mesh.dx(self.axis, i),
            Location::Center => (self.mesh.dx(self.axis, i) + self.mesh.dx(self.axis, i + 1)) / 2.0,
        }
    }
}

impl<const D: usize, V: Value<D>> Expr<D, V> for D1FirstOrderBiasedUpwind<D, V> {
    fn bc_width(&self) -> i64 {
        self.arg.bc_width() + 1
    }
    fn eval(&self, idx: MDIndex<D>) -> V {
        let fwd = offset(idx, self.axis, 1);
        self.arg.eval(fwd).sub(&self.arg.eval(idx)).scale(1.0 / self.dx_face(idx[self.axis]))
    }
    fn eval_safe(&self, idx: MDIndex<D>) -> V {
        let fwd = offset(idx, self.axis, 1);
        self.arg.eval_safe(fwd).sub(&self.arg.eval_safe(idx)).scale(1.0 / self.dx_face(idx[self.axis]))
    }
    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool {
        self.arg.could_safe_eval(idx) && self.arg.could_safe_eval(offset(idx, self.axis, 1))
    }
    fn prepare(&mut self) -> ExprMeta<D> {
        let am = self.arg.prepare();
        let accessible = am.accessible.shrink_end(self.axis, 1);
        let local = am.local.shrink_end(self.axis, 1);
        let logical = am.logical.shrink_end(self.axis, 1);
        self.meta = ExprMeta::derived(format!("d{}up({})", self.axis, am.name), accessible, local, logical);
        self.meta.clone()
    }
    fn meta(&self) -> &ExprMeta<D> {
        &self.meta
    }
}

/// `(u[i] - u[i-1]) / dx_face`: the upwind biased difference's mirror
/// image, shrinking `start[axis]` by one cell instead.
pub struct D1FirstOrderBiasedDownwind<const D: usize, V: Value<D>> {
    axis: Axis,
    mesh: Arc<CartesianMesh<D>>,
    location: Location,
    arg: Box<dyn Expr<D, V>>,
    meta: ExprMeta<D>,
}

impl<const D: usize, V: Value<D>> D1FirstOrderBiasedDownwind<D, V> {
    pub fn new(axis: Axis, mesh: Arc<CartesianMesh<D>>, location: Location, arg: Box<dyn Expr<D, V>>) -> Self {
        let am = arg.meta();
        let meta = ExprMeta::derived(format!("d{axis}down({})", am.name), am.accessible, am.local, am.logical);
        Self {
            axis,
            mesh,
            location,
            arg,
            meta,
        }
    }

    fn dx_face(&self, i: i64) -> Real {
        match self.location {
            Location::Corner => self.mesh.dx(self.axis, i - 1),
            Location::Center => (self.mesh.dx(self.axis, i - 1) + self.mesh.dx(self.axis, i)) / 2.0,
        }
    }
}

impl<const D: usize, V: Value<D>> Expr<D, V> for D1FirstOrderBiasedDownwind<D, V> {
    fn bc_width(&self) -> i64 {
        self.arg.bc_width() + 1
    }
    fn eval(&self, idx: MDIndex<D>) -> V {
        let back = offset(idx, self.axis, -1);
        self.arg.eval(idx).sub(&self.arg.eval(back)).scale(1.0 / self.dx_face(idx[self.axis]))
    }
    fn eval_safe(&self, idx: MDIndex<D>) -> V {
        let back = offset(idx, self.axis, -1);
        self.arg.eval_safe(idx).sub(&self.arg.eval_safe(back)).scale(1.0 / self.dx_face(idx[self.axis]))
    }
    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool {
        self.arg.could_safe_eval(idx) && self.arg.could_safe_eval(offset(idx, self.axis, -1))
    }
    fn prepare(&mut self) -> ExprMeta<D> {
        let am = self.arg.prepare();
        let accessible = am.accessible.shrink_start(self.axis, 1);
        let local = am.local.shrink_start(self.axis, 1);
        let logical = am.logical.shrink_start(self.axis, 1);
        self.meta = ExprMeta::derived(format!("d{}down({})", self.axis, am.name), accessible, local, logical);
        self.meta.clone()
    }
    fn meta(&self) -> &ExprMeta<D> {
        &self.meta
    }
}

/// The classic three-point Laplacian on a non-uniform mesh:
/// `((u[i+1]-u[i])/dx_r - (u[i]-u[i-1])/dx_l) / ((dx_l+dx_r)/2)`.
/// `bc_width = 1`; `eval_safe` is what actually realizes the boundary
/// contract from `spec.md` §4.4/§8 — the neighbor reads at `i-1`/`i+1`
/// go through `arg.eval_safe`, which for a field leaf consults the BC
/// descriptor (Dirichlet mirror, Neumann flux, periodic wrap) to
/// synthesize the ghost value, and for a `StencilLeaf` produces the
/// matching symbolic ghost row. `D2SecondOrderCentered` itself stays
/// agnostic to *which* BC applies; it only combines whatever its
/// argument hands back.
pub struct D2SecondOrderCentered<const D: usize, V: Value<D>> {
    axis: Axis,
    mesh: Arc<CartesianMesh<D>>,
    location: Location,
    arg: Box<dyn Expr<D, V>>,
    meta: ExprMeta<D>,
}

impl<const D: usize, V: Value<D>> D2SecondOrderCentered<D, V> {
    pub fn new(axis: Axis, mesh: Arc<CartesianMesh<D>>, location: Location, arg: Box<dyn Expr<D, V>>) -> Self {
        let am = arg.meta();
        let meta = ExprMeta::derived(format!("d2{axis}({})", am.name), am.accessible, am.local, am.logical);
        Self {
            axis,
            mesh,
            location,
            arg,
            meta,
        }
    }

    fn spacings(&self, i: i64) -> (Real, Real) {
        match self.location {
            Location::Corner => (self.mesh.dx(self.axis, i - 1), self.mesh.dx(self.axis, i)),
            Location::Center => {
                let dl = (self.mesh.dx(self.axis, i - 1) + self.mesh.dx(self.axis, i)) / 2.0;
                let dr = (self.mesh.dx(self.axis, i) + self.mesh.dx(self.axis, i + 1)) / 2.0;
                (dl, dr)
            }
        }
    }
}

impl<const D: usize, V: Value<D>> Expr<D, V> for D2SecondOrderCentered<D, V> {
    fn bc_width(&self) -> i64 {
        self.arg.bc_width() + 1
    }
    fn eval(&self, idx: MDIndex<D>) -> V {
        let i = idx[self.axis];
        let (dl, dr) = self.spacings(i);
        let lo = offset(idx, self.axis, -1);
        let hi = offset(idx, self.axis, 1);
        let here = self.arg.eval(idx);
        let fwd = self.arg.eval(hi).sub(&here).scale(1.0 / dr);
        let bwd = here.sub(&self.arg.eval(lo)).scale(1.0 / dl);
        fwd.sub(&bwd).scale(1.0 / ((dl + dr) / 2.0))
    }
    fn eval_safe(&self, idx: MDIndex<D>) -> V {
        let i = idx[self.axis];
        let (dl, dr) = self.spacings(i);
        let lo = offset(idx, self.axis, -1);
        let hi = offset(idx, self.axis, 1);
        let here = self.arg.eval_safe(idx);
        let fwd = self.arg.eval_safe(hi).sub(&here).scale(1.0 / dr);
        let bwd = here.sub(&self.arg.eval_safe(lo)).scale(1.0 / dl);
        fwd.sub(&bwd).scale(1.0 / ((dl + dr) / 2.0))
    }
    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool {
        self.arg.could_safe_eval(idx)
            && self.arg.could_safe_eval(offset(idx, self.axis, -1))
            && self.arg.could_safe_eval(offset(idx, self.axis, 1))
    }
    fn prepare(&mut self) -> ExprMeta<D> {
        let am = self.arg.prepare();
        // Per spec: shrink both ends by 1 for nodal (corner) fields; for
        // center fields, shrink only the end that lacks a BC (an
        // `Internal` face means there's no ghost to fall back on there).
        let (accessible, local, logical) = match self.location {
            Location::Corner => (am.accessible.shrink(1), am.local.shrink(1), am.logical.shrink(1)),
            Location::Center => {
                let start_internal = matches!(am.bc_start[self.axis], pde_field::BcSpec::Internal);
                let end_internal = matches!(am.bc_end[self.axis], pde_field::BcSpec::Internal);
                let shrink_one = |r: AxisBox<D>| {
                    let mut out = r;
                    if start_internal {
                        out = out.shrink_start(self.axis, 1);
                    }
                    if end_internal {
                        out = out.shrink_end(self.axis, 1);
                    }
                    out
                };
                (shrink_one(am.accessible), shrink_one(am.local), shrink_one(am.logical))
            }
        };
        self.meta = ExprMeta::derived(format!("d2{}({})", self.axis, am.name), accessible, local, logical);
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
    use pde_field::{BcSpec, Field};
    use std::sync::Arc;

    fn mesh() -> Arc<CartesianMesh<1>> {
        Arc::new(CartesianMesh::<1>::uniform([0.0], [1.0], [11], 1).unwrap())
    }

    #[test]
    fn d2_centered_is_symmetric_and_sign_correct_on_quadratic() {
        let m = mesh();
        let mut f = Field::new(m.clone(), "u", [Location::Center], [BcSpec::dirichlet(0.0)], [BcSpec::dirichlet(0.0)]);
        f.fill_assignable(|idx| {
            let x = m.x(0, idx[0]);
            x * x
        });
        let leaf = FieldLeaf::new(Arc::new(f));
        let mut d2: D2SecondOrderCentered<1, Real> = D2SecondOrderCentered::new(0, m, Location::Center, Box::new(leaf));
        d2.prepare();
        // second derivative of x^2 is the constant 2.
        let v = d2.eval_safe(MDIndex::new([5]));
        assert!((v - 2.0).abs() < 1e-6, "d2x2 = {v}");
    }
}
