use crate::expr::Expr;
use crate::meta::ExprMeta;
use crate::value::Value;
use pde_field::Location;
use pde_mesh::CartesianMesh;
use pde_types::{Axis, MDIndex};
use std::sync::Arc;

fn offset<const D: usize>(idx: MDIndex<D>, axis: Axis, delta: i64) -> MDIndex<D> {
    let mut out = idx;
    out[axis] += delta;
    out
}

/// Linear interpolation between a field located at one cell kind
/// (corner or center) and a value at the other, along a single axis:
/// `Center -> Corner` averages the two adjacent cells that straddle a
/// corner; `Corner -> Corner` (or `Center -> Center`) is the identity.
/// Distance-weighted by the mesh's local spacing so non-uniform
/// refinement interpolates consistently, per `spec.md` §4.4.
pub struct D1Linear<const D: usize, V: Value<D>> {
    axis: Axis,
    mesh: Arc<CartesianMesh<D>>,
    from: Location,
    to: Location,
    arg: Box<dyn Expr<D, V>>,
    meta: ExprMeta<D>,
}

impl<const D: usize, V: Value<D>> D1Linear<D, V> {
    pub fn new(axis: Axis, mesh: Arc<CartesianMesh<D>>, from: Location, to: Location, arg: Box<dyn Expr<D, V>>) -> Self {
        let am = arg.meta();
        let meta = ExprMeta::derived(format!("interp{axis}({})", am.name), am.accessible, am.local, am.logical);
        Self {
            axis,
            mesh,
            from,
            to,
            arg,
            meta,
        }
    }

    fn is_identity(&self) -> bool {
        self.from == self.to
    }

    fn weights(&self, i: i64) -> (f64, f64) {
        // Center -> Corner at corner index i averages cells i-1 and i,
        // weighted by their relative spacing so the interpolant is exact
        // for a field linear in x.
        let dl = self.mesh.dx(self.axis, i - 1);
        let dr = self.mesh.dx(self.axis, i);
        let total = dl + dr;
        if total <= 0.0 {
            (0.5, 0.5)
        } else {
            (dr / total, dl / total)
        }
    }
}

impl<const D: usize, V: Value<D>> Expr<D, V> for D1Linear<D, V> {
    fn bc_width(&self) -> i64 {
        self.arg.bc_width() + if self.is_identity() { 0 } else { 1 }
    }

    fn eval(&self, idx: MDIndex<D>) -> V {
        if self.is_identity() {
            return self.arg.eval(idx);
        }
        let i = idx[self.axis];
        let (wl, wr) = self.weights(i);
        match (self.from, self.to) {
            (Location::Center, Location::Corner) => {
                let lo = offset(idx, self.axis, -1);
                self.arg.eval(lo).scale(wl).add(&self.arg.eval(idx).scale(wr))
            }
            (Location::Corner, Location::Center) => {
                let hi = offset(idx, self.axis, 1);
                self.arg.eval(idx).scale(0.5).add(&self.arg.eval(hi).scale(0.5))
            }
            _ => self.arg.eval(idx),
        }
    }

    fn eval_safe(&self, idx: MDIndex<D>) -> V {
        if self.is_identity() {
            return self.arg.eval_safe(idx);
        }
        let i = idx[self.axis];
        let (wl, wr) = self.weights(i);
        match (self.from, self.to) {
            (Location::Center, Location::Corner) => {
                let lo = offset(idx, self.axis, -1);
                self.arg.eval_safe(lo).scale(wl).add(&self.arg.eval_safe(idx).scale(wr))
            }
            (Location::Corner, Location::Center) => {
                let hi = offset(idx, self.axis, 1);
                self.arg.eval_safe(idx).scale(0.5).add(&self.arg.eval_safe(hi).scale(0.5))
            }
            _ => self.arg.eval_safe(idx),
        }
    }

    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool {
        if self.is_identity() {
            return self.arg.could_safe_eval(idx);
        }
        match (self.from, self.to) {
            (Location::Center, Location::Corner) => {
                self.arg.could_safe_eval(offset(idx, self.axis, -1)) && self.arg.could_safe_eval(idx)
            }
            (Location::Corner, Location::Center) => {
                self.arg.could_safe_eval(idx) && self.arg.could_safe_eval(offset(idx, self.axis, 1))
            }
            _ => self.arg.could_safe_eval(idx),
        }
    }

    fn prepare(&mut self) -> ExprMeta<D> {
        let am = self.arg.prepare();
        let (accessible, local, logical) = match (self.from, self.to) {
            (Location::Center, Location::Corner) => (
                am.accessible.shrink_start(self.axis, 1),
                am.local.shrink_start(self.axis, 1),
                am.logical.shrink_start(self.axis, 1),
            ),
            (Location::Corner, Location::Center) => (
                am.accessible.shrink_end(self.axis, 1),
                am.local.shrink_end(self.axis, 1),
                am.logical.shrink_end(self.axis, 1),
            ),
            _ => (am.accessible, am.local, am.logical),
        };
        self.meta = ExprMeta::derived(format!("interp{}({})", self.axis, am.name), accessible, local, logical);
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
    use pde_types::Real;

    #[test]
    fn center_to_corner_is_exact_on_a_linear_ramp() {
        let mesh = Arc::new(CartesianMesh::<1>::uniform([0.0], [1.0], [11], 2).unwrap());
        let mut f = Field::new(mesh.clone(), "u", [Location::Center], [BcSpec::dirichlet(0.0)], [BcSpec::dirichlet(0.0)]);
        f.fill_assignable(|idx| mesh.x(0, idx[0]));
        let leaf = FieldLeaf::new(Arc::new(f));
        let mut interp: D1Linear<1, Real> = D1Linear::new(0, mesh.clone(), Location::Center, Location::Corner, Box::new(leaf));
        interp.prepare();
        let v = interp.eval_safe(MDIndex::new([5]));
        let expected = mesh.x(0, 5);
        assert!((v - expected).abs() < 1e-8, "interp={v} expected={expected}");
    }
}
