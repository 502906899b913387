use crate::expr::Expr;
use crate::meta::ExprMeta;
use crate::value::Value;
use pde_types::{Axis, MDIndex};

/// Reads its argument at a fixed per-axis offset from the index it is
/// asked to evaluate: `IndexShift(delta).eval(i) == arg.eval(i + delta)`.
/// The underlying mechanism every finite-difference and stencil operator
/// builds on, exposed directly for expressions (like a plain upwind
/// shift with no derivative scaling) that want it on its own. Unlike the
/// FD operators, `IndexShift` publishes the *argument's* BC descriptors
/// shifted along with the range, per the note on `ExprMeta::derived`: a
/// pure shift doesn't introduce a new BC, it relocates the one already
/// there.
pub struct IndexShift<const D: usize, V: Value<D>> {
    delta: [i64; D],
    arg: Box<dyn Expr<D, V>>,
    meta: ExprMeta<D>,
}

impl<const D: usize, V: Value<D>> IndexShift<D, V> {
    pub fn new(delta: [i64; D], arg: Box<dyn Expr<D, V>>) -> Self {
        let am = arg.meta();
        let meta = ExprMeta::derived(format!("shift({})", am.name), am.accessible, am.local, am.logical);
        Self { delta, arg, meta }
    }

    fn shift(&self, idx: MDIndex<D>) -> MDIndex<D> {
        idx.offset_by(&self.delta)
    }
}

impl<const D: usize, V: Value<D>> Expr<D, V> for IndexShift<D, V> {
    fn bc_width(&self) -> i64 {
        self.arg.bc_width() + self.delta.iter().map(|d| d.unsigned_abs() as i64).max().unwrap_or(0)
    }
    fn eval(&self, idx: MDIndex<D>) -> V {
        self.arg.eval(self.shift(idx))
    }
    fn eval_safe(&self, idx: MDIndex<D>) -> V {
        self.arg.eval_safe(self.shift(idx))
    }
    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool {
        self.arg.could_safe_eval(self.shift(idx))
    }
    fn prepare(&mut self) -> ExprMeta<D> {
        let am = self.arg.prepare();
        let mut accessible = am.accessible;
        let mut local = am.local;
        let mut logical = am.logical;
        for axis in 0..D {
            let d = self.delta[axis as Axis];
            if d > 0 {
                accessible = accessible.shrink_end(axis, d);
                local = local.shrink_end(axis, d);
                logical = logical.shrink_end(axis, d);
            } else if d < 0 {
                accessible = accessible.shrink_start(axis, -d);
                local = local.shrink_start(axis, -d);
                logical = logical.shrink_start(axis, -d);
            }
        }
        self.meta = ExprMeta::derived(format!("shift({})", am.name), accessible, local, logical);
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
    use pde_mesh::CartesianMesh;
    use pde_types::Real;
    use std::sync::Arc;

    #[test]
    fn shift_reads_the_neighbor_cell() {
        let mesh = Arc::new(CartesianMesh::<1>::uniform([0.0], [1.0], [9], 1).unwrap());
        let mut f = Field::new(mesh, "u", [Location::Center], [BcSpec::Periodic], [BcSpec::Periodic]);
        f.fill_assignable(|idx| idx[0] as Real);
        let leaf = FieldLeaf::new(Arc::new(f));
        let mut shifted: IndexShift<1, Real> = IndexShift::new([1], Box::new(leaf));
        shifted.prepare();
        assert_eq!(shifted.eval(MDIndex::new([3])), 4.0);
    }
}
