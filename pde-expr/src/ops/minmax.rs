use crate::expr::{BoxExpr, Expr};
use crate::meta::ExprMeta;
use pde_types::{MDIndex, Real};

/// The single element-wise min/max operator (`spec.md`'s Open Question
/// resolved to "one `MinMax`, not separate `Min`/`Max` types" — see
/// `SPEC_FULL.md`): `MinMax::min`/`MinMax::max` just flip which
/// comparison it runs. Nonlinear, `Real`-only.
pub struct MinMax<const D: usize> {
    take_max: bool,
    lhs: BoxExpr<D>,
    rhs: BoxExpr<D>,
    meta: ExprMeta<D>,
}

impl<const D: usize> MinMax<D> {
    pub fn min(lhs: BoxExpr<D>, rhs: BoxExpr<D>) -> Self {
        Self::new(false, lhs, rhs)
    }
    pub fn max(lhs: BoxExpr<D>, rhs: BoxExpr<D>) -> Self {
        Self::new(true, lhs, rhs)
    }

    fn new(take_max: bool, lhs: BoxExpr<D>, rhs: BoxExpr<D>) -> Self {
        let op_name = if take_max { "max" } else { "min" };
        let meta = ExprMeta::derived(
            format!("{op_name}({},{})", lhs.meta().name, rhs.meta().name),
            pde_types::AxisBox::empty(),
            pde_types::AxisBox::empty(),
            pde_types::AxisBox::empty(),
        );
        Self { take_max, lhs, rhs, meta }
    }

    fn combine(&self, a: Real, b: Real) -> Real {
        if self.take_max {
            a.max(b)
        } else {
            a.min(b)
        }
    }
}

impl<const D: usize> Expr<D> for MinMax<D> {
    fn bc_width(&self) -> i64 {
        self.lhs.bc_width().max(self.rhs.bc_width())
    }
    fn eval(&self, idx: MDIndex<D>) -> Real {
        self.combine(self.lhs.eval(idx), self.rhs.eval(idx))
    }
    fn eval_safe(&self, idx: MDIndex<D>) -> Real {
        self.combine(self.lhs.eval_safe(idx), self.rhs.eval_safe(idx))
    }
    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool {
        self.lhs.could_safe_eval(idx) && self.rhs.could_safe_eval(idx)
    }
    fn prepare(&mut self) -> ExprMeta<D> {
        let lm = self.lhs.prepare();
        let rm = self.rhs.prepare();
        let accessible = ExprMeta::combine_range(lm.accessible, rm.accessible);
        let local = ExprMeta::combine_range(lm.local, rm.local);
        let logical = ExprMeta::combine_range(lm.logical, rm.logical);
        let op_name = if self.take_max { "max" } else { "min" };
        self.meta = ExprMeta::derived(format!("{op_name}({},{})", lm.name, rm.name), accessible, local, logical);
        self.meta.clone()
    }
    fn meta(&self) -> &ExprMeta<D> {
        &self.meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::ScalarLeaf;

    #[test]
    fn max_picks_the_larger_value() {
        let mut e: MinMax<1> = MinMax::max(Box::new(ScalarLeaf::new(2.0)), Box::new(ScalarLeaf::new(5.0)));
        e.prepare();
        assert_eq!(e.eval(MDIndex::new([0])), 5.0);
    }
}
