use crate::expr::{BoxExpr, Expr};
use crate::meta::ExprMeta;
use pde_types::{MDIndex, Real};

/// Element-wise comparison, producing `1.0`/`0.0`. Nonlinear (a step
/// function of its arguments), so it only makes sense on the numeric
/// evaluation path: comparing two unknowns has no linear stencil
/// representation.
pub struct Comparison<const D: usize> {
    op_name: &'static str,
    lhs: BoxExpr<D>,
    rhs: BoxExpr<D>,
    f: fn(Real, Real) -> bool,
    meta: ExprMeta<D>,
}

impl<const D: usize> Comparison<D> {
    fn new(op_name: &'static str, lhs: BoxExpr<D>, rhs: BoxExpr<D>, f: fn(Real, Real) -> bool) -> Self {
        let meta = ExprMeta::derived(
            format!("({}{op_name}{})", lhs.meta().name, rhs.meta().name),
            pde_types::AxisBox::empty(),
            pde_types::AxisBox::empty(),
            pde_types::AxisBox::empty(),
        );
        Self {
            op_name,
            lhs,
            rhs,
            f,
            meta,
        }
    }

    pub fn lt(lhs: BoxExpr<D>, rhs: BoxExpr<D>) -> Self {
        Self::new("<", lhs, rhs, |a, b| a < b)
    }
    pub fn le(lhs: BoxExpr<D>, rhs: BoxExpr<D>) -> Self {
        Self::new("<=", lhs, rhs, |a, b| a <= b)
    }
    pub fn gt(lhs: BoxExpr<D>, rhs: BoxExpr<D>) -> Self {
        Self::new(">", lhs, rhs, |a, b| a > b)
    }
    pub fn ge(lhs: BoxExpr<D>, rhs: BoxExpr<D>) -> Self {
        Self::new(">=", lhs, rhs, |a, b| a >= b)
    }
    pub fn eq(lhs: BoxExpr<D>, rhs: BoxExpr<D>) -> Self {
        Self::new("==", lhs, rhs, |a, b| a == b)
    }
}

impl<const D: usize> Expr<D> for Comparison<D> {
    fn bc_width(&self) -> i64 {
        self.lhs.bc_width().max(self.rhs.bc_width())
    }
    fn eval(&self, idx: MDIndex<D>) -> Real {
        (self.f)(self.lhs.eval(idx), self.rhs.eval(idx)) as u8 as Real
    }
    fn eval_safe(&self, idx: MDIndex<D>) -> Real {
        (self.f)(self.lhs.eval_safe(idx), self.rhs.eval_safe(idx)) as u8 as Real
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
        self.meta = ExprMeta::derived(
            format!("({}{}{})", lm.name, self.op_name, rm.name),
            accessible,
            local,
            logical,
        );
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
    fn lt_of_scalars() {
        let mut e: Comparison<1> = Comparison::lt(Box::new(ScalarLeaf::new(1.0)), Box::new(ScalarLeaf::new(2.0)));
        e.prepare();
        assert_eq!(e.eval(MDIndex::new([0])), 1.0);
    }
}
