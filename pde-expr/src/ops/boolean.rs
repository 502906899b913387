use crate::expr::{BoxExpr, Expr};
use crate::meta::ExprMeta;
use pde_types::{MDIndex, Real};

fn truthy(v: Real) -> bool {
    v != 0.0
}

/// Logical AND/OR/NOT over the `1.0`/`0.0` encoding [`Comparison`](crate::ops::comparison::Comparison)
/// and [`Classify`](crate::ops::classify::Classify) produce. Nonlinear,
/// `Real`-only.
pub struct BooleanOp<const D: usize> {
    op_name: &'static str,
    lhs: BoxExpr<D>,
    rhs: Option<BoxExpr<D>>,
    f: fn(bool, bool) -> bool,
    meta: ExprMeta<D>,
}

impl<const D: usize> BooleanOp<D> {
    pub fn and(lhs: BoxExpr<D>, rhs: BoxExpr<D>) -> Self {
        Self::binary("&&", lhs, rhs, |a, b| a && b)
    }
    pub fn or(lhs: BoxExpr<D>, rhs: BoxExpr<D>) -> Self {
        Self::binary("||", lhs, rhs, |a, b| a || b)
    }
    pub fn not(arg: BoxExpr<D>) -> Self {
        let meta = ExprMeta::derived(
            format!("!({})", arg.meta().name),
            pde_types::AxisBox::empty(),
            pde_types::AxisBox::empty(),
            pde_types::AxisBox::empty(),
        );
        Self {
            op_name: "!",
            lhs: arg,
            rhs: None,
            f: |a, _| !a,
            meta,
        }
    }

    fn binary(op_name: &'static str, lhs: BoxExpr<D>, rhs: BoxExpr<D>, f: fn(bool, bool) -> bool) -> Self {
        let meta = ExprMeta::derived(
            format!("({}{op_name}{})", lhs.meta().name, rhs.meta().name),
            pde_types::AxisBox::empty(),
            pde_types::AxisBox::empty(),
            pde_types::AxisBox::empty(),
        );
        Self {
            op_name,
            lhs,
            rhs: Some(rhs),
            f,
            meta,
        }
    }
}

impl<const D: usize> Expr<D> for BooleanOp<D> {
    fn bc_width(&self) -> i64 {
        self.lhs.bc_width().max(self.rhs.as_ref().map(|r| r.bc_width()).unwrap_or(0))
    }
    fn eval(&self, idx: MDIndex<D>) -> Real {
        let a = truthy(self.lhs.eval(idx));
        let b = self.rhs.as_ref().map(|r| truthy(r.eval(idx))).unwrap_or(false);
        (self.f)(a, b) as u8 as Real
    }
    fn eval_safe(&self, idx: MDIndex<D>) -> Real {
        let a = truthy(self.lhs.eval_safe(idx));
        let b = self.rhs.as_ref().map(|r| truthy(r.eval_safe(idx))).unwrap_or(false);
        (self.f)(a, b) as u8 as Real
    }
    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool {
        self.lhs.could_safe_eval(idx) && self.rhs.as_ref().map(|r| r.could_safe_eval(idx)).unwrap_or(true)
    }
    fn prepare(&mut self) -> ExprMeta<D> {
        let lm = self.lhs.prepare();
        let (name, accessible, local, logical) = if let Some(rhs) = self.rhs.as_mut() {
            let rm = rhs.prepare();
            (
                format!("({}{}{})", lm.name, self.op_name, rm.name),
                ExprMeta::combine_range(lm.accessible, rm.accessible),
                ExprMeta::combine_range(lm.local, rm.local),
                ExprMeta::combine_range(lm.logical, rm.logical),
            )
        } else {
            (format!("{}({})", self.op_name, lm.name), lm.accessible, lm.local, lm.logical)
        };
        self.meta = ExprMeta::derived(name, accessible, local, logical);
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
    fn and_of_true_and_false_is_false() {
        let mut e: BooleanOp<1> = BooleanOp::and(Box::new(ScalarLeaf::new(1.0)), Box::new(ScalarLeaf::new(0.0)));
        e.prepare();
        assert_eq!(e.eval(MDIndex::new([0])), 0.0);
    }

    #[test]
    fn not_of_false_is_true() {
        let mut e: BooleanOp<1> = BooleanOp::not(Box::new(ScalarLeaf::new(0.0)));
        e.prepare();
        assert_eq!(e.eval(MDIndex::new([0])), 1.0);
    }
}
