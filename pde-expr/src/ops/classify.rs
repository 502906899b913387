use crate::expr::{BoxExpr, Expr};
use crate::meta::ExprMeta;
use pde_types::{MDIndex, Real};

/// Per-cell scalar classification predicates used to build AMR markers
/// and BC masks from a field's own values: `IsNan`, `IsInf`,
/// `IsFinite`, `Sign` (`-1`/`0`/`1`). `Real`-only, nonlinear.
pub struct Classify<const D: usize> {
    op_name: &'static str,
    arg: BoxExpr<D>,
    f: fn(Real) -> Real,
    meta: ExprMeta<D>,
}

impl<const D: usize> Classify<D> {
    fn new(op_name: &'static str, arg: BoxExpr<D>, f: fn(Real) -> Real) -> Self {
        let am = arg.meta();
        let meta = ExprMeta::derived(format!("{op_name}({})", am.name), am.accessible, am.local, am.logical);
        Self { op_name, arg, f, meta }
    }

    pub fn is_nan(arg: BoxExpr<D>) -> Self {
        Self::new("is_nan", arg, |v| v.is_nan() as u8 as Real)
    }
    pub fn is_inf(arg: BoxExpr<D>) -> Self {
        Self::new("is_inf", arg, |v| v.is_infinite() as u8 as Real)
    }
    pub fn is_finite(arg: BoxExpr<D>) -> Self {
        Self::new("is_finite", arg, |v| v.is_finite() as u8 as Real)
    }
    pub fn sign(arg: BoxExpr<D>) -> Self {
        Self::new("sign", arg, |v| {
            if v > 0.0 {
                1.0
            } else if v < 0.0 {
                -1.0
            } else {
                0.0
            }
        })
    }
}

impl<const D: usize> Expr<D> for Classify<D> {
    fn bc_width(&self) -> i64 {
        self.arg.bc_width()
    }
    fn eval(&self, idx: MDIndex<D>) -> Real {
        (self.f)(self.arg.eval(idx))
    }
    fn eval_safe(&self, idx: MDIndex<D>) -> Real {
        (self.f)(self.arg.eval_safe(idx))
    }
    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool {
        self.arg.could_safe_eval(idx)
    }
    fn prepare(&mut self) -> ExprMeta<D> {
        let am = self.arg.prepare();
        self.meta = ExprMeta::derived(format!("{}({})", self.op_name, am.name), am.accessible, am.local, am.logical);
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
    fn sign_of_negative_is_minus_one() {
        let mut e: Classify<1> = Classify::sign(Box::new(ScalarLeaf::new(-4.0)));
        e.prepare();
        assert_eq!(e.eval(MDIndex::new([0])), -1.0);
    }

    #[test]
    fn is_finite_of_nan_is_false() {
        let mut e: Classify<1> = Classify::is_finite(Box::new(ScalarLeaf::new(Real::NAN)));
        e.prepare();
        assert_eq!(e.eval(MDIndex::new([0])), 0.0);
    }
}
