use crate::expr::{BoxExpr, Expr};
use crate::meta::ExprMeta;
use pde_types::{MDIndex, Real};

/// Element-wise binary operator, parameterized by a plain function
/// pointer rather than a closure so every instance stays `Send + Sync`
/// without extra bounds. Metadata inherits from whichever argument is a
/// field (scalars contribute an empty range, per `ExprMeta::combine_range`).
pub struct BinaryOp<const D: usize> {
    op_name: &'static str,
    lhs: BoxExpr<D>,
    rhs: BoxExpr<D>,
    f: fn(Real, Real) -> Real,
    meta: ExprMeta<D>,
}

impl<const D: usize> BinaryOp<D> {
    pub fn new(op_name: &'static str, lhs: BoxExpr<D>, rhs: BoxExpr<D>, f: fn(Real, Real) -> Real) -> Self {
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

    pub fn add(lhs: BoxExpr<D>, rhs: BoxExpr<D>) -> Self {
        Self::new("+", lhs, rhs, |a, b| a + b)
    }
    pub fn sub(lhs: BoxExpr<D>, rhs: BoxExpr<D>) -> Self {
        Self::new("-", lhs, rhs, |a, b| a - b)
    }
    pub fn mul(lhs: BoxExpr<D>, rhs: BoxExpr<D>) -> Self {
        Self::new("*", lhs, rhs, |a, b| a * b)
    }
    pub fn div(lhs: BoxExpr<D>, rhs: BoxExpr<D>) -> Self {
        Self::new("/", lhs, rhs, |a, b| a / b)
    }
}

impl<const D: usize> Expr<D> for BinaryOp<D> {
    fn bc_width(&self) -> i64 {
        self.lhs.bc_width().max(self.rhs.bc_width())
    }

    fn eval(&self, idx: MDIndex<D>) -> Real {
        (self.f)(self.lhs.eval(idx), self.rhs.eval(idx))
    }

    fn eval_safe(&self, idx: MDIndex<D>) -> Real {
        (self.f)(self.lhs.eval_safe(idx), self.rhs.eval_safe(idx))
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

/// Element-wise unary operator (negation, boolean not, classification
/// predicates all share this shape).
pub struct UnaryOp<const D: usize> {
    op_name: &'static str,
    arg: BoxExpr<D>,
    f: fn(Real) -> Real,
    meta: ExprMeta<D>,
}

impl<const D: usize> UnaryOp<D> {
    pub fn new(op_name: &'static str, arg: BoxExpr<D>, f: fn(Real) -> Real) -> Self {
        let am = arg.meta();
        let meta = ExprMeta::derived(format!("{op_name}({})", am.name), am.accessible, am.local, am.logical);
        Self { op_name, arg, f, meta }
    }

    pub fn neg(arg: BoxExpr<D>) -> Self {
        Self::new("-", arg, |a| -a)
    }
}

impl<const D: usize> Expr<D> for UnaryOp<D> {
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
