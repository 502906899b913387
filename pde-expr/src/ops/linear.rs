use crate::expr::Expr;
use crate::meta::ExprMeta;
use crate::value::Value;
use pde_types::{MDIndex, Real};

/// Generic element-wise sum, usable on either evaluation path: `V =
/// Real` for the explicit-assignment path, `V = StencilRow<D>` for the
/// equation compiler. Parallels `BinaryOp::add` (`ops::arithmetic`) but
/// generalized over the node's value type instead of hardcoding `Real`,
/// since `lhs - rhs` of an `Equation` must combine over whichever `V`
/// the surrounding expression tree was instantiated with.
pub struct Add<const D: usize, V: Value<D>> {
    lhs: Box<dyn Expr<D, V>>,
    rhs: Box<dyn Expr<D, V>>,
    meta: ExprMeta<D>,
}

impl<const D: usize, V: Value<D>> Add<D, V> {
    pub fn new(lhs: Box<dyn Expr<D, V>>, rhs: Box<dyn Expr<D, V>>) -> Self {
        let meta = ExprMeta::derived(
            format!("({}+{})", lhs.meta().name, rhs.meta().name),
            pde_types::AxisBox::empty(),
            pde_types::AxisBox::empty(),
            pde_types::AxisBox::empty(),
        );
        Self { lhs, rhs, meta }
    }
}

impl<const D: usize, V: Value<D>> Expr<D, V> for Add<D, V> {
    fn bc_width(&self) -> i64 {
        self.lhs.bc_width().max(self.rhs.bc_width())
    }
    fn eval(&self, idx: MDIndex<D>) -> V {
        self.lhs.eval(idx).add(&self.rhs.eval(idx))
    }
    fn eval_safe(&self, idx: MDIndex<D>) -> V {
        self.lhs.eval_safe(idx).add(&self.rhs.eval_safe(idx))
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
        self.meta = ExprMeta::derived(format!("({}+{})", lm.name, rm.name), accessible, local, logical);
        self.meta.clone()
    }
    fn meta(&self) -> &ExprMeta<D> {
        &self.meta
    }
}

/// Generic element-wise difference, `lhs - rhs`: the shape every
/// compiled `Equation` reduces to (`lhs == rhs` discretizes `lhs - rhs`
/// at each writable cell).
pub struct Sub<const D: usize, V: Value<D>> {
    inner: Add<D, V>,
}

impl<const D: usize, V: Value<D>> Sub<D, V> {
    pub fn new(lhs: Box<dyn Expr<D, V>>, rhs: Box<dyn Expr<D, V>>) -> Self {
        Self {
            inner: Add::new(lhs, Box::new(Neg::new(rhs))),
        }
    }
}

impl<const D: usize, V: Value<D>> Expr<D, V> for Sub<D, V> {
    fn bc_width(&self) -> i64 {
        self.inner.bc_width()
    }
    fn eval(&self, idx: MDIndex<D>) -> V {
        self.inner.eval(idx)
    }
    fn eval_safe(&self, idx: MDIndex<D>) -> V {
        self.inner.eval_safe(idx)
    }
    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool {
        self.inner.could_safe_eval(idx)
    }
    fn prepare(&mut self) -> ExprMeta<D> {
        self.inner.prepare()
    }
    fn meta(&self) -> &ExprMeta<D> {
        self.inner.meta()
    }
}

/// Generic negation.
pub struct Neg<const D: usize, V: Value<D>> {
    arg: Box<dyn Expr<D, V>>,
    meta: ExprMeta<D>,
}

impl<const D: usize, V: Value<D>> Neg<D, V> {
    pub fn new(arg: Box<dyn Expr<D, V>>) -> Self {
        let am = arg.meta();
        let meta = ExprMeta::derived(format!("-({})", am.name), am.accessible, am.local, am.logical);
        Self { arg, meta }
    }
}

impl<const D: usize, V: Value<D>> Expr<D, V> for Neg<D, V> {
    fn bc_width(&self) -> i64 {
        self.arg.bc_width()
    }
    fn eval(&self, idx: MDIndex<D>) -> V {
        self.arg.eval(idx).neg()
    }
    fn eval_safe(&self, idx: MDIndex<D>) -> V {
        self.arg.eval_safe(idx).neg()
    }
    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool {
        self.arg.could_safe_eval(idx)
    }
    fn prepare(&mut self) -> ExprMeta<D> {
        let am = self.arg.prepare();
        self.meta = ExprMeta::derived(format!("-({})", am.name), am.accessible, am.local, am.logical);
        self.meta.clone()
    }
    fn meta(&self) -> &ExprMeta<D> {
        &self.meta
    }
}

/// Scale `arg` by a (possibly spatially-varying) real-valued coefficient
/// expression, e.g. `r(x,y) * du/dx` for a variable-coefficient Poisson
/// problem. `coef` always evaluates over the plain `Real` path — a
/// coefficient is known data, never itself an unknown the equation
/// solves for — while `arg` flows through whichever `V` the surrounding
/// tree uses. This is the one place a compiled equation's stencil rows
/// pick up non-unit coefficients.
pub struct Scale<const D: usize, V: Value<D>> {
    coef: Box<dyn Expr<D, Real>>,
    arg: Box<dyn Expr<D, V>>,
    meta: ExprMeta<D>,
}

impl<const D: usize, V: Value<D>> Scale<D, V> {
    pub fn new(coef: Box<dyn Expr<D, Real>>, arg: Box<dyn Expr<D, V>>) -> Self {
        let am = arg.meta();
        let meta = ExprMeta::derived(format!("({}*{})", coef.meta().name, am.name), am.accessible, am.local, am.logical);
        Self { coef, arg, meta }
    }

    pub fn constant(c: Real, arg: Box<dyn Expr<D, V>>) -> Self {
        Self::new(Box::new(crate::leaf::ScalarLeaf::new(c)), arg)
    }
}

impl<const D: usize, V: Value<D>> Expr<D, V> for Scale<D, V> {
    fn bc_width(&self) -> i64 {
        self.coef.bc_width().max(self.arg.bc_width())
    }
    fn eval(&self, idx: MDIndex<D>) -> V {
        self.arg.eval(idx).scale(self.coef.eval(idx))
    }
    fn eval_safe(&self, idx: MDIndex<D>) -> V {
        self.arg.eval_safe(idx).scale(self.coef.eval_safe(idx))
    }
    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool {
        self.coef.could_safe_eval(idx) && self.arg.could_safe_eval(idx)
    }
    fn prepare(&mut self) -> ExprMeta<D> {
        let cm = self.coef.prepare();
        let am = self.arg.prepare();
        let accessible = ExprMeta::combine_range(cm.accessible, am.accessible);
        let local = ExprMeta::combine_range(cm.local, am.local);
        let logical = ExprMeta::combine_range(cm.logical, am.logical);
        self.meta = ExprMeta::derived(format!("({}*{})", cm.name, am.name), accessible, local, logical);
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
    fn add_of_scalars_sums_values() {
        let mut e: Add<2, Real> = Add::new(Box::new(ScalarLeaf::new(2.0)), Box::new(ScalarLeaf::new(3.0)));
        e.prepare();
        assert_eq!(e.eval(MDIndex::new([0, 0])), 5.0);
    }

    #[test]
    fn sub_of_scalars_subtracts() {
        let mut e: Sub<2, Real> = Sub::new(Box::new(ScalarLeaf::new(2.0)), Box::new(ScalarLeaf::new(3.0)));
        e.prepare();
        assert_eq!(e.eval(MDIndex::new([0, 0])), -1.0);
    }
}
