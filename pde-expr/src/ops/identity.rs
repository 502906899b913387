use crate::expr::Expr;
use crate::meta::ExprMeta;
use crate::value::Value;
use pde_types::MDIndex;

/// Passes its argument through unchanged. Exists as an explicit node
/// (rather than just returning the argument itself) so an equation or a
/// named output can name a sub-expression without otherwise transforming
/// it, the way `original_source` lets any `FieldExprTrait` stand in as
/// its own "no-op" wrapper.
pub struct Identity<const D: usize, V: Value<D>> {
    arg: Box<dyn Expr<D, V>>,
}

impl<const D: usize, V: Value<D>> Identity<D, V> {
    pub fn new(arg: Box<dyn Expr<D, V>>) -> Self {
        Self { arg }
    }
}

impl<const D: usize, V: Value<D>> Expr<D, V> for Identity<D, V> {
    fn bc_width(&self) -> i64 {
        self.arg.bc_width()
    }
    fn eval(&self, idx: MDIndex<D>) -> V {
        self.arg.eval(idx)
    }
    fn eval_safe(&self, idx: MDIndex<D>) -> V {
        self.arg.eval_safe(idx)
    }
    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool {
        self.arg.could_safe_eval(idx)
    }
    fn prepare(&mut self) -> ExprMeta<D> {
        self.arg.prepare()
    }
    fn meta(&self) -> &ExprMeta<D> {
        self.arg.meta()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::ScalarLeaf;
    use pde_types::Real;

    #[test]
    fn identity_passes_value_through() {
        let mut id: Identity<1, Real> = Identity::new(Box::new(ScalarLeaf::new(7.0)));
        id.prepare();
        assert_eq!(id.eval(MDIndex::new([0])), 7.0);
    }
}
