use crate::expr::{BoxExpr, Expr};
use crate::meta::ExprMeta;
use pde_types::{MDIndex, Real};

/// `cond > 0 ? then_branch : else_branch`, evaluated per cell. The
/// branch not taken is still required to produce a value whenever
/// `could_safe_eval` is queried, so both legs must cover whatever
/// footprint the conditional is evaluated over — matching how
/// `original_source`'s conditional operator demands both its branches
/// be valid over the whole merged range rather than lazily skipping the
/// untaken one. `Real`-only: branch selection is not a linear operation.
pub struct Conditional<const D: usize> {
    cond: BoxExpr<D>,
    then_branch: BoxExpr<D>,
    else_branch: BoxExpr<D>,
    meta: ExprMeta<D>,
}

impl<const D: usize> Conditional<D> {
    pub fn new(cond: BoxExpr<D>, then_branch: BoxExpr<D>, else_branch: BoxExpr<D>) -> Self {
        let meta = ExprMeta::derived(
            format!("({} ? {} : {})", cond.meta().name, then_branch.meta().name, else_branch.meta().name),
            pde_types::AxisBox::empty(),
            pde_types::AxisBox::empty(),
            pde_types::AxisBox::empty(),
        );
        Self {
            cond,
            then_branch,
            else_branch,
            meta,
        }
    }
}

impl<const D: usize> Expr<D> for Conditional<D> {
    fn bc_width(&self) -> i64 {
        self.cond.bc_width().max(self.then_branch.bc_width()).max(self.else_branch.bc_width())
    }
    fn eval(&self, idx: MDIndex<D>) -> Real {
        if self.cond.eval(idx) > 0.0 {
            self.then_branch.eval(idx)
        } else {
            self.else_branch.eval(idx)
        }
    }
    fn eval_safe(&self, idx: MDIndex<D>) -> Real {
        if self.cond.eval_safe(idx) > 0.0 {
            self.then_branch.eval_safe(idx)
        } else {
            self.else_branch.eval_safe(idx)
        }
    }
    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool {
        self.cond.could_safe_eval(idx) && self.then_branch.could_safe_eval(idx) && self.else_branch.could_safe_eval(idx)
    }
    fn prepare(&mut self) -> ExprMeta<D> {
        let cm = self.cond.prepare();
        let tm = self.then_branch.prepare();
        let em = self.else_branch.prepare();
        let accessible = ExprMeta::combine_range(ExprMeta::combine_range(cm.accessible, tm.accessible), em.accessible);
        let local = ExprMeta::combine_range(ExprMeta::combine_range(cm.local, tm.local), em.local);
        let logical = ExprMeta::combine_range(ExprMeta::combine_range(cm.logical, tm.logical), em.logical);
        self.meta = ExprMeta::derived(
            format!("({} ? {} : {})", cm.name, tm.name, em.name),
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
    fn takes_then_branch_when_cond_is_positive() {
        let mut e: Conditional<1> = Conditional::new(
            Box::new(ScalarLeaf::new(1.0)),
            Box::new(ScalarLeaf::new(10.0)),
            Box::new(ScalarLeaf::new(20.0)),
        );
        e.prepare();
        assert_eq!(e.eval(MDIndex::new([0])), 10.0);
    }

    #[test]
    fn takes_else_branch_when_cond_is_nonpositive() {
        let mut e: Conditional<1> = Conditional::new(
            Box::new(ScalarLeaf::new(0.0)),
            Box::new(ScalarLeaf::new(10.0)),
            Box::new(ScalarLeaf::new(20.0)),
        );
        e.prepare();
        assert_eq!(e.eval(MDIndex::new([0])), 20.0);
    }
}
