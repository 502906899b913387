use crate::expr::Expr;
use crate::meta::ExprMeta;
use crate::value::Value;
use pde_types::MDIndex;

/// A high-order operator bundled with a lower-order fallback, used so a
/// scheme like WENO53 can decay to a first-order biased upwind
/// difference near a boundary where its wide stencil doesn't fit.
/// `could_safe_eval` is the disjunction of both footprints;
/// `eval_safe`/`eval` pick the high-order path whenever its footprint
/// covers `idx`, matching `spec.md` §4.4's decayable-operator contract
/// exactly. `prepare` takes both branches' ranges so the published
/// metadata reflects the *widest* footprint either could need — a
/// downstream consumer must still probe `could_safe_eval` before
/// assuming the high-order path is available at a given cell.
pub struct Decayable<const D: usize, V: Value<D>> {
    high: Box<dyn Expr<D, V>>,
    decayed: Box<dyn Expr<D, V>>,
    meta: ExprMeta<D>,
}

impl<const D: usize, V: Value<D>> Decayable<D, V> {
    pub fn new(high: Box<dyn Expr<D, V>>, decayed: Box<dyn Expr<D, V>>) -> Self {
        let hm = high.meta();
        let meta = ExprMeta::derived(format!("decay({})", hm.name), hm.accessible, hm.local, hm.logical);
        Self { high, decayed, meta }
    }
}

impl<const D: usize, V: Value<D>> Expr<D, V> for Decayable<D, V> {
    fn bc_width(&self) -> i64 {
        self.high.bc_width().max(self.decayed.bc_width())
    }

    fn eval(&self, idx: MDIndex<D>) -> V {
        // Caller asserted `could_safe_eval`; the unsafe path always
        // takes the high-order operator per spec.
        self.high.eval(idx)
    }

    fn eval_safe(&self, idx: MDIndex<D>) -> V {
        if self.high.could_safe_eval(idx) {
            self.high.eval_safe(idx)
        } else {
            self.decayed.eval_safe(idx)
        }
    }

    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool {
        self.high.could_safe_eval(idx) || self.decayed.could_safe_eval(idx)
    }

    fn prepare(&mut self) -> ExprMeta<D> {
        let hm = self.high.prepare();
        let dm = self.decayed.prepare();
        let accessible = hm.accessible.min_cover_box(&dm.accessible);
        let local = hm.local.min_cover_box(&dm.local);
        let logical = hm.logical.min_cover_box(&dm.logical);
        self.meta = ExprMeta::derived(format!("decay({})", hm.name), accessible, local, logical);
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
    use pde_types::Real;

    #[test]
    fn decayable_always_takes_high_order_when_both_fit() {
        let mut d: Decayable<1, Real> = Decayable::new(Box::new(ScalarLeaf::new(1.0)), Box::new(ScalarLeaf::new(2.0)));
        d.prepare();
        assert_eq!(d.eval_safe(MDIndex::new([0])), 1.0);
    }
}
