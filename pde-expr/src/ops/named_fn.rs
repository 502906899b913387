use crate::expr::Expr;
use crate::meta::ExprMeta;
use crate::value::Value;
use pde_mesh::CartesianMesh;
use pde_types::{AxisBox, MDIndex, Real};
use std::sync::Arc;

/// Lifts a named, pure function of physical position into a leaf
/// expression: `f(x(i))` at every cell, used for manufactured source
/// terms and analytic BC functors (`BcSpec::NamedFn`'s counterpart on
/// the expression side). Generic over `V` via `Value::from_real`, so a
/// source term built from one can flow into the equation compiler's
/// stencil path too — there it contributes only to the row's constant,
/// never a coefficient on an unknown, since it doesn't read any field.
pub struct NamedFn<const D: usize, V: Value<D>> {
    name: String,
    mesh: Arc<CartesianMesh<D>>,
    f: Arc<dyn Fn([Real; D]) -> Real + Send + Sync>,
    meta: ExprMeta<D>,
    _marker: std::marker::PhantomData<V>,
}

impl<const D: usize, V: Value<D>> NamedFn<D, V> {
    pub fn new(name: impl Into<String>, mesh: Arc<CartesianMesh<D>>, f: Arc<dyn Fn([Real; D]) -> Real + Send + Sync>) -> Self {
        let name = name.into();
        let meta = ExprMeta::derived(name.clone(), AxisBox::empty(), AxisBox::empty(), AxisBox::empty());
        Self {
            name,
            mesh,
            f,
            meta,
            _marker: std::marker::PhantomData,
        }
    }

    fn position(&self, idx: MDIndex<D>) -> [Real; D] {
        std::array::from_fn(|axis| self.mesh.x(axis, idx[axis]))
    }
}

impl<const D: usize, V: Value<D>> Expr<D, V> for NamedFn<D, V> {
    fn bc_width(&self) -> i64 {
        0
    }
    fn eval(&self, idx: MDIndex<D>) -> V {
        V::from_real((self.f)(self.position(idx)))
    }
    fn eval_safe(&self, idx: MDIndex<D>) -> V {
        self.eval(idx)
    }
    fn could_safe_eval(&self, _idx: MDIndex<D>) -> bool {
        true
    }
    fn prepare(&mut self) -> ExprMeta<D> {
        self.meta = ExprMeta::derived(self.name.clone(), AxisBox::empty(), AxisBox::empty(), AxisBox::empty());
        self.meta.clone()
    }
    fn meta(&self) -> &ExprMeta<D> {
        &self.meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pde_mesh::CartesianMesh;

    #[test]
    fn named_fn_evaluates_at_the_cells_physical_position() {
        let mesh = Arc::new(CartesianMesh::<1>::uniform([0.0], [1.0], [11], 1).unwrap());
        let f: NamedFn<1, Real> = NamedFn::new("x2", mesh.clone(), Arc::new(|x: [Real; 1]| x[0] * x[0]));
        let v = f.eval(MDIndex::new([5]));
        let x = mesh.x(0, 5);
        assert!((v - x * x).abs() < 1e-12);
    }
}
