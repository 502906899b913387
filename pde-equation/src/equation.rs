use pde_expr::{BoxStencilExpr, Expr};
use pde_field::Field;
use std::sync::Arc;

/// Binds `lhs` to `rhs`, both expressions rooted at
/// [`pde_expr::StencilLeaf`]s over the system's target fields — the unit
/// the equation-to-linear-system compiler discretizes, one writable cell
/// at a time, into a row of `lhs - rhs == 0`.
pub struct Equation<const D: usize> {
    pub(crate) lhs: BoxStencilExpr<D>,
    pub(crate) rhs: BoxStencilExpr<D>,
    pinned: bool,
}

impl<const D: usize> Equation<D> {
    /// Build `lhs == rhs`. Named `new` rather than overloading
    /// `PartialEq::eq` (which must return `bool`, not build a value) —
    /// the binding an `Equation` performs is a data-flow relationship
    /// for the compiler, not an equality test.
    pub fn new(lhs: BoxStencilExpr<D>, rhs: BoxStencilExpr<D>) -> Self {
        Self { lhs, rhs, pinned: false }
    }

    /// Mark this equation singular (pure-Neumann or similar): the
    /// compiler replaces the first writable row of its target with
    /// `[1, 0, ...] = 0` to remove the nullspace.
    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// `true` iff `lhs`/`rhs` are structurally the same expression tree
    /// (compared by their `prepare()`d name, which recursively encodes
    /// every operator and leaf in the tree) rather than numerically
    /// equal at some index — the distinction `original_source`'s
    /// `operator!=` exists to catch an equation accidentally built as
    /// `lhs == lhs`.
    pub fn structurally_eq(&self) -> bool {
        self.lhs.meta().name == self.rhs.meta().name
    }

    pub fn prepare(&mut self) {
        self.lhs.prepare();
        self.rhs.prepare();
    }
}

/// The ordered list of fields an [`EqnSet`] discretizes against: the
/// `k`-th equation's stencil-leaf color `k` is bound to `targets[k]`.
pub type TargetSet<const D: usize> = Vec<Arc<Field<D>>>;

/// A system of equations paired with the targets they discretize.
/// `equations.len() == targets.len()`; equation `k`'s `k`-th argument
/// position (its own color) is `targets[k]`.
pub struct EqnSet<const D: usize> {
    pub equations: Vec<Equation<D>>,
    pub targets: TargetSet<D>,
}

impl<const D: usize> EqnSet<D> {
    pub fn new(equations: Vec<Equation<D>>, targets: TargetSet<D>) -> Self {
        Self { equations, targets }
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    pub fn prepare(&mut self) {
        for eq in &mut self.equations {
            eq.prepare();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pde_expr::StencilLeaf;
    use pde_field::{BcSpec, Location};
    use pde_mesh::CartesianMesh;

    fn field() -> Arc<Field<1>> {
        Arc::new(Field::new(
            Arc::new(CartesianMesh::<1>::uniform([0.0], [1.0], [9], 1).unwrap()),
            "u",
            [Location::Center],
            [BcSpec::dirichlet(0.0)],
            [BcSpec::dirichlet(0.0)],
        ))
    }

    #[test]
    fn identical_sides_are_structurally_equal() {
        let f = field();
        let lhs: BoxStencilExpr<1> = Box::new(StencilLeaf::new(f.clone(), 0));
        let rhs: BoxStencilExpr<1> = Box::new(StencilLeaf::new(f, 0));
        let mut eq = Equation::new(lhs, rhs);
        eq.prepare();
        assert!(eq.structurally_eq());
    }

    #[test]
    fn pinned_defaults_to_false() {
        let f = field();
        let lhs: BoxStencilExpr<1> = Box::new(StencilLeaf::new(f.clone(), 0));
        let rhs: BoxStencilExpr<1> = Box::new(StencilLeaf::new(f, 1));
        let eq = Equation::new(lhs, rhs);
        assert!(!eq.is_pinned());
        assert!(eq.pinned().is_pinned());
    }
}
