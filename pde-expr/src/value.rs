use pde_field::StencilRow;
use pde_types::Real;

/// The algebraic operations an expression-tree node's result must
/// support to flow through the shared linear operator catalogue
/// (arithmetic combination, finite differences, convolution,
/// interpolation, index-shift): plain numbers flow through as
/// themselves; the equation compiler's symbolic stencil rows flow
/// through as coefficient-weighted `(color, index)` combinations plus a
/// constant term. Mirrors the original's template parameterization of
/// every `FieldExprTrait`-derived operator over the field type it is
/// instantiated on (`Field` for numeric evaluation, `StencilField` for
/// extraction) — this port expresses that as a bound on the node's
/// associated value type instead of a generic-arity template.
pub trait Value<const D: usize>: Clone + Send + Sync + 'static {
    fn zero() -> Self;
    fn from_real(c: Real) -> Self;
    fn add(&self, other: &Self) -> Self;
    fn neg(&self) -> Self;
    fn scale(&self, c: Real) -> Self;

    fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }
}

impl<const D: usize> Value<D> for Real {
    fn zero() -> Self {
        0.0
    }
    fn from_real(c: Real) -> Self {
        c
    }
    fn add(&self, other: &Self) -> Self {
        self + other
    }
    fn neg(&self) -> Self {
        -self
    }
    fn scale(&self, c: Real) -> Self {
        self * c
    }
}

impl<const D: usize> Value<D> for StencilRow<D> {
    fn zero() -> Self {
        StencilRow::new()
    }
    fn from_real(c: Real) -> Self {
        StencilRow::constant(c)
    }
    fn add(&self, other: &Self) -> Self {
        StencilRow::add(self, other)
    }
    fn neg(&self) -> Self {
        StencilRow::neg(self)
    }
    fn scale(&self, c: Real) -> Self {
        StencilRow::scale(self, c)
    }
}
