use crate::meta::ExprMeta;
use crate::value::Value;
use pde_types::{MDIndex, Real};

/// A node in the lazy expression graph, generic over its result type `V`
/// (defaulting to `Real`, the numeric-evaluation path). Implemented as a
/// trait object (`Box<dyn Expr<D, V>>`) rather than a CRTP-style
/// generic-arity template: the spec leaves the choice open, and dynamic
/// dispatch keeps heterogeneous operator trees (arithmetic mixed with
/// finite differences mixed with conditionals) representable as a single
/// type without an explosion of generic parameters. The `V` parameter is
/// what lets the *same* operator catalogue serve both numeric evaluation
/// (`V = Real`, a `FieldLeaf`-rooted tree) and the equation compiler's
/// stencil extraction (`V = StencilRow<D>`, a `StencilLeaf`-rooted tree)
/// — only the leaves and the nonlinear operators (comparison, boolean,
/// classification, min/max, conditional) are `Real`-specific.
pub trait Expr<const D: usize, V: Value<D> = Real>: Send + Sync {
    /// One-sided ghost layer this node's footprint consumes, not
    /// counting arguments' own widths (those are already folded into
    /// this node's ranges by `prepare`).
    fn bc_width(&self) -> i64;

    /// Evaluate at `idx`. Caller must guarantee `could_safe_eval(idx)`;
    /// implementations may index out of bounds otherwise.
    fn eval(&self, idx: MDIndex<D>) -> V;

    /// Evaluate at `idx`, consulting BC descriptors when `idx` is
    /// outside `meta().accessible` but within one BC reach.
    fn eval_safe(&self, idx: MDIndex<D>) -> V;

    /// Is `idx` within this node's interior footprint, or reachable via
    /// a BC on one of its arguments?
    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool;

    /// Bottom-up preparation: by the time this returns, every argument
    /// has already been prepared, and this node's own ranges have been
    /// shrunk by its footprint.
    fn prepare(&mut self) -> ExprMeta<D>;

    fn meta(&self) -> &ExprMeta<D>;
}

/// A boxed expression node over the numeric-evaluation path — the unit
/// most operators are built from and combined into.
pub type BoxExpr<const D: usize> = Box<dyn Expr<D, Real>>;

/// A boxed expression node over the equation compiler's symbolic
/// stencil-extraction path.
pub type BoxStencilExpr<const D: usize> = Box<dyn Expr<D, pde_field::StencilRow<D>>>;
