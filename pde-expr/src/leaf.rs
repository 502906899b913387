use crate::expr::Expr;
use crate::meta::ExprMeta;
use pde_field::{Field, StencilField, StencilRow};
use pde_types::{MDIndex, Real};
use std::sync::Arc;

/// An expression leaf wrapping a [`Field`]. Reads are against an
/// immutable snapshot (`Arc<Field<D>>`): expressions observe a field's
/// values, they don't mutate it — mutation happens by assembling a new
/// field (e.g. after a solver iteration) and rebuilding leaves over it.
pub struct FieldLeaf<const D: usize> {
    field: Arc<Field<D>>,
    meta: ExprMeta<D>,
}

impl<const D: usize> FieldLeaf<D> {
    pub fn new(field: Arc<Field<D>>) -> Self {
        let meta = ExprMeta::leaf(
            field.name().to_string(),
            field.bc_start().clone(),
            field.bc_end().clone(),
            *field.assignable(),
            *field.accessible(),
            *field.local(),
            *field.logical(),
        );
        Self { field, meta }
    }
}

impl<const D: usize> Expr<D> for FieldLeaf<D> {
    fn bc_width(&self) -> i64 {
        0
    }

    fn eval(&self, idx: MDIndex<D>) -> Real {
        self.field.get(idx).unwrap_or(0.0)
    }

    fn eval_safe(&self, idx: MDIndex<D>) -> Real {
        if self.meta.accessible.in_range(idx.as_slice()) {
            return self.eval(idx);
        }
        crate::bc_eval::bc_ghost_value(&self.field, idx)
    }

    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool {
        self.meta.logical.in_range(idx.as_slice())
    }

    fn prepare(&mut self) -> ExprMeta<D> {
        self.meta.clone()
    }

    fn meta(&self) -> &ExprMeta<D> {
        &self.meta
    }
}

/// A spatially-constant scalar leaf: contributes a value everywhere,
/// and no name/range metadata of its own (per spec.md §4.4's "scalars
/// contribute only names" rule, a scalar contributes nothing at all —
/// it is promoted on demand at the binary-op level instead).
pub struct ScalarLeaf<const D: usize> {
    value: Real,
    meta: ExprMeta<D>,
}

impl<const D: usize> ScalarLeaf<D> {
    pub fn new(value: Real) -> Self {
        Self {
            value,
            meta: ExprMeta::derived(
                format!("{value}"),
                pde_types::AxisBox::empty(),
                pde_types::AxisBox::empty(),
                pde_types::AxisBox::empty(),
            ),
        }
    }
}

impl<const D: usize> Expr<D> for ScalarLeaf<D> {
    fn bc_width(&self) -> i64 {
        0
    }
    fn eval(&self, _idx: MDIndex<D>) -> Real {
        self.value
    }
    fn eval_safe(&self, _idx: MDIndex<D>) -> Real {
        self.value
    }
    fn could_safe_eval(&self, _idx: MDIndex<D>) -> bool {
        true
    }
    fn prepare(&mut self) -> ExprMeta<D> {
        self.meta.clone()
    }
    fn meta(&self) -> &ExprMeta<D> {
        &self.meta
    }
}

/// The symbolic counterpart of [`FieldLeaf`]: wraps a [`StencilField`]
/// view (a field plus its equation-compiler color) so the same operator
/// catalogue, instantiated with `V = StencilRow<D>`, can walk an
/// equation's expression tree and come out the other side with a
/// per-row stencil instead of a number. BC ghost reads become BC-derived
/// stencil contributions: a `Dirichlet`/`Neumann` ghost is an affine
/// function of the boundary value and the mirrored interior cell, so its
/// stencil row has one term (the mirrored cell, suitably scaled) plus a
/// constant (the BC value's contribution).
pub struct StencilLeaf<const D: usize> {
    field: Arc<Field<D>>,
    color: u32,
    meta: ExprMeta<D>,
}

impl<const D: usize> StencilLeaf<D> {
    pub fn new(field: Arc<Field<D>>, color: u32) -> Self {
        let meta = ExprMeta::leaf(
            field.name().to_string(),
            field.bc_start().clone(),
            field.bc_end().clone(),
            *field.assignable(),
            *field.accessible(),
            *field.local(),
            *field.logical(),
        );
        Self { field, color, meta }
    }

    pub fn color(&self) -> u32 {
        self.color
    }
}

impl<const D: usize> Expr<D, StencilRow<D>> for StencilLeaf<D> {
    fn bc_width(&self) -> i64 {
        0
    }

    fn eval(&self, idx: MDIndex<D>) -> StencilRow<D> {
        StencilField::new(&self.field, self.color).eval_at(idx)
    }

    fn eval_safe(&self, idx: MDIndex<D>) -> StencilRow<D> {
        if self.meta.accessible.in_range(idx.as_slice()) {
            return self.eval(idx);
        }
        crate::bc_eval::bc_ghost_stencil(&self.field, self.color, idx)
    }

    fn could_safe_eval(&self, idx: MDIndex<D>) -> bool {
        self.meta.logical.in_range(idx.as_slice())
    }

    fn prepare(&mut self) -> ExprMeta<D> {
        self.meta.clone()
    }

    fn meta(&self) -> &ExprMeta<D> {
        &self.meta
    }
}
