use crate::field::Field;
use pde_types::{MDIndex, Real};
use smallvec::SmallVec;

/// One term of a per-row stencil: `coefficient * target[color][index]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StencilTerm<const D: usize> {
    pub coefficient: Real,
    pub color: u32,
    pub index: MDIndex<D>,
}

impl<const D: usize> StencilTerm<D> {
    pub fn new(coefficient: Real, color: u32, index: MDIndex<D>) -> Self {
        Self {
            coefficient,
            color,
            index,
        }
    }
}

/// A per-row stencil: a coefficient-weighted sparse combination of
/// `(color, index)` terms plus a plain numeric constant (the part of the
/// row that doesn't depend on any target — source terms, BC
/// contributions). `constant` accumulates with the sign the equation
/// compiler ultimately reverses onto the right-hand side.
///
/// Most rows touch only a handful of neighbors, so terms live inline
/// (`SmallVec`) rather than behind a heap allocation; duplicate
/// `(color, index)` pairs are not merged eagerly (`add`/`scale` just
/// concatenate/scale), the compiler folds them when it flattens a row
/// into CSR columns.
#[derive(Clone, Debug, Default)]
pub struct StencilRow<const D: usize> {
    pub terms: SmallVec<[StencilTerm<D>; 8]>,
    pub constant: Real,
}

impl<const D: usize> StencilRow<D> {
    pub fn new() -> Self {
        Self {
            terms: SmallVec::new(),
            constant: 0.0,
        }
    }

    pub fn term(coefficient: Real, color: u32, index: MDIndex<D>) -> Self {
        let mut row = Self::new();
        row.terms.push(StencilTerm::new(coefficient, color, index));
        row
    }

    pub fn constant(value: Real) -> Self {
        let mut row = Self::new();
        row.constant = value;
        row
    }

    pub fn add(&self, other: &Self) -> Self {
        let mut terms = self.terms.clone();
        terms.extend(other.terms.iter().copied());
        Self {
            terms,
            constant: self.constant + other.constant,
        }
    }

    pub fn scale(&self, c: Real) -> Self {
        Self {
            terms: self.terms.iter().map(|t| StencilTerm::new(t.coefficient * c, t.color, t.index)).collect(),
            constant: self.constant * c,
        }
    }

    pub fn neg(&self) -> Self {
        self.scale(-1.0)
    }
}

/// A symbolic view of a [`Field`]: `eval_at` returns the field's own
/// coefficient-1 term at `idx`, tagged with this view's `color`, rather
/// than a number — letting an expression tree built over a
/// `StencilField` reveal its per-row stencil (which `(color, index)`
/// pairs it would touch, and with what coefficients) instead of
/// computing a value. This is the leaf every `pde-expr` operator bottoms
/// out at when compiling an equation into a linear system.
pub struct StencilField<'a, const D: usize> {
    field: &'a Field<D>,
    color: u32,
}

impl<'a, const D: usize> StencilField<'a, D> {
    pub fn new(field: &'a Field<D>, color: u32) -> Self {
        Self { field, color }
    }

    pub fn field(&self) -> &'a Field<D> {
        self.field
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    /// The stencil row for evaluating this field's own value at `idx`: a
    /// single term with coefficient 1, under this view's color.
    pub fn eval_at(&self, idx: MDIndex<D>) -> StencilRow<D> {
        StencilRow::term(1.0, self.color, idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bc::BcSpec;
    use crate::location::Location;
    use pde_mesh::CartesianMesh;
    use std::sync::Arc;

    #[test]
    fn leaf_stencil_is_single_unit_term() {
        let mesh = Arc::new(CartesianMesh::<1>::uniform([0.0], [1.0], [9], 1).unwrap());
        let field = Field::new(
            mesh,
            "u",
            [Location::Center],
            [BcSpec::Periodic],
            [BcSpec::Periodic],
        );
        let sf = StencilField::new(&field, 3);
        let row = sf.eval_at(MDIndex::new([2]));
        assert_eq!(row.terms.len(), 1);
        assert_eq!(row.terms[0].coefficient, 1.0);
        assert_eq!(row.terms[0].color, 3);
        assert_eq!(row.terms[0].index, MDIndex::new([2]));
        assert_eq!(row.constant, 0.0);
    }

    #[test]
    fn add_and_scale_combine_rows() {
        let mesh = Arc::new(CartesianMesh::<1>::uniform([0.0], [1.0], [9], 1).unwrap());
        let field = Field::new(
            mesh,
            "u",
            [Location::Center],
            [BcSpec::Periodic],
            [BcSpec::Periodic],
        );
        let sf = StencilField::new(&field, 0);
        let a = sf.eval_at(MDIndex::new([2])).scale(2.0);
        let b = sf.eval_at(MDIndex::new([3])).scale(-1.0);
        let row = a.add(&b).add(&StencilRow::constant(5.0));
        assert_eq!(row.terms.len(), 2);
        assert_eq!(row.constant, 5.0);
        assert_eq!(row.terms[0].coefficient, 2.0);
        assert_eq!(row.terms[1].coefficient, -1.0);
    }
}
