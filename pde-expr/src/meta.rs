use pde_field::BcSpec;
use pde_types::AxisBox;

/// Metadata propagated bottom-up by `Expr::prepare`: the node's name,
/// its per-axis boundary descriptors, and its four windowing ranges.
/// Mirrors the fields every `FieldExprTrait`-derived node in the
/// original carries alongside its value.
#[derive(Clone, Debug)]
pub struct ExprMeta<const D: usize> {
    pub name: String,
    pub bc_start: [BcSpec; D],
    pub bc_end: [BcSpec; D],
    /// Always empty for a derived expression: only a `Field` leaf is
    /// writable.
    pub assignable: AxisBox<D>,
    pub accessible: AxisBox<D>,
    pub local: AxisBox<D>,
    pub logical: AxisBox<D>,
}

impl<const D: usize> ExprMeta<D> {
    pub fn leaf(
        name: impl Into<String>,
        bc_start: [BcSpec; D],
        bc_end: [BcSpec; D],
        assignable: AxisBox<D>,
        accessible: AxisBox<D>,
        local: AxisBox<D>,
        logical: AxisBox<D>,
    ) -> Self {
        Self {
            name: name.into(),
            bc_start,
            bc_end,
            assignable,
            accessible,
            local,
            logical,
        }
    }

    /// The default rule for a derived (non-leaf) node with no BC of its
    /// own to publish: `Internal` on every face, empty `assignable`,
    /// and the given narrowed ranges. This port's resolution of the
    /// upstream "BC for result expr not calculated" ambiguity — see
    /// `IndexShift`/`Interpolation` for the two operators that instead
    /// combine the argument's BCs.
    pub fn derived(name: impl Into<String>, accessible: AxisBox<D>, local: AxisBox<D>, logical: AxisBox<D>) -> Self {
        Self {
            name: name.into(),
            bc_start: std::array::from_fn(|_| BcSpec::Internal),
            bc_end: std::array::from_fn(|_| BcSpec::Internal),
            assignable: AxisBox::empty(),
            accessible,
            local,
            logical,
        }
    }

    /// Combine two argument ranges for a binary node: a scalar leaf
    /// publishes an empty range, so an empty side simply defers to the
    /// other; when both are non-empty, intersect.
    pub fn combine_range(a: AxisBox<D>, b: AxisBox<D>) -> AxisBox<D> {
        if a.is_empty() {
            b
        } else if b.is_empty() {
            a
        } else {
            a.intersect(&b).unwrap_or(a)
        }
    }
}
