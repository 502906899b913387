use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EquationError {
    #[error("equation set has {equations} equations but {targets} targets; they must match 1:1")]
    TargetCountMismatch { equations: usize, targets: usize },
    #[error("target {color} ({name}) has an empty assignable range; nothing to discretize")]
    EmptyAssignableRange { color: u32, name: String },
    #[error(
        "colored blocked mapper requires every target's assignable range to have the same cell \
         count for per-cell interleaving; target 0 has {first} cells, target {color} has {other}"
    )]
    MismatchedTargetExtents { color: u32, first: i64, other: i64 },
    #[error("static matrix reuse requested but the sparsity pattern changed: row {row} had {expected} columns at setup, now has {actual}")]
    StructureChanged { row: usize, expected: usize, actual: usize },
}
