use thiserror::Error;

/// Recoverable errors raised by the range/index algebra.
///
/// Structural mistakes that the spec calls "fatal, abort with context"
/// (e.g. combining a 2D and 3D range) are instead asserted on directly at
/// the call site, matching the teacher crate's own style of `assert!`-ing
/// invariants rather than threading a `Result` through every leaf
/// operation. This error type exists for the handful of places (range
/// intersection across mismatched strides) where the spec explicitly asks
/// for a named, catchable failure instead of a panic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("dim-mismatch: ranges have incompatible strides on axis {axis}: {a} vs {b}")]
    DimMismatch { axis: usize, a: i64, b: i64 },
}
