//! Axis-aligned ranges, multi-dimensional indices and the splittable-range
//! iteration primitives that the rest of the `pde-*` crates build on.
//!
//! Mirrors `DS::Range`/`DS::MDIndex` from the original C++ core: a `Range`
//! (here [`AxisBox`]) is a half-open, strided box over `D` axes, and an
//! [`MDIndex`] is a `D`-tuple of integer cell coordinates. AMR adds a
//! `(level, part)` label to both, giving [`LevelRange`] and
//! [`LevelMDIndex`].

mod error;
mod hashing;
mod index;
mod level;
mod range;
mod range_for;

pub use error::TypesError;
pub use hashing::XxIndexMap;
pub use index::{MDIndex, RangedIndex};
pub use level::{LevelMDIndex, LevelRange};
pub use range::AxisBox;
pub use range_for::{range_for, range_reduce};

/// Floating point type used for all mesh coordinates and field values.
pub type Real = f64;

/// Index into an axis (0-based).
pub type Axis = usize;
