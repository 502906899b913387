//! The lazy, per-index-evaluable expression graph over mesh-located
//! fields.
//!
//! An [`Expr`] node is evaluated one cell at a time rather than as a
//! whole-array operation: `eval`/`eval_safe` take a single [`pde_types::MDIndex`]
//! and return that cell's value, so an arbitrarily deep tree of
//! arithmetic, finite-difference, and boundary-aware operators composes
//! without ever materializing an intermediate array. The same operator
//! catalogue, built generic over [`Value`], also drives the equation
//! compiler's linear-stencil extraction (`pde-equation`) by swapping the
//! node's result type from `Real` to `pde_field::StencilRow`.

mod bc_eval;
mod expr;
mod leaf;
mod meta;
pub mod ops;
mod value;

pub use bc_eval::{bc_ghost_stencil, bc_ghost_value};
pub use expr::{BoxExpr, BoxStencilExpr, Expr};
pub use leaf::{FieldLeaf, ScalarLeaf, StencilLeaf};
pub use meta::ExprMeta;
pub use value::Value;

pub use ops::arithmetic::{BinaryOp, UnaryOp};
pub use ops::boolean::BooleanOp;
pub use ops::classify::Classify;
pub use ops::comparison::Comparison;
pub use ops::conditional::Conditional;
pub use ops::convolution::{Convolution, Kernel};
pub use ops::decayable::Decayable;
pub use ops::fd::{D1FirstOrderBiasedDownwind, D1FirstOrderBiasedUpwind, D2SecondOrderCentered};
pub use ops::identity::Identity;
pub use ops::index_shift::IndexShift;
pub use ops::interpolation::D1Linear;
pub use ops::linear::{Add, Neg, Scale, Sub};
pub use ops::minmax::MinMax;
pub use ops::named_fn::NamedFn;
pub use ops::weno::{D1Weno53Downwind, D1Weno53Upwind};
