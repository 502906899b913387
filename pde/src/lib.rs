//! Aggregates the `pde-*` subsystem crates behind one facade, the way
//! the teacher workspace's root `astar-pairwise-aligner` crate
//! re-exports `pa-heuristic`/`astarpa`/... for its own binary and
//! downstream consumers.

pub mod types {
    pub use pde_types::*;
}

pub mod mesh {
    pub use pde_mesh::*;
}

pub mod amr {
    pub use pde_amr::*;
}

pub mod field {
    pub use pde_field::*;
}

pub mod expr {
    pub use pde_expr::*;
}

pub mod equation {
    pub use pde_equation::*;
}

pub mod solver {
    pub use pde_solver::*;
}

pub use pde_equation::{ColoredBlockedMDRangeMapper, Csr, EqnSet, Equation, EquationError, TargetSet};
pub use pde_expr::{BoxExpr, BoxStencilExpr, Expr, Value};
pub use pde_field::{BcSpec, Field, Location};
pub use pde_mesh::{CartesianAMRMesh, CartesianMesh, ExtMode};
pub use pde_solver::{SolverBackend, SolverError, SolverParams, SolverStats};
pub use pde_types::{AxisBox, MDIndex, Real};
