mod backend;
mod dump;
mod error;
pub mod krylov;
mod precond;
mod solvers;

pub use backend::{SolverBackend, SolverParams, SolverStats};
pub use dump::write_matrix_market;
pub use error::SolverError;
pub use precond::PrecondSolver;
pub use solvers::{
    BiCgStabSolver, CyclicReductionSolver, FacSolver, FgmresSolver, GmresSolver, JacobiSolver, LgmresSolver, NoneSolver, PcgSolver, PfmgSolver,
    SmgSolver,
};
