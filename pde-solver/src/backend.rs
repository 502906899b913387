use crate::error::SolverError;
use pde_equation::Csr;
use pde_types::Real;
use std::path::PathBuf;

/// Parameters every backend wrapper carries, per `spec.md` §4.6: common
/// knobs (`tol`, `max_iter`) plus the universal `pin_value`/`static_mat`/
/// `dump_path`, plus the handful of backend-specific extras (`k_dim` for
/// GMRES-family solvers, `num_pre_relax`/`num_post_relax` for the
/// multigrid-named wrappers) left `None`/default when not applicable.
#[derive(Clone, Debug)]
pub struct SolverParams {
    pub tol: Real,
    pub max_iter: usize,
    pub k_dim: Option<usize>,
    pub num_pre_relax: Option<usize>,
    pub num_post_relax: Option<usize>,
    pub pin_value: bool,
    pub static_mat: bool,
    pub dump_path: Option<PathBuf>,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            tol: 1e-8,
            max_iter: 200,
            k_dim: None,
            num_pre_relax: None,
            num_post_relax: None,
            pin_value: false,
            static_mat: false,
            dump_path: None,
        }
    }
}

/// Diagnostics available after a `solve()`, per `spec.md` §4.6's
/// `getIterNum`/`getFinalRes`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolverStats {
    pub iters: usize,
    pub final_res: Real,
}

/// The uniform backend wrapper contract from `spec.md` §4.6. `init`
/// applies cached parameters to a handle that doesn't exist yet in this
/// port (there is no opaque C handle to configure), so it is a no-op for
/// every implementor here; `setup` does whatever backend-specific
/// preparation (factorization, coarse-grid construction) a given
/// algorithm needs before `solve` can run.
pub trait SolverBackend {
    fn params(&self) -> &SolverParams;

    fn init(&mut self) {}

    /// Backend-specific preparation. Takes the assembled system so a
    /// multigrid-style wrapper can build its hierarchy; the hand-rolled
    /// Krylov methods in this crate have nothing to precompute and leave
    /// this a no-op.
    fn setup(&mut self, _a: &Csr) {}

    /// Iterate `x` towards a solution of `A x = b`, returning the best
    /// iterate and its stats even when `SolverError::SolverNotConverged`
    /// is returned (per `spec.md` §7's non-fatal numeric-issue policy).
    fn solve(&mut self, a: &Csr, b: &[Real], x0: &[Real]) -> Result<(Vec<Real>, SolverStats), SolverError>;

    /// Wire another solver in as a preconditioner. The default no-op
    /// matches every hand-rolled solver here, none of which currently
    /// consult a registered preconditioner inside its own iteration;
    /// `PrecondSolver` is the composition point that actually uses one.
    fn set_precond(&mut self, _precond: Box<dyn SolverBackend>) {}

    fn dump(&self, a: &Csr, b: &[Real]) -> std::io::Result<()> {
        if let Some(path) = self.params().dump_path.clone() {
            crate::dump::write_matrix_market(a, b, &path)?;
        }
        Ok(())
    }
}
