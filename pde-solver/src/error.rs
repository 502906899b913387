use pde_types::Real;
use thiserror::Error;

/// Recoverable solver failures. Per spec.md §7, numeric non-convergence
/// is surfaced, not fatal: a failed solve still returns the best iterate
/// it found alongside this error so the caller can inspect diagnostics
/// and decide whether to retry, tighten `tol`, or accept the result.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    #[error("solver did not converge: {iters} iterations, final residual {final_res:e} (tol {tol:e})")]
    SolverNotConverged { iters: usize, final_res: Real, tol: Real },
    /// The out-of-scope external collaborator (spec.md §1's HYPRE/BoomerAMG
    /// FFI) returning a nonzero status code. No backend in this crate
    /// actually calls out to one, so this variant exists for the wrapper
    /// contract's sake and is never constructed by the reference solvers.
    #[error("backend FFI call returned error code {code}: {message}")]
    FFIBackendError { code: i32, message: String },
}
