use crate::csr::Csr;
use crate::equation::EqnSet;
use crate::error::EquationError;
use crate::mapper::ColoredBlockedMDRangeMapper;
use pde_expr::{Expr, Value};
use pde_types::{AxisBox, RangedIndex, Real};
use tracing::debug;

/// Discretizes every equation in `eqnset` at each of its target's
/// writable cells and assembles the resulting rows into CSR, per
/// `spec.md` §4.5 steps 1-6. Single-rank only (`block_offset = 0`):
/// distributed assembly would additionally need each rank's block size
/// from every other rank to compute its `block_offset`, a collective
/// [`pde_field::Communicator`] doesn't expose — `spec.md` §5 names MPI
/// itself as an out-of-scope external collaborator, so this compiler
/// implements the single-block path the default `SingleRank`
/// communicator exercises, and documents multi-rank `block_offset`
/// wiring as the extension point.
fn assemble<const D: usize>(eqnset: &mut EqnSet<D>) -> Result<(Vec<Vec<(usize, Real)>>, Vec<Real>, usize), EquationError> {
    if eqnset.equations.len() != eqnset.targets.len() {
        return Err(EquationError::TargetCountMismatch {
            equations: eqnset.equations.len(),
            targets: eqnset.targets.len(),
        });
    }
    eqnset.prepare();

    let ranges: Vec<AxisBox<D>> = eqnset.targets.iter().map(|f| *f.assignable()).collect();
    for (color, (range, field)) in ranges.iter().zip(eqnset.targets.iter()).enumerate() {
        if range.is_empty() {
            return Err(EquationError::EmptyAssignableRange {
                color: color as u32,
                name: field.name().to_string(),
            });
        }
    }

    let mapper = ColoredBlockedMDRangeMapper::new(ranges.clone(), 0)?;
    let ncols = mapper.local_count() as usize;
    let mut rows: Vec<Vec<(usize, Real)>> = vec![Vec::new(); ncols];
    let mut rhs: Vec<Real> = vec![0.0; ncols];

    for (color, eq) in eqnset.equations.iter().enumerate() {
        let range = ranges[color];
        let mut touched = 0usize;
        for idx in RangedIndex::begin(&range) {
            let row = eq.lhs.eval_safe(idx).sub(&eq.rhs.eval_safe(idx));
            let global_row = mapper.global(color as u32, idx) as usize;

            if eq.is_pinned() && Some(global_row as i64) == mapper.first_row(color as u32) {
                rows[global_row] = vec![(global_row, 1.0)];
                rhs[global_row] = 0.0;
                continue;
            }

            let mut terms = Vec::with_capacity(row.terms.len());
            for term in &row.terms {
                let col = mapper.global(term.color, term.index) as usize;
                terms.push((col, term.coefficient));
            }
            rows[global_row] = terms;
            rhs[global_row] = -row.constant;
            touched += 1;
        }
        debug!(color, touched, "discretized equation");
    }

    Ok((rows, rhs, ncols))
}

/// One-shot compile with no static-matrix reuse: rebuilds the full CSR
/// from scratch, appropriate when the system's coefficients depend on
/// an evolving field (`staticMat = false`).
pub fn compile<const D: usize>(eqnset: &mut EqnSet<D>) -> Result<Csr, EquationError> {
    let (rows, rhs, ncols) = assemble(eqnset)?;
    Ok(Csr::from_rows(rows, rhs, ncols))
}

/// A cached-pattern compiler for the `staticMat = true` case: the first
/// `compile` call establishes the sparsity pattern; every later call
/// re-discretizes (coefficients may still depend on boundary data that
/// changes between solves) but verifies the resulting pattern still
/// matches what was cached, returning
/// [`EquationError::StructureChanged`] rather than silently handing the
/// solver a matrix whose reused `row_ptr`/`col_idx` no longer describe
/// its `val`/`rhs`.
#[derive(Default)]
pub struct Compiler {
    cached_pattern: Option<(Vec<usize>, Vec<usize>)>,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compile<const D: usize>(&mut self, eqnset: &mut EqnSet<D>, static_mat: bool) -> Result<Csr, EquationError> {
        let (rows, rhs, ncols) = assemble(eqnset)?;
        let csr = Csr::from_rows(rows, rhs, ncols);

        if !static_mat {
            self.cached_pattern = None;
            return Ok(csr);
        }

        match &self.cached_pattern {
            Some((row_ptr, col_idx)) => {
                if row_ptr != &csr.row_ptr || col_idx != &csr.col_idx {
                    let row = row_ptr
                        .iter()
                        .zip(csr.row_ptr.iter())
                        .position(|(a, b)| a != b)
                        .unwrap_or(row_ptr.len().min(csr.row_ptr.len()));
                    return Err(EquationError::StructureChanged {
                        row,
                        expected: row_ptr.len(),
                        actual: csr.row_ptr.len(),
                    });
                }
            }
            None => {
                self.cached_pattern = Some((csr.row_ptr.clone(), csr.col_idx.clone()));
            }
        }
        Ok(csr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equation::Equation;
    use pde_expr::{BoxStencilExpr, D2SecondOrderCentered, NamedFn, Scale, StencilLeaf};
    use pde_field::{BcSpec, Field, Location, StencilRow};
    use pde_mesh::CartesianMesh;
    use std::sync::Arc;

    /// `-u'' = f` (manufactured with `f = -2`) on `[0,1]` with Dirichlet
    /// BCs, 11 writable cells (`assignable` covers the whole node range;
    /// Dirichlet ghosts live one cell outside it on each face).
    #[test]
    fn poisson_dirichlet_assembles_a_tridiagonal_system() {
        let mesh = Arc::new(CartesianMesh::<1>::uniform([0.0], [1.0], [11], 1).unwrap());
        let u = Arc::new(Field::new(mesh.clone(), "u", [Location::Center], [BcSpec::dirichlet(0.0)], [BcSpec::dirichlet(1.0)]));

        let lhs: BoxStencilExpr<1> = {
            let leaf = StencilLeaf::new(u.clone(), 0);
            let d2: D2SecondOrderCentered<1, StencilRow<1>> = D2SecondOrderCentered::new(0, mesh.clone(), Location::Center, Box::new(leaf));
            Box::new(Scale::constant(-1.0, Box::new(d2)))
        };
        let rhs: BoxStencilExpr<1> = Box::new(NamedFn::<1, StencilRow<1>>::new("f", mesh, Arc::new(|_| -2.0)));

        let mut eqnset = EqnSet::new(vec![Equation::new(lhs, rhs)], vec![u]);
        let csr = compile(&mut eqnset).unwrap();
        assert_eq!(csr.nrows(), 11);
        assert!(csr.nnz() >= 11 * 3 - 4);
    }

    #[test]
    fn target_count_mismatch_is_rejected() {
        let mesh = Arc::new(CartesianMesh::<1>::uniform([0.0], [1.0], [5], 1).unwrap());
        let u = Arc::new(Field::new(mesh.clone(), "u", [Location::Center], [BcSpec::Periodic], [BcSpec::Periodic]));
        let lhs: BoxStencilExpr<1> = Box::new(StencilLeaf::new(u.clone(), 0));
        let rhs: BoxStencilExpr<1> = Box::new(StencilLeaf::new(u.clone(), 0));
        let extra_lhs: BoxStencilExpr<1> = Box::new(StencilLeaf::new(u.clone(), 0));
        let extra_rhs: BoxStencilExpr<1> = Box::new(NamedFn::<1, StencilRow<1>>::new("zero", mesh, Arc::new(|_| 0.0)));
        let mut eqnset: EqnSet<1> = EqnSet::new(vec![Equation::new(lhs, rhs), Equation::new(extra_lhs, extra_rhs)], vec![u]);
        assert!(compile(&mut eqnset).is_err());
    }
}
