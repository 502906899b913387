use pde_types::Real;

/// `(row_ptr, col_idx, val, rhs)` per `spec.md` §3.8: `row_ptr[r+1] -
/// row_ptr[r]` is row `r`'s non-zero count, `col_idx`/`val` over
/// `row_ptr[r]..row_ptr[r+1]` are that row's column indices and
/// coefficients, `rhs[r]` its right-hand side. For a multi-equation
/// system this is the block-diagonal coupling of the per-equation
/// matrices: a row may carry columns belonging to any target's color,
/// since one equation can reference every target in the system.
#[derive(Clone, Debug, Default)]
pub struct Csr {
    pub row_ptr: Vec<usize>,
    pub col_idx: Vec<usize>,
    pub val: Vec<Real>,
    pub rhs: Vec<Real>,
    pub ncols: usize,
}

impl Csr {
    pub fn nrows(&self) -> usize {
        self.row_ptr.len().saturating_sub(1)
    }

    pub fn nnz(&self) -> usize {
        self.col_idx.len()
    }

    pub fn row(&self, r: usize) -> (&[usize], &[Real]) {
        let lo = self.row_ptr[r];
        let hi = self.row_ptr[r + 1];
        (&self.col_idx[lo..hi], &self.val[lo..hi])
    }

    /// Builds the CSR from a row-at-a-time assembly: `rows[r]` is that
    /// row's `(col, coefficient)` pairs, duplicates folded by summing
    /// coefficients with the same column.
    pub fn from_rows(rows: Vec<Vec<(usize, Real)>>, rhs: Vec<Real>, ncols: usize) -> Self {
        let mut row_ptr = Vec::with_capacity(rows.len() + 1);
        let mut col_idx = Vec::new();
        let mut val = Vec::new();
        row_ptr.push(0);
        for mut terms in rows {
            terms.sort_by_key(|(c, _)| *c);
            let mut folded: Vec<(usize, Real)> = Vec::with_capacity(terms.len());
            for (c, v) in terms {
                if let Some(last) = folded.last_mut() {
                    if last.0 == c {
                        last.1 += v;
                        continue;
                    }
                }
                folded.push((c, v));
            }
            for (c, v) in folded {
                col_idx.push(c);
                val.push(v);
            }
            row_ptr.push(col_idx.len());
        }
        Self {
            row_ptr,
            col_idx,
            val,
            rhs,
            ncols,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_folds_duplicate_columns() {
        let csr = Csr::from_rows(vec![vec![(0, 1.0), (1, 2.0), (0, 3.0)]], vec![5.0], 2);
        assert_eq!(csr.nrows(), 1);
        let (cols, vals) = csr.row(0);
        assert_eq!(cols, &[0, 1]);
        assert_eq!(vals, &[4.0, 2.0]);
        assert_eq!(csr.rhs, vec![5.0]);
    }

    #[test]
    fn empty_rows_yield_empty_row_ptr_deltas() {
        let csr = Csr::from_rows(vec![vec![], vec![(0, 1.0)]], vec![0.0, 1.0], 1);
        assert_eq!(csr.row_ptr, vec![0, 0, 1]);
    }
}
