use pde_equation::Csr;
use pde_types::Real;
use std::io::Write;
use std::path::Path;

/// Writes `{path}_A.mat` (MatrixMarket coordinate format, 1-indexed) and
/// `{path}_b.vec` (one value per line), per `spec.md` §6's solver dump
/// format. Small enough a format that, like the teacher's own VTK point
/// dump, it is worth hand-writing rather than pulling in a dependency.
pub fn write_matrix_market(a: &Csr, b: &[Real], path: &Path) -> std::io::Result<()> {
    let mat_path = append_suffix(path, "_A.mat");
    let mut mat = std::io::BufWriter::new(std::fs::File::create(&mat_path)?);
    writeln!(mat, "%%MatrixMarket matrix coordinate real general")?;
    writeln!(mat, "{} {} {}", a.nrows(), a.ncols, a.nnz())?;
    for r in 0..a.nrows() {
        let (cols, vals) = a.row(r);
        for (&c, &v) in cols.iter().zip(vals) {
            writeln!(mat, "{} {} {:e}", r + 1, c + 1, v)?;
        }
    }

    let vec_path = append_suffix(path, "_b.vec");
    let mut vec_file = std::io::BufWriter::new(std::fs::File::create(&vec_path)?);
    writeln!(vec_file, "{}", b.len())?;
    for v in b {
        writeln!(vec_file, "{:e}", v)?;
    }
    Ok(())
}

fn append_suffix(path: &Path, suffix: &str) -> std::path::PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(suffix);
    std::path::PathBuf::from(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_a_and_b_files() {
        let a = Csr::from_rows(vec![vec![(0, 2.0)], vec![(1, 3.0)]], vec![1.0, 2.0], 2);
        let dir = std::env::temp_dir().join(format!("pde-solver-dump-test-{}", std::process::id()));
        write_matrix_market(&a, &a.rhs.clone(), &dir).unwrap();
        let mat = std::fs::read_to_string(append_suffix(&dir, "_A.mat")).unwrap();
        assert!(mat.starts_with("%%MatrixMarket"));
        let vec_contents = std::fs::read_to_string(append_suffix(&dir, "_b.vec")).unwrap();
        assert!(vec_contents.contains('2'));
        let _ = std::fs::remove_file(append_suffix(&dir, "_A.mat"));
        let _ = std::fs::remove_file(append_suffix(&dir, "_b.vec"));
    }
}
