use crate::field::Field;
use pde_types::{AxisBox, RangedIndex, Real};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FieldIoError {
    #[error("field {field}: stored shape {stored:?} does not match field's readable shape {expected:?}")]
    ShapeMismatch {
        field: String,
        stored: Vec<i64>,
        expected: Vec<i64>,
    },
    #[error("I/O error: {0}")]
    Io(String),
}

/// Field persistence, per `spec.md` §6: one dataset per field, grouped
/// under `/t{timestamp}/fieldName` when a time stamp is given. A
/// distributed caller writes only its own `local` (readable) shard into
/// the corresponding hyperslab of the global dataset; this trait's
/// single-rank implementations write the whole `accessible` range.
pub trait FieldIo<const D: usize> {
    fn write_field(&self, field: &Field<D>, timestamp: Option<u64>) -> Result<(), FieldIoError>;
    fn read_field(&self, field: &mut Field<D>, timestamp: Option<u64>) -> Result<(), FieldIoError>;
}

fn dataset_path(field_name: &str, timestamp: Option<u64>) -> String {
    match timestamp {
        Some(t) => format!("/t{t}/{field_name}"),
        None => format!("/{field_name}"),
    }
}

/// A small, hand-rolled ASCII VTK-style writer for field data, the
/// always-available default `FieldIo`. Too small a format (one array per
/// dataset path, row-major) to justify a dependency, matching the
/// teacher's own preference for hand-rolled algorithmic code over crates
/// for anything beyond ambient plumbing; it writes one `.vtk.txt` file
/// per call rather than a single HDF5 container, so `root` is a
/// directory.
pub struct VtkAsciiIo {
    pub root: std::path::PathBuf,
}

impl VtkAsciiIo {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, field_name: &str, timestamp: Option<u64>) -> std::path::PathBuf {
        let rel = dataset_path(field_name, timestamp);
        self.root.join(rel.trim_start_matches('/')).with_extension("vtk.txt")
    }
}

impl<const D: usize> FieldIo<D> for VtkAsciiIo {
    fn write_field(&self, field: &Field<D>, timestamp: Option<u64>) -> Result<(), FieldIoError> {
        let range = *field.accessible();
        let path = self.path_for(field.name(), timestamp);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| FieldIoError::Io(e.to_string()))?;
        }
        let mut out = String::new();
        out.push_str(&format!("# field {}\n", field.name()));
        out.push_str(&format!("shape {:?}\n", range.extents()));
        for idx in RangedIndex::begin(&range) {
            let v = field.get(idx).unwrap_or(Real::NAN);
            out.push_str(&format!("{v:.17e}\n"));
        }
        std::fs::write(&path, out).map_err(|e| FieldIoError::Io(e.to_string()))
    }

    fn read_field(&self, field: &mut Field<D>, timestamp: Option<u64>) -> Result<(), FieldIoError> {
        let range = *field.accessible();
        let path = self.path_for(field.name(), timestamp);
        let text = std::fs::read_to_string(&path).map_err(|e| FieldIoError::Io(e.to_string()))?;
        let mut lines = text.lines();
        let _header = lines.next();
        let shape_line = lines.next().unwrap_or("");
        let stored_extents = parse_extents::<D>(shape_line);
        if stored_extents != range.extents() {
            return Err(FieldIoError::ShapeMismatch {
                field: field.name().to_string(),
                stored: stored_extents.to_vec(),
                expected: range.extents().to_vec(),
            });
        }
        for idx in RangedIndex::begin(&range) {
            let v: Real = lines.next().and_then(|l| l.trim().parse().ok()).unwrap_or(Real::NAN);
            field.set(idx, v).expect("accessible subset of logical by construction");
        }
        Ok(())
    }
}

fn parse_extents<const D: usize>(line: &str) -> [i64; D] {
    let nums: Vec<i64> = line
        .trim_start_matches("shape ")
        .trim_matches(|c| c == '[' || c == ']')
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    let mut out = [0i64; D];
    for (k, v) in out.iter_mut().enumerate() {
        *v = nums.get(k).copied().unwrap_or(0);
    }
    out
}

/// An HDF5-backed [`FieldIo`], matching `spec.md` §6's layout exactly:
/// one dataset per field, shaped by the field's global readable range,
/// under `/t{timestamp}/fieldName` when `timestamp` is `Some`. Behind the
/// `hdf5-io` feature so the base crate never pulls in libhdf5.
#[cfg(feature = "hdf5-io")]
pub struct Hdf5Io {
    pub path: std::path::PathBuf,
}

#[cfg(feature = "hdf5-io")]
impl Hdf5Io {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(feature = "hdf5-io")]
impl<const D: usize> FieldIo<D> for Hdf5Io {
    fn write_field(&self, field: &Field<D>, timestamp: Option<u64>) -> Result<(), FieldIoError> {
        let range = *field.accessible();
        let shape: Vec<usize> = range.extents().iter().map(|&e| e as usize).collect();
        let mut data = Vec::with_capacity(range.count().max(0) as usize);
        for idx in RangedIndex::begin(&range) {
            data.push(field.get(idx).unwrap_or(Real::NAN));
        }
        let file = if self.path.exists() {
            hdf5_metno::File::append(&self.path)
        } else {
            hdf5_metno::File::create(&self.path)
        }
        .map_err(|e| FieldIoError::Io(e.to_string()))?;
        let write = |group: &hdf5_metno::Group| {
            group
                .new_dataset::<Real>()
                .shape(shape.clone())
                .create(field.name())
                .and_then(|ds| ds.write(&data))
        };
        let result = match timestamp {
            Some(t) => {
                let group = file.create_group(&format!("t{t}")).map_err(|e| FieldIoError::Io(e.to_string()))?;
                write(&group)
            }
            None => write(&file),
        };
        result.map_err(|e| FieldIoError::Io(e.to_string()))
    }

    fn read_field(&self, field: &mut Field<D>, timestamp: Option<u64>) -> Result<(), FieldIoError> {
        let range = *field.accessible();
        let expected: Vec<usize> = range.extents().iter().map(|&e| e as usize).collect();
        let file = hdf5_metno::File::open(&self.path).map_err(|e| FieldIoError::Io(e.to_string()))?;
        let ds = match timestamp {
            Some(t) => {
                let group = file.group(&format!("t{t}")).map_err(|e| FieldIoError::Io(e.to_string()))?;
                group.dataset(field.name())
            }
            None => file.dataset(field.name()),
        }
        .map_err(|e| FieldIoError::Io(e.to_string()))?;
        if ds.shape() != expected {
            return Err(FieldIoError::ShapeMismatch {
                field: field.name().to_string(),
                stored: ds.shape().iter().map(|&s| s as i64).collect(),
                expected: range.extents().to_vec(),
            });
        }
        let data: Vec<Real> = ds.read_raw().map_err(|e| FieldIoError::Io(e.to_string()))?;
        for (idx, v) in RangedIndex::begin(&range).zip(data) {
            field.set(idx, v).expect("accessible subset of logical by construction");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bc::BcSpec;
    use crate::location::Location;
    use pde_mesh::CartesianMesh;
    use std::sync::Arc;

    #[test]
    fn vtk_ascii_round_trips() {
        let dir = std::env::temp_dir().join(format!("pde-field-io-test-{:p}", &0));
        let mesh = Arc::new(CartesianMesh::<1>::uniform([0.0], [1.0], [9], 1).unwrap());
        let mut f = Field::new(
            mesh.clone(),
            "u",
            [Location::Center],
            [BcSpec::Dirichlet(0.0.into())],
            [BcSpec::Dirichlet(0.0.into())],
        );
        f.fill_assignable(|idx| idx[0] as Real);
        let io = VtkAsciiIo::new(dir);
        io.write_field(&f, Some(3)).unwrap();
        let mut f2 = Field::new(mesh, "u", [Location::Center], [BcSpec::Dirichlet(0.0.into())], [BcSpec::Dirichlet(0.0.into())]);
        io.read_field(&mut f2, Some(3)).unwrap();
        let range = *f.accessible();
        for idx in RangedIndex::begin(&range) {
            assert_eq!(f.get(idx).unwrap(), f2.get(idx).unwrap());
        }
    }
}
