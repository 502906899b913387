use thiserror::Error;

/// Structural mesh-construction failures. Per spec §7 these are fatal at
/// construction time — callers are expected to `unwrap`/`expect` them
/// close to the call site rather than propagate them deep into solver
/// code, matching `InvalidMeshDims`'s "fatal at construction" policy.
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("invalid mesh dims: axis {axis} has {n} node coordinates, need at least 2")]
    InvalidDims { axis: usize, n: usize },
    #[error("dimension mismatch combining two meshes: {0}")]
    DimMismatch(String),
}
