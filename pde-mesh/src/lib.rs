mod amr;
mod cartesian;
mod error;

pub use amr::{CartesianAMRMesh, MeshBuilder, NeighborEdge, ParentEdge};
pub use cartesian::{CartesianMesh, ExtMode};
pub use error::MeshError;
