mod build;
mod kdtree;
mod partition;
mod vtk;

pub use build::build_hierarchy;
pub use kdtree::KdTree;
pub use partition::domain_partition;
pub use vtk::{dump_points, dump_points_to};
