use serde::{Deserialize, Serialize};

/// Where a field's values live relative to a mesh cell, per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    /// Cell-centered: value lives at the cell midpoint.
    Center,
    /// Node/corner-aligned: value lives at the cell corner.
    Corner,
}

impl Default for Location {
    fn default() -> Self {
        Location::Center
    }
}
