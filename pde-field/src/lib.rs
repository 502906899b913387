mod amr_field;
mod bc;
mod comm;
mod error;
mod field;
mod io;
mod location;
mod neighbor;
mod stencil;

pub use amr_field::AmrField;
pub use bc::{BcSpec, BcValue, NamedFn};
pub use comm::{Communicator, SingleRank};
pub use error::FieldError;
pub use field::Field;
pub use io::{FieldIo, FieldIoError, VtkAsciiIo};
#[cfg(feature = "hdf5-io")]
pub use io::Hdf5Io;
pub use location::Location;
pub use neighbor::NeighborInfo;
pub use stencil::{StencilField, StencilRow, StencilTerm};
