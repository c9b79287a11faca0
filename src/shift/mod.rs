pub mod axis;
pub mod codec;
pub mod engine;
pub mod state;

pub use axis::{Axis, ParseAxisError};
pub use codec::{IndexSet, IndexSetError, VertexIndex};
pub use engine::{ApplyReport, ShiftError};
pub use state::{PropertiesError, ShiftState, ShiftVector, ShiftableObject, ShifterProperties};
