//! Axis shifting for box-like meshes: tag vertices on the X, Y or Z axis and
//! move every tagged vertex by the change in a per-object shift vector.

pub mod editor;
pub mod host;
pub mod scene;
pub mod shift;

pub use editor::{
    CommandOutcome, EditorError, PanelSnapshot, ShifterCommand, ShifterConfig, ShifterEditor,
};
pub use host::{EditModeGuard, HostError, HostMode, InMemoryMesh, MeshHost};
pub use scene::{ObjectId, Scene, SceneDocument, SceneError};
pub use shift::{Axis, ShiftError, ShiftableObject, ShifterProperties};
