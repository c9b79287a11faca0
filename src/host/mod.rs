//! Seam to the host editing application: vertex positions, selection state and
//! mode switching. The engine only ever talks to a [`MeshHost`].

mod guard;
mod memory;

pub use guard::EditModeGuard;
pub use memory::InMemoryMesh;

use crate::shift::codec::{IndexSet, VertexIndex};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type Position = [f32; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostMode {
    Object,
    /// Vertex indices and positions are addressable.
    Edit,
    Sculpt,
}

impl HostMode {
    pub fn label(self) -> &'static str {
        match self {
            HostMode::Object => "Object",
            HostMode::Edit => "Edit",
            HostMode::Sculpt => "Sculpt",
        }
    }

    pub fn is_editable(self) -> bool {
        matches!(self, HostMode::Edit)
    }
}

impl fmt::Display for HostMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("cannot switch from {from} to {to} mode: {reason}")]
    ModeTransition {
        from: HostMode,
        to: HostMode,
        reason: String,
    },
    #[error("vertex {index} out of range for mesh with {count} vertices")]
    VertexOutOfRange { index: VertexIndex, count: usize },
    #[error("vertex data is not addressable in {0} mode")]
    NotEditable(HostMode),
}

pub type HostResult<T> = Result<T, HostError>;

pub trait MeshHost {
    fn label(&self) -> &'static str;

    fn mode(&self) -> HostMode;

    fn set_mode(&mut self, mode: HostMode) -> HostResult<()>;

    fn vertex_count(&self) -> usize;

    fn position(&self, index: VertexIndex) -> HostResult<Position>;

    fn set_position(&mut self, index: VertexIndex, position: Position) -> HostResult<()>;

    /// Currently selected vertices, or `None` when the host offers no
    /// selection context (for example outside edit mode).
    fn selected_vertices(&self) -> Option<IndexSet>;

    /// Flushes pending vertex edits back to the host mesh.
    fn commit(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_edit_mode_is_editable() {
        assert!(HostMode::Edit.is_editable());
        assert!(!HostMode::Object.is_editable());
        assert!(!HostMode::Sculpt.is_editable());
    }

    #[test]
    fn mode_transition_error_mentions_both_modes() {
        let err = HostError::ModeTransition {
            from: HostMode::Object,
            to: HostMode::Edit,
            reason: "locked".into(),
        };
        let message = err.to_string();
        assert!(message.contains("Object"));
        assert!(message.contains("Edit"));
        assert!(message.contains("locked"));
    }
}
