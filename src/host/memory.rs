use super::{HostError, HostMode, HostResult, MeshHost, Position};
use crate::shift::codec::{IndexSet, VertexIndex};

/// Headless mesh host holding vertex positions and a selection in memory.
///
/// Vertex data is only addressable in edit mode, mirroring an interactive
/// editor. `lock_mode` makes every mode switch fail; `lock_edit_exit` only
/// fails switches out of edit mode.
#[derive(Debug, Clone)]
pub struct InMemoryMesh {
    positions: Vec<Position>,
    selected: IndexSet,
    mode: HostMode,
    mode_lock: Option<String>,
    exit_lock: Option<String>,
    mode_transitions: usize,
    commits: usize,
}

impl InMemoryMesh {
    pub fn new(positions: Vec<Position>) -> Self {
        Self {
            positions,
            selected: IndexSet::new(),
            mode: HostMode::Object,
            mode_lock: None,
            exit_lock: None,
            mode_transitions: 0,
            commits: 0,
        }
    }

    /// Axis-aligned box spanning `min..max`, vertices in binary corner order
    /// (bit 0 = x, bit 1 = y, bit 2 = z).
    pub fn cuboid(min: Position, max: Position) -> Self {
        let positions = (0..8u32)
            .map(|corner| {
                let pick = |bit: u32, axis: usize| {
                    if corner & (1 << bit) == 0 {
                        min[axis]
                    } else {
                        max[axis]
                    }
                };
                [pick(0, 0), pick(1, 1), pick(2, 2)]
            })
            .collect();
        Self::new(positions)
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn select<I>(&mut self, indices: I)
    where
        I: IntoIterator<Item = VertexIndex>,
    {
        self.selected.extend(indices);
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    pub fn lock_mode(&mut self, reason: impl Into<String>) {
        self.mode_lock = Some(reason.into());
    }

    pub fn lock_edit_exit(&mut self, reason: impl Into<String>) {
        self.exit_lock = Some(reason.into());
    }

    pub fn unlock_mode(&mut self) {
        self.mode_lock = None;
        self.exit_lock = None;
    }

    pub fn mode_transitions(&self) -> usize {
        self.mode_transitions
    }

    pub fn commits(&self) -> usize {
        self.commits
    }

    fn slot(&self, index: VertexIndex) -> HostResult<usize> {
        if !self.mode.is_editable() {
            return Err(HostError::NotEditable(self.mode));
        }
        let slot = index as usize;
        if slot >= self.positions.len() {
            return Err(HostError::VertexOutOfRange {
                index,
                count: self.positions.len(),
            });
        }
        Ok(slot)
    }
}

impl MeshHost for InMemoryMesh {
    fn label(&self) -> &'static str {
        "In-Memory Mesh"
    }

    fn mode(&self) -> HostMode {
        self.mode
    }

    fn set_mode(&mut self, mode: HostMode) -> HostResult<()> {
        if mode == self.mode {
            return Ok(());
        }
        let leaving_edit = self.mode.is_editable() && !mode.is_editable();
        let lock = match (&self.mode_lock, &self.exit_lock) {
            (Some(reason), _) => Some(reason),
            (None, Some(reason)) if leaving_edit => Some(reason),
            _ => None,
        };
        if let Some(reason) = lock {
            return Err(HostError::ModeTransition {
                from: self.mode,
                to: mode,
                reason: reason.clone(),
            });
        }
        self.mode = mode;
        self.mode_transitions += 1;
        Ok(())
    }

    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn position(&self, index: VertexIndex) -> HostResult<Position> {
        let slot = self.slot(index)?;
        Ok(self.positions[slot])
    }

    fn set_position(&mut self, index: VertexIndex, position: Position) -> HostResult<()> {
        let slot = self.slot(index)?;
        self.positions[slot] = position;
        Ok(())
    }

    fn selected_vertices(&self) -> Option<IndexSet> {
        if !self.mode.is_editable() {
            return None;
        }
        let count = self.positions.len();
        Some(
            self.selected
                .iter()
                .copied()
                .filter(|index| (*index as usize) < count)
                .collect(),
        )
    }

    fn commit(&mut self) {
        self.commits += 1;
    }
}
