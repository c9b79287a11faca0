use crate::host::MeshHost;
use crate::scene::{ObjectId, Scene};
use crate::shift::{Axis, ShiftVector};
use serde::Serialize;

/// Read-only view of the shifter state for the active object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PanelSnapshot {
    NoObject,
    Object(ObjectPanel),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectPanel {
    pub object: ObjectId,
    pub name: String,
    /// Whether the mesh is in edit mode, i.e. whether Add/Update/Clear see a
    /// selection.
    pub editable: bool,
    pub member_counts: [usize; 3],
    pub shift: ShiftVector,
}

impl PanelSnapshot {
    /// Builds the snapshot without creating shifter state for the object.
    pub fn for_object<H: MeshHost>(scene: &Scene<H>, id: ObjectId) -> Self {
        let (Some(name), Some(mesh)) = (scene.name(id), scene.mesh(id)) else {
            return PanelSnapshot::NoObject;
        };
        let shifter = scene.shifter(id);
        let mut member_counts = [0; 3];
        for axis in Axis::ordered() {
            member_counts[axis.index()] = shifter.map_or(0, |s| s.member_count(axis));
        }
        PanelSnapshot::Object(ObjectPanel {
            object: id,
            name: name.to_string(),
            editable: mesh.mode().is_editable(),
            member_counts,
            shift: shifter.map(|s| s.current_shift()).unwrap_or_default(),
        })
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            PanelSnapshot::NoObject => vec!["Please Select Object".to_string()],
            PanelSnapshot::Object(panel) => {
                let mut lines = Vec::new();
                if panel.editable {
                    lines.extend(Axis::ordered().into_iter().map(|axis| panel.axis_label(axis)));
                } else {
                    lines.push("Enter Edit Mode To Adjust Vertices".to_string());
                }
                let [x, y, z] = panel.shift;
                lines.push(format!("Shift: ({x}, {y}, {z})"));
                lines
            }
        }
    }
}

impl ObjectPanel {
    pub fn member_count(&self, axis: Axis) -> usize {
        self.member_counts[axis.index()]
    }

    pub fn axis_label(&self, axis: Axis) -> String {
        format!("{axis} Vertices - Currently {}", self.member_count(axis))
    }
}
