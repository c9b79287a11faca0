use super::axis::Axis;
use super::codec::{self, IndexSet, IndexSetError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ShiftVector = [f32; 3];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftState {
    pub current_shift: ShiftVector,
    /// Value of `current_shift` as of the last completed apply.
    pub last_applied_shift: ShiftVector,
}

/// Per-object shifter state: one membership set per axis plus the shift pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShiftableObject {
    memberships: [IndexSet; 3],
    shift: ShiftState,
}

impl ShiftableObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn membership(&self, axis: Axis) -> &IndexSet {
        &self.memberships[axis.index()]
    }

    pub(crate) fn membership_mut(&mut self, axis: Axis) -> &mut IndexSet {
        &mut self.memberships[axis.index()]
    }

    pub fn member_count(&self, axis: Axis) -> usize {
        self.membership(axis).len()
    }

    pub fn shift_state(&self) -> &ShiftState {
        &self.shift
    }

    pub(crate) fn shift_state_mut(&mut self) -> &mut ShiftState {
        &mut self.shift
    }

    pub fn current_shift(&self) -> ShiftVector {
        self.shift.current_shift
    }

    pub fn last_applied_shift(&self) -> ShiftVector {
        self.shift.last_applied_shift
    }

    pub fn to_properties(&self) -> ShifterProperties {
        ShifterProperties {
            x_verts: codec::encode(self.membership(Axis::X).iter().copied()),
            y_verts: codec::encode(self.membership(Axis::Y).iter().copied()),
            z_verts: codec::encode(self.membership(Axis::Z).iter().copied()),
            last_shift: self.shift.last_applied_shift,
            shift: self.shift.current_shift,
        }
    }

    pub fn from_properties(props: &ShifterProperties) -> Result<Self, PropertiesError> {
        let mut object = Self::new();
        for axis in Axis::ordered() {
            *object.membership_mut(axis) = codec::decode(props.verts(axis))
                .map_err(|source| PropertiesError { axis, source })?;
        }
        object.shift = ShiftState {
            current_shift: props.shift,
            last_applied_shift: props.last_shift,
        };
        Ok(object)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("corrupt {}: {source}", .axis.field_name())]
pub struct PropertiesError {
    pub axis: Axis,
    #[source]
    pub source: IndexSetError,
}

/// Property bag as persisted on the host object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShifterProperties {
    pub x_verts: String,
    pub y_verts: String,
    pub z_verts: String,
    pub last_shift: ShiftVector,
    pub shift: ShiftVector,
}

impl ShifterProperties {
    pub fn verts(&self, axis: Axis) -> &str {
        match axis {
            Axis::X => &self.x_verts,
            Axis::Y => &self.y_verts,
            Axis::Z => &self.z_verts,
        }
    }
}
