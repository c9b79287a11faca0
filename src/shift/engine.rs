use super::axis::Axis;
use super::codec::VertexIndex;
use super::state::{ShiftVector, ShiftableObject};
use crate::host::{EditModeGuard, HostError, MeshHost};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ShiftError {
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("{axis} membership references vertex {index} but the mesh has {vertex_count} vertices")]
    StaleIndex {
        axis: Axis,
        index: VertexIndex,
        vertex_count: usize,
    },
    #[error("shift {shift:?} has a non-finite component")]
    NonFinite { shift: ShiftVector },
    /// The geometry was written and `last_applied_shift` updated, but the
    /// host could not be put back into its prior mode.
    #[error("shift applied but prior mode was not restored: {source}")]
    Release {
        report: ApplyReport,
        #[source]
        source: HostError,
    },
}

impl ShiftError {
    /// The apply that completed before the error, if any geometry moved.
    pub fn applied(&self) -> Option<&ApplyReport> {
        match self {
            ShiftError::Release { report, .. } => Some(report),
            _ => None,
        }
    }
}

fn ensure_finite(shift: ShiftVector) -> Result<(), ShiftError> {
    if shift.iter().all(|component| component.is_finite()) {
        Ok(())
    } else {
        Err(ShiftError::NonFinite { shift })
    }
}

/// What a single apply did to the geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub delta: ShiftVector,
    pub moved: [usize; 3],
    /// Whether the host had to be switched into edit mode for the write.
    pub mode_adjusted: bool,
}

impl ApplyReport {
    pub fn total_moved(&self) -> usize {
        self.moved.iter().sum()
    }
}

/// Unions the host selection into `axis`'s membership and returns how many
/// indices were new. Without a selection context nothing changes.
pub fn add_selected<H>(object: &mut ShiftableObject, host: &H, axis: Axis) -> usize
where
    H: MeshHost + ?Sized,
{
    let Some(selected) = host.selected_vertices() else {
        log::debug!("[shifter] add {axis}: {} has no selection context", host.label());
        return 0;
    };
    let members = object.membership_mut(axis);
    let before = members.len();
    members.extend(selected);
    members.len() - before
}

/// Overwrites `axis`'s membership with the host selection and returns the new
/// size. Without a selection context the membership is left as is.
pub fn replace_with_selected<H>(object: &mut ShiftableObject, host: &H, axis: Axis) -> usize
where
    H: MeshHost + ?Sized,
{
    let Some(selected) = host.selected_vertices() else {
        log::debug!("[shifter] update {axis}: {} has no selection context", host.label());
        return 0;
    };
    let size = selected.len();
    *object.membership_mut(axis) = selected;
    size
}

/// Empties `axis`'s membership, returning how many members were dropped.
pub fn clear(object: &mut ShiftableObject, axis: Axis) -> usize {
    let members = object.membership_mut(axis);
    let removed = members.len();
    members.clear();
    removed
}

/// Moves every member vertex by the change in shift since the last apply.
///
/// Indices are checked against the host's vertex count before anything is
/// written; `last_applied_shift` is only updated once all axes are done. If
/// the prior host mode cannot be restored afterwards the error is
/// [`ShiftError::Release`], and the object state already reflects the write.
pub fn apply_shift<H>(
    object: &mut ShiftableObject,
    host: &mut H,
    new_shift: ShiftVector,
) -> Result<ApplyReport, ShiftError>
where
    H: MeshHost + ?Sized,
{
    ensure_finite(new_shift)?;
    let last = object.last_applied_shift();
    let mut report = ApplyReport::default();
    for axis in Axis::ordered() {
        let i = axis.index();
        report.delta[i] = new_shift[i] - last[i];
    }

    let touches_geometry = Axis::ordered()
        .into_iter()
        .any(|axis| report.delta[axis.index()] != 0.0 && object.member_count(axis) > 0);
    if !touches_geometry {
        object.shift_state_mut().last_applied_shift = new_shift;
        return Ok(report);
    }

    let mut guard = EditModeGuard::acquire(host)?;
    report.mode_adjusted = guard.adjusted();

    let vertex_count = guard.host().vertex_count();
    for axis in Axis::ordered() {
        if report.delta[axis.index()] == 0.0 {
            continue;
        }
        if let Some(&index) = object
            .membership(axis)
            .iter()
            .find(|index| **index as usize >= vertex_count)
        {
            return Err(ShiftError::StaleIndex {
                axis,
                index,
                vertex_count,
            });
        }
    }

    for axis in Axis::ordered() {
        let i = axis.index();
        let delta = report.delta[i];
        if delta == 0.0 {
            continue;
        }
        for &index in object.membership(axis) {
            let mut position = guard.host().position(index)?;
            position[i] += delta;
            guard.host_mut().set_position(index, position)?;
        }
        report.moved[i] = object.member_count(axis);
    }
    guard.host_mut().commit();

    object.shift_state_mut().last_applied_shift = new_shift;
    guard
        .release()
        .map_err(|source| ShiftError::Release { report, source })?;
    Ok(report)
}

/// User-input path for the shift vector. Stores the value and applies it
/// when it differs from the current one. An apply that fails before moving
/// anything leaves the stored value unchanged; once geometry has moved the
/// stored value stays in step with `last_applied_shift`.
pub fn set_shift<H>(
    object: &mut ShiftableObject,
    host: &mut H,
    new_shift: ShiftVector,
) -> Result<Option<ApplyReport>, ShiftError>
where
    H: MeshHost + ?Sized,
{
    ensure_finite(new_shift)?;
    let previous = object.current_shift();
    if previous == new_shift {
        return Ok(None);
    }
    object.shift_state_mut().current_shift = new_shift;
    match apply_shift(object, host, new_shift) {
        Ok(report) => Ok(Some(report)),
        Err(err) => {
            if err.applied().is_none() {
                object.shift_state_mut().current_shift = previous;
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostMode, InMemoryMesh};

    fn editing(mesh: &mut InMemoryMesh) {
        mesh.set_mode(HostMode::Edit).expect("enter edit mode");
    }

    fn object_with(axis: Axis, members: &[VertexIndex]) -> ShiftableObject {
        let mut object = ShiftableObject::new();
        object.membership_mut(axis).extend(members.iter().copied());
        object
    }

    #[test]
    fn add_unions_selection_and_counts_new_members() {
        let mut mesh = InMemoryMesh::new(vec![[0.0; 3]; 5]);
        editing(&mut mesh);
        mesh.select([1, 3, 4]);
        let mut object = object_with(Axis::Y, &[3]);

        let added = add_selected(&mut object, &mesh, Axis::Y);

        assert_eq!(added, 2);
        let members: Vec<_> = object.membership(Axis::Y).iter().copied().collect();
        assert_eq!(members, vec![1, 3, 4]);
    }

    #[test]
    fn add_never_drops_members() {
        let mut mesh = InMemoryMesh::new(vec![[0.0; 3]; 5]);
        editing(&mut mesh);
        mesh.select([0]);
        let mut object = object_with(Axis::X, &[2, 4]);

        assert_eq!(add_selected(&mut object, &mesh, Axis::X), 1);
        assert_eq!(object.member_count(Axis::X), 3);
    }

    #[test]
    fn add_without_selection_context_is_noop() {
        let mut mesh = InMemoryMesh::new(vec![[0.0; 3]; 2]);
        mesh.select([0, 1]);
        let mut object = ShiftableObject::new();

        assert_eq!(add_selected(&mut object, &mesh, Axis::X), 0);
        assert_eq!(replace_with_selected(&mut object, &mesh, Axis::X), 0);
        assert_eq!(object.member_count(Axis::X), 0);
    }

    #[test]
    fn replace_overwrites_membership() {
        let mut mesh = InMemoryMesh::new(vec![[0.0; 3]; 6]);
        editing(&mut mesh);
        mesh.select([5]);
        let mut object = object_with(Axis::Z, &[0, 1, 2]);

        assert_eq!(replace_with_selected(&mut object, &mesh, Axis::Z), 1);
        let members: Vec<_> = object.membership(Axis::Z).iter().copied().collect();
        assert_eq!(members, vec![5]);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut object = object_with(Axis::X, &[0, 2]);
        assert_eq!(clear(&mut object, Axis::X), 2);
        assert_eq!(clear(&mut object, Axis::X), 0);
        assert_eq!(object.to_properties().x_verts, "");
    }

    #[test]
    fn apply_moves_members_by_delta() {
        let mut mesh = InMemoryMesh::new(vec![[1.0, 0.0, 0.0], [9.0, 9.0, 9.0], [3.0, 0.0, 0.0]]);
        let mut object = object_with(Axis::X, &[0, 2]);

        let report = apply_shift(&mut object, &mut mesh, [5.0, 0.0, 0.0]).expect("apply");

        assert_eq!(mesh.positions()[0], [6.0, 0.0, 0.0]);
        assert_eq!(mesh.positions()[1], [9.0, 9.0, 9.0]);
        assert_eq!(mesh.positions()[2], [8.0, 0.0, 0.0]);
        assert_eq!(object.last_applied_shift(), [5.0, 0.0, 0.0]);
        assert_eq!(report.moved, [2, 0, 0]);
        assert!(report.mode_adjusted);
        assert_eq!(mesh.mode(), HostMode::Object);

        let again = apply_shift(&mut object, &mut mesh, [5.0, 0.0, 0.0]).expect("reapply");
        assert_eq!(again.total_moved(), 0);
        assert_eq!(mesh.positions()[0], [6.0, 0.0, 0.0]);
        assert_eq!(mesh.positions()[2], [8.0, 0.0, 0.0]);
    }

    #[test]
    fn empty_axis_still_tracks_last_shift() {
        let mut mesh = InMemoryMesh::new(vec![[0.0; 3]]);
        let mut object = ShiftableObject::new();

        let report = apply_shift(&mut object, &mut mesh, [0.0, 2.0, -1.0]).expect("apply");

        assert_eq!(report.total_moved(), 0);
        assert_eq!(object.last_applied_shift(), [0.0, 2.0, -1.0]);
        assert_eq!(mesh.mode_transitions(), 0);
    }

    #[test]
    fn vertex_on_two_axes_moves_on_both() {
        let mut mesh = InMemoryMesh::new(vec![[0.0, 0.0, 0.0]]);
        let mut object = object_with(Axis::X, &[0]);
        object.membership_mut(Axis::Z).insert(0);

        apply_shift(&mut object, &mut mesh, [1.0, 4.0, 2.0]).expect("apply");

        assert_eq!(mesh.positions()[0], [1.0, 0.0, 2.0]);
    }

    #[test]
    fn stale_index_aborts_before_writing() {
        let mut mesh = InMemoryMesh::new(vec![[0.0; 3], [0.0; 3]]);
        let mut object = object_with(Axis::X, &[0]);
        object.membership_mut(Axis::Y).extend([1, 7]);

        let err = apply_shift(&mut object, &mut mesh, [1.0, 1.0, 0.0]).expect_err("index 7");

        assert_eq!(
            err,
            ShiftError::StaleIndex {
                axis: Axis::Y,
                index: 7,
                vertex_count: 2,
            }
        );
        assert_eq!(mesh.positions(), &[[0.0; 3], [0.0; 3]]);
        assert_eq!(object.last_applied_shift(), [0.0; 3]);
        assert_eq!(mesh.mode(), HostMode::Object);
    }

    #[test]
    fn locked_mode_propagates_and_keeps_state() {
        let mut mesh = InMemoryMesh::new(vec![[0.0; 3]]);
        mesh.lock_mode("render in progress");
        let mut object = object_with(Axis::X, &[0]);

        let err = set_shift(&mut object, &mut mesh, [3.0, 0.0, 0.0]).expect_err("locked");

        assert!(matches!(err, ShiftError::Host(HostError::ModeTransition { .. })));
        assert_eq!(object.current_shift(), [0.0; 3]);
        assert_eq!(object.last_applied_shift(), [0.0; 3]);
        assert_eq!(mesh.mode(), HostMode::Object);
    }

    #[test]
    fn set_shift_skips_unchanged_value() {
        let mut mesh = InMemoryMesh::new(vec![[0.0; 3]]);
        let mut object = object_with(Axis::Z, &[0]);

        let first = set_shift(&mut object, &mut mesh, [0.0, 0.0, 1.5]).expect("apply");
        assert!(first.is_some());
        let second = set_shift(&mut object, &mut mesh, [0.0, 0.0, 1.5]).expect("unchanged");
        assert!(second.is_none());
        assert_eq!(mesh.positions()[0], [0.0, 0.0, 1.5]);
        assert_eq!(object.current_shift(), object.last_applied_shift());
    }

    #[test]
    fn already_editing_host_stays_in_edit_mode() {
        let mut mesh = InMemoryMesh::new(vec![[0.0; 3]]);
        editing(&mut mesh);
        let mut object = object_with(Axis::Y, &[0]);

        let report = apply_shift(&mut object, &mut mesh, [0.0, -2.0, 0.0]).expect("apply");

        assert!(!report.mode_adjusted);
        assert_eq!(mesh.mode(), HostMode::Edit);
        assert_eq!(mesh.positions()[0], [0.0, -2.0, 0.0]);
        assert_eq!(mesh.commits(), 1);
    }

    #[test]
    fn failed_restore_keeps_shift_in_step_with_geometry() {
        let mut mesh = InMemoryMesh::new(vec![[0.0; 3], [1.0, 1.0, 1.0]]);
        mesh.lock_edit_exit("modal operator running");
        let mut object = object_with(Axis::X, &[1]);

        let err = set_shift(&mut object, &mut mesh, [2.0, 0.0, 0.0]).expect_err("exit locked");

        match &err {
            ShiftError::Release { report, source } => {
                assert_eq!(report.moved, [1, 0, 0]);
                assert!(matches!(source, HostError::ModeTransition { .. }));
            }
            other => panic!("expected release failure, got {other:?}"),
        }
        assert_eq!(mesh.positions()[1], [3.0, 1.0, 1.0]);
        assert_eq!(mesh.mode(), HostMode::Edit);
        assert_eq!(object.last_applied_shift(), [2.0, 0.0, 0.0]);
        assert_eq!(object.current_shift(), [2.0, 0.0, 0.0]);

        // Re-entering the same value is a no-op rather than a second move.
        mesh.unlock_mode();
        let retry = set_shift(&mut object, &mut mesh, [2.0, 0.0, 0.0]).expect("unchanged");
        assert!(retry.is_none());
        assert_eq!(mesh.positions()[1], [3.0, 1.0, 1.0]);
    }

    #[test]
    fn non_finite_shift_is_rejected_untouched() {
        let mut mesh = InMemoryMesh::new(vec![[0.0; 3]]);
        let mut object = object_with(Axis::Y, &[0]);

        for bad in [[0.0, f32::NAN, 0.0], [f32::INFINITY, 0.0, 0.0]] {
            let err = set_shift(&mut object, &mut mesh, bad).expect_err("non-finite");
            assert!(matches!(err, ShiftError::NonFinite { .. }));
            assert!(matches!(
                apply_shift(&mut object, &mut mesh, bad),
                Err(ShiftError::NonFinite { .. })
            ));
        }

        assert_eq!(object.current_shift(), [0.0; 3]);
        assert_eq!(object.last_applied_shift(), [0.0; 3]);
        assert_eq!(mesh.positions()[0], [0.0; 3]);
        assert_eq!(mesh.mode_transitions(), 0);

        set_shift(&mut object, &mut mesh, [0.0, 1.0, 0.0]).expect("finite value still applies");
        assert_eq!(mesh.positions()[0], [0.0, 1.0, 0.0]);
    }
}
