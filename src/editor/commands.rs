use crate::scene::ObjectId;
use crate::shift::{ApplyReport, Axis, ShiftVector};
use serde::{Deserialize, Serialize};

pub const CMD_SHIFTER_ADD: &str = "mesh.shifter_add";
pub const CMD_SHIFTER_UPDATE: &str = "mesh.shifter_update";
pub const CMD_SHIFTER_CLEAR: &str = "mesh.shifter_clear";
pub const CMD_SHIFTER_SHIFT: &str = "object.shifter_shift";

/// User-facing shifter commands. Axis commands carry the axis as
/// `direction`, matching the host's operator property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ShifterCommand {
    /// Union the current selection into the axis.
    Add { direction: Axis },
    /// Replace the axis with the current selection.
    Update { direction: Axis },
    Clear { direction: Axis },
    /// New value of the shift vector.
    Shift { value: ShiftVector },
}

impl ShifterCommand {
    pub fn add(direction: Axis) -> Self {
        Self::Add { direction }
    }

    pub fn update(direction: Axis) -> Self {
        Self::Update { direction }
    }

    pub fn clear(direction: Axis) -> Self {
        Self::Clear { direction }
    }

    pub fn shift(value: ShiftVector) -> Self {
        Self::Shift { value }
    }

    pub fn command_type(&self) -> &'static str {
        match self {
            ShifterCommand::Add { .. } => CMD_SHIFTER_ADD,
            ShifterCommand::Update { .. } => CMD_SHIFTER_UPDATE,
            ShifterCommand::Clear { .. } => CMD_SHIFTER_CLEAR,
            ShifterCommand::Shift { .. } => CMD_SHIFTER_SHIFT,
        }
    }

    pub fn axis(&self) -> Option<Axis> {
        match self {
            ShifterCommand::Add { direction }
            | ShifterCommand::Update { direction }
            | ShifterCommand::Clear { direction } => Some(*direction),
            ShifterCommand::Shift { .. } => None,
        }
    }
}

/// Result of one command, reported to the status surface whether or not the
/// command succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandOutcome {
    pub command_type: &'static str,
    pub object: Option<ObjectId>,
    pub axis: Option<Axis>,
    /// Added, set or cleared member count; vertices moved for shifts.
    pub count: usize,
    pub summary: String,
    pub succeeded: bool,
    pub apply: Option<ApplyReport>,
}

impl CommandOutcome {
    pub fn new(command: &ShifterCommand, object: Option<ObjectId>, summary: String) -> Self {
        Self {
            command_type: command.command_type(),
            object,
            axis: command.axis(),
            count: 0,
            summary,
            succeeded: true,
            apply: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_apply(mut self, report: ApplyReport) -> Self {
        self.count = report.total_moved();
        self.apply = Some(report);
        self
    }

    pub fn failed(mut self) -> Self {
        self.succeeded = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_map_to_host_identifiers() {
        assert_eq!(ShifterCommand::add(Axis::X).command_type(), CMD_SHIFTER_ADD);
        assert_eq!(
            ShifterCommand::update(Axis::Y).command_type(),
            CMD_SHIFTER_UPDATE
        );
        assert_eq!(ShifterCommand::clear(Axis::Z).command_type(), CMD_SHIFTER_CLEAR);
        assert_eq!(
            ShifterCommand::shift([1.0, 2.0, 3.0]).command_type(),
            CMD_SHIFTER_SHIFT
        );
        assert_eq!(ShifterCommand::shift([0.0; 3]).axis(), None);
    }

    #[test]
    fn command_json_uses_direction_names() {
        let command: ShifterCommand =
            serde_json::from_str(r#"{"command":"add","direction":"z"}"#).expect("decode add");
        assert_eq!(command, ShifterCommand::add(Axis::Z));

        let command: ShifterCommand =
            serde_json::from_str(r#"{"command":"clear","direction":"X"}"#).expect("decode clear");
        assert_eq!(command, ShifterCommand::clear(Axis::X));

        let json = serde_json::to_string(&ShifterCommand::shift([0.5, 0.0, 0.0]))
            .expect("encode shift");
        assert_eq!(json, r#"{"command":"shift","value":[0.5,0.0,0.0]}"#);
    }

    #[test]
    fn apply_report_sets_count() {
        let report = ApplyReport {
            delta: [1.0, 0.0, 0.0],
            moved: [4, 0, 0],
            mode_adjusted: true,
        };
        let outcome = CommandOutcome::new(&ShifterCommand::shift([1.0, 0.0, 0.0]), None, "s".into())
            .with_apply(report);
        assert_eq!(outcome.count, 4);
        assert!(outcome.succeeded);
        assert!(!outcome.failed().succeeded);
    }
}
