pub mod commands;
pub mod config;
pub mod panel;
pub mod status;

pub use commands::{
    CMD_SHIFTER_ADD, CMD_SHIFTER_CLEAR, CMD_SHIFTER_SHIFT, CMD_SHIFTER_UPDATE, CommandOutcome,
    ShifterCommand,
};
pub use config::ShifterConfig;
pub use panel::{ObjectPanel, PanelSnapshot};
pub use status::StatusLog;

use crate::host::MeshHost;
use crate::scene::{ObjectId, Scene, SceneError};
use crate::shift::{ApplyReport, ShiftError, engine};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Shift(#[from] ShiftError),
}

/// Command surface over a scene of meshes: routes shifter commands to the
/// active object and reports every outcome.
pub struct ShifterEditor<H: MeshHost> {
    scene: Scene<H>,
    active: Option<ObjectId>,
    config: ShifterConfig,
    status: StatusLog,
}

impl<H: MeshHost> ShifterEditor<H> {
    pub fn new(config: ShifterConfig) -> Self {
        Self::with_scene(Scene::new(), config)
    }

    pub fn with_scene(scene: Scene<H>, config: ShifterConfig) -> Self {
        let status = StatusLog::with_capacity(config.status_history);
        Self {
            scene,
            active: None,
            config,
            status,
        }
    }

    pub fn config(&self) -> &ShifterConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene<H> {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene<H> {
        &mut self.scene
    }

    pub fn status(&self) -> &StatusLog {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut StatusLog {
        &mut self.status
    }

    pub fn spawn(&mut self, name: impl Into<String>, mesh: H) -> Result<ObjectId, EditorError> {
        Ok(self.scene.spawn(name, mesh)?)
    }

    pub fn despawn(&mut self, id: ObjectId) -> Result<H, EditorError> {
        let mesh = self.scene.despawn(id)?;
        if self.active == Some(id) {
            self.active = None;
        }
        Ok(mesh)
    }

    /// The targeted object, if it is still alive.
    pub fn active(&self) -> Option<ObjectId> {
        self.active.filter(|id| self.scene.contains(*id))
    }

    pub fn set_active(&mut self, id: Option<ObjectId>) -> Result<(), EditorError> {
        if let Some(id) = id {
            if !self.scene.contains(id) {
                return Err(SceneError::NoSuchObject(id).into());
            }
        }
        self.active = id;
        Ok(())
    }

    pub fn active_mesh_mut(&mut self) -> Option<&mut H> {
        let id = self.active()?;
        self.scene.mesh_mut(id)
    }

    /// Runs one command against the active object. Without an active object
    /// the command does nothing and reports a zero count.
    pub fn execute(&mut self, command: ShifterCommand) -> Result<CommandOutcome, EditorError> {
        let object = self.active();
        let result = match object {
            Some(id) => self.execute_on(id, command),
            None => {
                log::debug!("[shifter] {} ignored: no active object", command.command_type());
                Ok(self.idle_outcome(command))
            }
        };

        match result {
            Ok(outcome) => {
                self.status.record(outcome.clone());
                Ok(outcome)
            }
            Err(err) => {
                let summary = format!(
                    "{}: {} failed: {err}",
                    self.config.report_prefix,
                    command.command_type()
                );
                let mut outcome = CommandOutcome::new(&command, object, summary).failed();
                if let EditorError::Shift(shift_err) = &err {
                    if let Some(report) = shift_err.applied() {
                        outcome = outcome.with_apply(*report);
                    }
                }
                self.status.record(outcome);
                Err(err)
            }
        }
    }

    /// Applies the stored shift vector to the active object. Only needed when
    /// `apply_on_change` is off.
    pub fn apply_pending(&mut self) -> Result<Option<ApplyReport>, EditorError> {
        let Some(id) = self.active() else {
            return Ok(None);
        };
        let (shifter, mesh) = self.scene.parts_mut(id)?;
        let target = shifter.current_shift();
        let report = engine::apply_shift(shifter, mesh, target)?;
        log::info!(
            "[shifter] applied pending shift {target:?} to {id}, {} vertices moved",
            report.total_moved()
        );
        Ok(Some(report))
    }

    pub fn panel(&self) -> PanelSnapshot {
        match self.active() {
            Some(id) => PanelSnapshot::for_object(&self.scene, id),
            None => PanelSnapshot::NoObject,
        }
    }

    fn execute_on(
        &mut self,
        id: ObjectId,
        command: ShifterCommand,
    ) -> Result<CommandOutcome, EditorError> {
        let prefix = self.config.report_prefix.clone();
        let apply_on_change = self.config.apply_on_change;
        let (shifter, mesh) = self.scene.parts_mut(id)?;

        let outcome = match command {
            ShifterCommand::Add { direction } => {
                let added = engine::add_selected(shifter, &*mesh, direction);
                CommandOutcome::new(&command, Some(id), format!("{prefix}: Added {added} Vertices"))
                    .with_count(added)
            }
            ShifterCommand::Update { direction } => {
                let size = engine::replace_with_selected(shifter, &*mesh, direction);
                CommandOutcome::new(&command, Some(id), format!("{prefix}: Set {size} Vertices"))
                    .with_count(size)
            }
            ShifterCommand::Clear { direction } => {
                let removed = engine::clear(shifter, direction);
                CommandOutcome::new(&command, Some(id), format!("{prefix}: Clear Vertices"))
                    .with_count(removed)
            }
            ShifterCommand::Shift { value } => {
                let [x, y, z] = value;
                let summary = format!("{prefix}: Shift ({x}, {y}, {z})");
                let outcome = CommandOutcome::new(&command, Some(id), summary);
                if apply_on_change {
                    match engine::set_shift(shifter, mesh, value)? {
                        Some(report) => outcome.with_apply(report),
                        None => outcome,
                    }
                } else {
                    shifter.shift_state_mut().current_shift = value;
                    outcome
                }
            }
        };
        Ok(outcome)
    }

    fn idle_outcome(&self, command: ShifterCommand) -> CommandOutcome {
        let prefix = &self.config.report_prefix;
        let summary = match command {
            ShifterCommand::Add { .. } => format!("{prefix}: Added 0 Vertices"),
            ShifterCommand::Update { .. } => format!("{prefix}: Set 0 Vertices"),
            ShifterCommand::Clear { .. } => format!("{prefix}: Clear Vertices"),
            ShifterCommand::Shift { .. } => format!("{prefix}: No Object To Shift"),
        };
        CommandOutcome::new(&command, None, summary)
    }
}

impl<H: MeshHost> Default for ShifterEditor<H> {
    fn default() -> Self {
        Self::new(ShifterConfig::default())
    }
}
