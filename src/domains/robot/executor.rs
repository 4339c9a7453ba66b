use crate::common::{DomainError, DomainResult, StatePublisher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

use super::command::Command;
use super::state::{Activity, Kinematics, Mode, RobotState, WorkspaceBounds};

/// Read handle on the process-wide robot state. Only [`CommandExecutor`] writes.
#[derive(Debug, Clone, Default)]
pub struct SharedRobot(Arc<RwLock<RobotState>>);

impl SharedRobot {
    pub fn new(state: RobotState) -> Self {
        Self(Arc::new(RwLock::new(state)))
    }

    pub async fn current(&self) -> RobotState {
        self.0.read().await.clone()
    }
}

#[derive(Debug, Clone)]
pub struct ExecutorSettings {
    pub kinematics: Kinematics,
    /// Minimum time a command holds the robot after updating the pose.
    pub settle: Duration,
    pub bounds: Option<WorkspaceBounds>,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            kinematics: Kinematics::default(),
            settle: Duration::from_millis(120),
            bounds: None,
        }
    }
}

/// Proof that the caller owns the robot for a delivery run. Released on drop.
#[derive(Debug)]
pub struct PathClaim {
    flag: Arc<AtomicBool>,
}

impl Drop for PathClaim {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Sole mutator of [`RobotState`].
///
/// Every mutation runs under `drive`, a fair async mutex, so concurrent callers are
/// applied one whole command (settle window included) at a time in arrival order.
/// While a [`PathClaim`] is outstanding, manual commands, mode switches and resets
/// are refused instead of queued.
pub struct CommandExecutor {
    robot: SharedRobot,
    settings: ExecutorSettings,
    drive: Mutex<()>,
    path_active: Arc<AtomicBool>,
    publisher: Arc<dyn StatePublisher>,
}

impl CommandExecutor {
    pub fn new(robot: SharedRobot, settings: ExecutorSettings, publisher: Arc<dyn StatePublisher>) -> Self {
        Self {
            robot,
            settings,
            drive: Mutex::new(()),
            path_active: Arc::new(AtomicBool::new(false)),
            publisher,
        }
    }

    pub fn robot(&self) -> &SharedRobot {
        &self.robot
    }

    pub fn settings(&self) -> &ExecutorSettings {
        &self.settings
    }

    pub async fn current(&self) -> RobotState {
        self.robot.current().await
    }

    pub fn is_path_active(&self) -> bool {
        self.path_active.load(Ordering::Acquire)
    }

    /// Manual entry point: parse a raw command word and apply it.
    pub async fn execute(&self, raw: &str) -> DomainResult<RobotState> {
        let command: Command = raw.parse()?;
        self.execute_command(command).await
    }

    pub async fn execute_command(&self, command: Command) -> DomainResult<RobotState> {
        self.ensure_no_path("manual command")?;
        let _drive = self.drive.lock().await;
        // A run may have claimed the robot while we were queued.
        self.ensure_no_path("manual command")?;
        self.apply(command, Activity::Ready).await
    }

    pub async fn set_mode(&self, mode: Mode) -> DomainResult<RobotState> {
        self.ensure_no_path("mode change")?;
        let _drive = self.drive.lock().await;
        self.ensure_no_path("mode change")?;
        let updated = {
            let mut state = self.robot.0.write().await;
            state.mode = mode;
            state.clone()
        };
        self.publisher.publish().await;
        Ok(updated)
    }

    /// Force the pose; activity returns to ready, mode is left alone.
    pub async fn reset(&self, x: f64, y: f64, heading: i64) -> DomainResult<RobotState> {
        self.ensure_no_path("reset")?;
        if let Some(bounds) = &self.settings.bounds {
            if !bounds.contains(x, y) {
                return Err(DomainError::InvalidCommand {
                    reason: format!("reset pose ({:.2}, {:.2}) is outside the workspace bounds", x, y),
                });
            }
        }
        let _drive = self.drive.lock().await;
        self.ensure_no_path("reset")?;
        let updated = {
            let mut state = self.robot.0.write().await;
            state.x = x;
            state.y = y;
            state.heading = super::state::normalize_heading(heading);
            state.activity = Activity::Ready;
            state.clone()
        };
        self.publisher.publish().await;
        Ok(updated)
    }

    pub fn claim_path(&self) -> DomainResult<PathClaim> {
        self.path_active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| DomainError::RobotBusy {
                reason: "a delivery path is already executing".to_string(),
            })?;
        Ok(PathClaim {
            flag: self.path_active.clone(),
        })
    }

    /// Waits for any in-flight manual command to settle, then hands the robot to the run.
    pub async fn begin_path(&self, _claim: &PathClaim) -> RobotState {
        let _drive = self.drive.lock().await;
        let updated = {
            let mut state = self.robot.0.write().await;
            state.mode = Mode::Auto;
            state.activity = Activity::ExecutingPath;
            state.clone()
        };
        self.publisher.publish().await;
        updated
    }

    pub async fn step(&self, _claim: &PathClaim, command: Command) -> DomainResult<RobotState> {
        let _drive = self.drive.lock().await;
        self.apply(command, Activity::ExecutingPath).await
    }

    pub async fn finish_path(&self, _claim: &PathClaim, succeeded: bool) -> RobotState {
        let _drive = self.drive.lock().await;
        let updated = {
            let mut state = self.robot.0.write().await;
            state.activity = if succeeded { Activity::Ready } else { Activity::Error };
            state.mode = Mode::Manual;
            state.clone()
        };
        self.publisher.publish().await;
        updated
    }

    fn ensure_no_path(&self, what: &str) -> DomainResult<()> {
        if self.is_path_active() {
            return Err(DomainError::RobotBusy {
                reason: format!("{} refused while a delivery path is executing", what),
            });
        }
        Ok(())
    }

    /// Caller must hold `drive`.
    async fn apply(&self, command: Command, resting: Activity) -> DomainResult<RobotState> {
        let (x, y, heading) = self
            .robot
            .0
            .read()
            .await
            .advanced(command, &self.settings.kinematics);

        if let Some(bounds) = &self.settings.bounds {
            if !bounds.contains(x, y) {
                return Err(DomainError::InvalidCommand {
                    reason: format!(
                        "{} would move the robot to ({:.2}, {:.2}), outside the workspace bounds",
                        command, x, y
                    ),
                });
            }
        }

        self.robot.0.write().await.activity = Activity::Moving;
        self.publisher.publish().await;

        {
            let mut state = self.robot.0.write().await;
            state.x = x;
            state.y = y;
            state.heading = heading;
        }

        tokio::time::sleep(self.settings.settle).await;

        let settled = {
            let mut state = self.robot.0.write().await;
            state.activity = resting;
            state.clone()
        };
        self.publisher.publish().await;

        tracing::debug!(%command, x = settled.x, y = settled.y, heading = settled.heading, "command settled");
        Ok(settled)
    }
}
