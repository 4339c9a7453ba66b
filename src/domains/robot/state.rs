use crate::common::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::command::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Manual,
    Auto,
}

impl FromStr for Mode {
    type Err = DomainError;

    fn from_str(raw: &str) -> DomainResult<Self> {
        match raw {
            "manual" => Ok(Mode::Manual),
            "auto" => Ok(Mode::Auto),
            other => Err(DomainError::InvalidMode {
                mode: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Activity {
    Ready,
    Moving,
    ExecutingPath,
    Error,
}

/// Turn and step magnitudes applied per command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    pub turn_degrees: i32,
    pub step_units: f64,
}

impl Default for Kinematics {
    fn default() -> Self {
        Self {
            turn_degrees: 15,
            step_units: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl WorkspaceBounds {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Degrees folded into [0, 360).
pub fn normalize_heading(degrees: i64) -> i32 {
    degrees.rem_euclid(360) as i32
}

/// The one robot. Position accumulates trigonometric drift; heading is whole degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotState {
    pub x: f64,
    pub y: f64,
    pub heading: i32,
    pub mode: Mode,
    pub activity: Activity,
}

impl Default for RobotState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            heading: 0,
            mode: Mode::Manual,
            activity: Activity::Ready,
        }
    }
}

impl RobotState {
    /// Pose `(x, y, heading)` after applying `command`, without mutating `self`.
    pub fn advanced(&self, command: Command, kinematics: &Kinematics) -> (f64, f64, i32) {
        let turn = i64::from(kinematics.turn_degrees);
        match command {
            Command::Left => (self.x, self.y, normalize_heading(i64::from(self.heading) - turn)),
            Command::Right => (self.x, self.y, normalize_heading(i64::from(self.heading) + turn)),
            Command::Forward | Command::Back => {
                let sign = if command == Command::Forward { 1.0 } else { -1.0 };
                let rad = f64::from(self.heading).to_radians();
                (
                    self.x + sign * rad.cos() * kinematics.step_units,
                    self.y + sign * rad.sin() * kinematics.step_units,
                    self.heading,
                )
            }
        }
    }
}
