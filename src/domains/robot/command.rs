use crate::common::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Atomic actuation the robot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Command {
    Left,
    Right,
    Forward,
    Back,
}

impl Command {
    pub const ALL: [Command; 4] = [Command::Left, Command::Right, Command::Forward, Command::Back];

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Left => "LEFT",
            Command::Right => "RIGHT",
            Command::Forward => "FORWARD",
            Command::Back => "BACK",
        }
    }

    pub fn is_turn(&self) -> bool {
        matches!(self, Command::Left | Command::Right)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = DomainError;

    fn from_str(raw: &str) -> DomainResult<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "LEFT" => Ok(Command::Left),
            "RIGHT" => Ok(Command::Right),
            "FORWARD" => Ok(Command::Forward),
            "BACK" => Ok(Command::Back),
            _ => Err(DomainError::InvalidCommand {
                reason: format!("'{}' is not one of LEFT|RIGHT|FORWARD|BACK", raw),
            }),
        }
    }
}
