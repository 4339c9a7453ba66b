use serde::{Deserialize, Serialize};

use crate::domains::robot::Command;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStep {
    pub command: Command,
    pub description: String,
    /// Travel time the runner waits after the command settles.
    pub duration_ms: u64,
}

/// Ordered command sequence for one delivery. Serialized as a bare list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutePlan {
    pub steps: Vec<PlanStep>,
}

impl RoutePlan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Grid units travelled: the number of FORWARD steps.
    pub fn distance(&self) -> u32 {
        self.steps
            .iter()
            .filter(|s| s.command == Command::Forward)
            .count() as u32
    }

    pub fn estimated_time_ms(&self) -> u64 {
        self.steps.iter().map(|s| s.duration_ms).sum()
    }

    pub fn turns(&self) -> usize {
        self.steps.iter().filter(|s| s.command.is_turn()).count()
    }
}
