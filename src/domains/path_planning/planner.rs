use crate::common::{DomainError, DomainResult};
use crate::domains::location::{Coordinate, LocationLookup};
use crate::domains::robot::Command;
use serde::{Deserialize, Serialize};

use super::types::{PlanStep, RoutePlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerSettings {
    pub turn_ms: u64,
    pub forward_ms: u64,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            turn_ms: 500,
            forward_ms: 800,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn label(&self) -> &'static str {
        match self {
            Axis::X => "x-axis",
            Axis::Y => "y-axis",
        }
    }
}

/// Axis-aligned planner: one turn plus |dx| forwards, then one turn plus |dy|
/// forwards. Turns are relative (RIGHT for a positive delta, LEFT otherwise) and
/// ignore the robot's live heading, so the same pair always yields the same plan.
#[derive(Debug, Clone, Default)]
pub struct PathPlanner {
    settings: PlannerSettings,
}

impl PathPlanner {
    pub fn new(settings: PlannerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    pub fn plan(&self, from: Coordinate, to: Coordinate) -> RoutePlan {
        let mut steps = Vec::new();
        self.push_axis(&mut steps, i64::from(to.x) - i64::from(from.x), Axis::X);
        self.push_axis(&mut steps, i64::from(to.y) - i64::from(from.y), Axis::Y);
        RoutePlan { steps }
    }

    /// Resolve both names and plan. An unknown name yields `PlanUnresolved`, which
    /// callers treat as "no plan available" rather than a failed request.
    pub fn plan_between(
        &self,
        locations: &dyn LocationLookup,
        from: &str,
        to: &str,
    ) -> DomainResult<RoutePlan> {
        let resolve = |name: &str| {
            locations.resolve(name).ok_or_else(|| DomainError::PlanUnresolved {
                location: name.to_string(),
            })
        };
        let start = resolve(from)?;
        let goal = resolve(to)?;
        Ok(self.plan(start, goal))
    }

    fn push_axis(&self, steps: &mut Vec<PlanStep>, delta: i64, axis: Axis) {
        if delta == 0 {
            return;
        }
        let (turn, direction) = if delta > 0 {
            (Command::Right, "right")
        } else {
            (Command::Left, "left")
        };
        let total = delta.unsigned_abs();

        steps.push(PlanStep {
            command: turn,
            description: format!("Turn {} for {} ({} units)", direction, axis.label(), total),
            duration_ms: self.settings.turn_ms,
        });
        for i in 1..=total {
            steps.push(PlanStep {
                command: Command::Forward,
                description: format!("Forward {}/{} ({})", i, total, axis.label()),
                duration_ms: self.settings.forward_ms,
            });
        }
    }
}
