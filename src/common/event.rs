use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::snapshot::StateSnapshot;

/// Kind of frame pushed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateEventKind {
    #[serde(rename = "state:init")]
    Init,
    #[serde(rename = "state:update")]
    Update,
}

impl StateEventKind {
    pub fn event_type(&self) -> &'static str {
        match self {
            StateEventKind::Init => "state:init",
            StateEventKind::Update => "state:update",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    pub event: StateEventKind,
    pub event_id: Uuid,
    /// Publish counter. Strictly increasing across updates; an init frame carries
    /// the revision of the last update the subscriber has already seen.
    pub revision: u64,
    pub occurred_at: DateTime<Utc>,
    pub data: StateSnapshot,
}

impl EventEnvelope {
    pub fn new(event: StateEventKind, revision: u64, data: StateSnapshot) -> Self {
        Self {
            event,
            event_id: Uuid::new_v4(),
            revision,
            occurred_at: Utc::now(),
            data,
        }
    }
}

/// Port through which mutators announce that shared state changed.
///
/// Implementations take a fresh snapshot at call time, so callers must invoke it
/// after their mutation is visible.
#[async_trait::async_trait]
pub trait StatePublisher: Send + Sync {
    async fn publish(&self);
}
