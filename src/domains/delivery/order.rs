use crate::common::{DomainError, DomainResult};
use crate::domains::path_planning::RoutePlan;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type OrderId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Queued => "queued",
            OrderStatus::InProgress => "in-progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Failed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(raw: &str) -> DomainResult<Self> {
        match raw {
            "queued" => Ok(OrderStatus::Queued),
            "in-progress" => Ok(OrderStatus::InProgress),
            "completed" => Ok(OrderStatus::Completed),
            "failed" => Ok(OrderStatus::Failed),
            other => Err(DomainError::InvalidStatus {
                status: other.to_string(),
            }),
        }
    }
}

/// A delivery between two named locations. The plan is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub from: String,
    pub to: String,
    pub status: OrderStatus,
    pub plan: RoutePlan,
    pub distance: u32,
    #[serde(rename = "estimatedTime")]
    pub estimated_time_ms: u64,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(id: OrderId, from: String, to: String, plan: RoutePlan) -> Self {
        Self {
            id,
            distance: plan.distance(),
            estimated_time_ms: plan.estimated_time_ms(),
            from,
            to,
            status: OrderStatus::Queued,
            plan,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn invalid_state(&self, reason: &str) -> DomainError {
        DomainError::InvalidOrderState {
            id: self.id,
            status: self.status.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Wire ids are strings; anything that is not a known number is simply not found.
pub fn parse_order_id(raw: &str) -> DomainResult<OrderId> {
    raw.trim().parse().map_err(|_| DomainError::OrderNotFound {
        id: raw.to_string(),
    })
}
