use serde::{Deserialize, Serialize};

use crate::domains::delivery::Order;
use crate::domains::location::LocationTable;
use crate::domains::robot::RobotState;

/// Full observer view: robot, every order in creation order, and the location table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub robot: RobotState,
    pub orders: Vec<Order>,
    pub locations: LocationTable,
}

#[async_trait::async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn snapshot(&self) -> StateSnapshot;
}
