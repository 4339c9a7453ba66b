use crate::common::{EventEnvelope, SnapshotSource, StateEventKind, StatePublisher, StateSnapshot};
use crate::domains::delivery::OrderStore;
use crate::domains::location::LocationTable;
use crate::domains::robot::SharedRobot;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

/// Snapshot source over the live robot and order store.
pub struct CampusView {
    robot: SharedRobot,
    orders: Arc<OrderStore>,
    locations: LocationTable,
}

impl CampusView {
    pub fn new(robot: SharedRobot, orders: Arc<OrderStore>, locations: LocationTable) -> Self {
        Self {
            robot,
            orders,
            locations,
        }
    }
}

#[async_trait::async_trait]
impl SnapshotSource for CampusView {
    async fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            robot: self.robot.current().await,
            orders: self.orders.list().await,
            locations: self.locations.clone(),
        }
    }
}

/// What a new observer gets: the current state, then every later update.
pub struct Subscription {
    pub init: EventEnvelope,
    pub updates: broadcast::Receiver<EventEnvelope>,
}

/// Fans full snapshots out to observers.
///
/// Revision bump, snapshot and send happen under one lock, so no observer can
/// receive an older snapshot after a newer one. Slow observers lag and skip;
/// nothing is replayed.
pub struct StateBroadcaster {
    sender: broadcast::Sender<EventEnvelope>,
    source: Arc<dyn SnapshotSource>,
    revision: Mutex<u64>,
}

impl StateBroadcaster {
    pub fn new(source: Arc<dyn SnapshotSource>, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            source,
            revision: Mutex::new(0),
        }
    }

    pub async fn snapshot(&self) -> StateSnapshot {
        self.source.snapshot().await
    }

    pub async fn subscribe(&self) -> Subscription {
        let revision = self.revision.lock().await;
        let updates = self.sender.subscribe();
        let data = self.source.snapshot().await;
        Subscription {
            init: EventEnvelope::new(StateEventKind::Init, *revision, data),
            updates,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait::async_trait]
impl StatePublisher for StateBroadcaster {
    async fn publish(&self) {
        let mut revision = self.revision.lock().await;
        *revision += 1;
        let data = self.source.snapshot().await;
        // Err only means nobody is listening right now.
        if self
            .sender
            .send(EventEnvelope::new(StateEventKind::Update, *revision, data))
            .is_err()
        {
            tracing::trace!(revision = *revision, "state update with no subscribers");
        }
    }
}
