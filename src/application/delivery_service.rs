// Delivery Service - the one owner of robot and order state
use crate::common::{ApplicationResult, DomainError, StatePublisher, StateSnapshot};
use crate::config::Config;
use crate::domains::delivery::{parse_order_id, Order, OrderStatus, OrderStore, PathRunner, RunHandle};
use crate::domains::location::{LocationLookup, LocationTable};
use crate::domains::logger::DynLogger;
use crate::domains::path_planning::{PathPlanner, PlannerSettings};
use crate::domains::robot::{CommandExecutor, ExecutorSettings, Kinematics, Mode, RobotState, SharedRobot};
use std::sync::Arc;
use std::time::Duration;

use super::broadcaster::{CampusView, StateBroadcaster, Subscription};

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub executor: ExecutorSettings,
    pub planner: PlannerSettings,
    pub push_buffer: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            executor: ExecutorSettings::default(),
            planner: PlannerSettings::default(),
            push_buffer: 256,
        }
    }
}

impl From<&Config> for ServiceSettings {
    fn from(config: &Config) -> Self {
        Self {
            executor: ExecutorSettings {
                kinematics: Kinematics {
                    turn_degrees: config.robot.turn_degrees,
                    step_units: config.robot.step_units,
                },
                settle: Duration::from_millis(config.robot.settle_ms),
                bounds: config.robot.bounds,
            },
            planner: PlannerSettings {
                turn_ms: config.planner.turn_ms,
                forward_ms: config.planner.forward_ms,
            },
            push_buffer: config.server.push_buffer,
        }
    }
}

/// Request surface shared by the HTTP and push-channel adapters.
pub struct DeliveryService {
    locations: Arc<dyn LocationLookup>,
    orders: Arc<OrderStore>,
    executor: Arc<CommandExecutor>,
    runner: PathRunner,
    broadcaster: Arc<StateBroadcaster>,
}

impl DeliveryService {
    pub fn new(settings: ServiceSettings, locations: Arc<dyn LocationLookup>, logger: DynLogger) -> Self {
        let robot = SharedRobot::new(RobotState::default());
        let orders = Arc::new(OrderStore::new(
            PathPlanner::new(settings.planner),
            locations.clone(),
            logger.clone(),
        ));
        let view = CampusView::new(robot.clone(), orders.clone(), locations.table());
        let broadcaster = Arc::new(StateBroadcaster::new(Arc::new(view), settings.push_buffer));
        let executor = Arc::new(CommandExecutor::new(
            robot,
            settings.executor,
            broadcaster.clone(),
        ));
        let runner = PathRunner::new(executor.clone(), orders.clone(), logger);

        Self {
            locations,
            orders,
            executor,
            runner,
            broadcaster,
        }
    }

    pub fn locations(&self) -> LocationTable {
        self.locations.table()
    }

    pub async fn list_orders(&self) -> Vec<Order> {
        self.orders.list().await
    }

    pub async fn order(&self, id: &str) -> ApplicationResult<Order> {
        Ok(self.orders.get(parse_order_id(id)?).await?)
    }

    pub async fn create_order(&self, from: Option<&str>, to: Option<&str>) -> ApplicationResult<Order> {
        let order = self.orders.create(from, to).await?;
        self.broadcaster.publish().await;
        Ok(order)
    }

    /// A missing status leaves the order untouched.
    pub async fn set_order_status(&self, id: &str, status: Option<&str>) -> ApplicationResult<Order> {
        let id = parse_order_id(id)?;
        let order = match status {
            Some(raw) => {
                let status: OrderStatus = raw.parse()?;
                self.orders.set_status(id, status).await?
            }
            None => self.orders.get(id).await?,
        };
        self.broadcaster.publish().await;
        Ok(order)
    }

    /// Fire-and-forget: returns once the order is in progress.
    pub async fn execute_order(&self, id: &str) -> ApplicationResult<RunHandle> {
        let id = parse_order_id(id)?;
        Ok(self.runner.start(id).await?)
    }

    pub async fn manual_command(&self, cmd: Option<&str>) -> ApplicationResult<RobotState> {
        let cmd = cmd.ok_or_else(|| DomainError::InvalidCommand {
            reason: "cmd is required".to_string(),
        })?;
        Ok(self.executor.execute(cmd).await?)
    }

    pub async fn set_mode(&self, mode: Option<&str>) -> ApplicationResult<RobotState> {
        let mode: Mode = mode.unwrap_or_default().parse()?;
        Ok(self.executor.set_mode(mode).await?)
    }

    pub async fn robot(&self) -> RobotState {
        self.executor.current().await
    }

    /// Omitted fields reset to the origin / heading 0.
    pub async fn reset_robot(
        &self,
        x: Option<f64>,
        y: Option<f64>,
        heading: Option<i64>,
    ) -> ApplicationResult<RobotState> {
        Ok(self
            .executor
            .reset(x.unwrap_or(0.0), y.unwrap_or(0.0), heading.unwrap_or(0))
            .await?)
    }

    pub async fn snapshot(&self) -> StateSnapshot {
        self.broadcaster.snapshot().await
    }

    pub async fn subscribe(&self) -> Subscription {
        self.broadcaster.subscribe().await
    }

    pub fn broadcaster(&self) -> &Arc<StateBroadcaster> {
        &self.broadcaster
    }
}
