use crate::common::DomainResult;
use crate::domains::logger::DynLogger;
use crate::domains::path_planning::RoutePlan;
use crate::domains::robot::{CommandExecutor, PathClaim};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::order::{Order, OrderId, OrderStatus};
use super::store::OrderStore;

/// A started run: the order as it entered `in-progress`, plus the background
/// task that resolves to its terminal status.
#[derive(Debug)]
pub struct RunHandle {
    pub order: Order,
    pub task: JoinHandle<OrderStatus>,
}

/// Drives one order's plan through the executor in the background.
pub struct PathRunner {
    executor: Arc<CommandExecutor>,
    orders: Arc<OrderStore>,
    logger: DynLogger,
}

impl PathRunner {
    pub fn new(executor: Arc<CommandExecutor>, orders: Arc<OrderStore>, logger: DynLogger) -> Self {
        Self {
            executor,
            orders,
            logger,
        }
    }

    /// Validate, claim the robot and spawn the run. Returns as soon as the order
    /// is `in-progress`; the caller never waits for the path itself.
    pub async fn start(&self, id: OrderId) -> DomainResult<RunHandle> {
        let order = self.orders.get(id).await?;
        if order.status != OrderStatus::Queued {
            return Err(order.invalid_state("only queued orders can be executed"));
        }

        let claim = self.executor.claim_path()?;
        // On error the claim drops here and the robot is free again.
        let order = self.orders.begin_execution(id).await?;

        let run = Run {
            claim,
            id,
            plan: order.plan.clone(),
            executor: self.executor.clone(),
            orders: self.orders.clone(),
            logger: self.logger.clone(),
        };
        let task = tokio::spawn(run.drive());

        Ok(RunHandle { order, task })
    }
}

struct Run {
    claim: PathClaim,
    id: OrderId,
    plan: RoutePlan,
    executor: Arc<CommandExecutor>,
    orders: Arc<OrderStore>,
    logger: DynLogger,
}

impl Run {
    async fn drive(self) -> OrderStatus {
        self.logger.info(&format!(
            "Order {}: executing {} steps",
            self.id,
            self.plan.len()
        ));
        self.executor.begin_path(&self.claim).await;

        let total = self.plan.len();
        let mut succeeded = true;
        for (index, step) in self.plan.steps.iter().enumerate() {
            if let Err(e) = self.executor.step(&self.claim, step.command).await {
                // Pose changes already applied stay applied.
                self.logger.error(&format!(
                    "Order {}: step {}/{} ({}) failed: {}",
                    self.id,
                    index + 1,
                    total,
                    step.description,
                    e
                ));
                succeeded = false;
                break;
            }
            tokio::time::sleep(Duration::from_millis(step.duration_ms)).await;
        }

        let outcome = if succeeded {
            OrderStatus::Completed
        } else {
            OrderStatus::Failed
        };
        if let Err(e) = self.orders.finish_execution(self.id, outcome).await {
            self.logger
                .error(&format!("Order {}: could not record outcome: {}", self.id, e));
        }
        let robot = self.executor.finish_path(&self.claim, succeeded).await;

        self.logger.info(&format!(
            "Order {} {} at ({:.2}, {:.2}) heading {}",
            self.id, outcome, robot.x, robot.y, robot.heading
        ));
        outcome
    }
}
