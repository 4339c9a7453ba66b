use crate::common::{DomainError, DomainResult};
use crate::domains::location::LocationLookup;
use crate::domains::logger::DynLogger;
use crate::domains::path_planning::{PathPlanner, RoutePlan};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::order::{Order, OrderId, OrderStatus};

#[derive(Debug)]
struct Ledger {
    orders: BTreeMap<OrderId, Order>,
    next_id: OrderId,
}

/// Owns every order and its lifecycle transitions. Orders are never evicted.
pub struct OrderStore {
    ledger: RwLock<Ledger>,
    planner: PathPlanner,
    locations: Arc<dyn LocationLookup>,
    logger: DynLogger,
}

fn required(field: &str, value: Option<&str>) -> DomainResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(DomainError::MissingEndpoint {
            field: field.to_string(),
        }),
    }
}

impl OrderStore {
    pub fn new(planner: PathPlanner, locations: Arc<dyn LocationLookup>, logger: DynLogger) -> Self {
        Self {
            ledger: RwLock::new(Ledger {
                orders: BTreeMap::new(),
                next_id: 1,
            }),
            planner,
            locations,
            logger,
        }
    }

    pub async fn create(&self, from: Option<&str>, to: Option<&str>) -> DomainResult<Order> {
        let from = required("from", from)?;
        let to = required("to", to)?;

        let plan = match self.planner.plan_between(self.locations.as_ref(), &from, &to) {
            Ok(plan) => plan,
            Err(DomainError::PlanUnresolved { location }) => {
                self.logger.warn(&format!(
                    "No plan for {} -> {}: unknown location '{}'",
                    from, to, location
                ));
                RoutePlan::default()
            }
            Err(e) => return Err(e),
        };

        let order = {
            let mut ledger = self.ledger.write().await;
            let id = ledger.next_id;
            ledger.next_id += 1;
            let order = Order::new(id, from, to, plan);
            ledger.orders.insert(id, order.clone());
            order
        };

        self.logger.info(&format!(
            "Order {} created: {} -> {} ({} steps, distance {}, ~{} ms)",
            order.id,
            order.from,
            order.to,
            order.plan.len(),
            order.distance,
            order.estimated_time_ms
        ));
        Ok(order)
    }

    pub async fn get(&self, id: OrderId) -> DomainResult<Order> {
        self.ledger
            .read()
            .await
            .orders
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::OrderNotFound { id: id.to_string() })
    }

    /// All orders in creation order.
    pub async fn list(&self) -> Vec<Order> {
        self.ledger.read().await.orders.values().cloned().collect()
    }

    /// Manual override. `in-progress` belongs to the runner: it cannot be set here,
    /// and an order holding it cannot be changed here. Nothing returns to `queued`.
    pub async fn set_status(&self, id: OrderId, status: OrderStatus) -> DomainResult<Order> {
        let mut ledger = self.ledger.write().await;
        let order = ledger
            .orders
            .get_mut(&id)
            .ok_or_else(|| DomainError::OrderNotFound { id: id.to_string() })?;

        if order.status == status {
            return Ok(order.clone());
        }
        if status == OrderStatus::InProgress {
            return Err(order.invalid_state("in-progress is entered only by executing the order"));
        }
        if order.status == OrderStatus::InProgress {
            return Err(order.invalid_state("the order is being executed"));
        }
        if status == OrderStatus::Queued {
            return Err(order.invalid_state("an order cannot return to queued"));
        }

        order.status = status;
        Ok(order.clone())
    }

    /// queued -> in-progress, atomically with the check.
    pub(crate) async fn begin_execution(&self, id: OrderId) -> DomainResult<Order> {
        let mut ledger = self.ledger.write().await;
        let order = ledger
            .orders
            .get_mut(&id)
            .ok_or_else(|| DomainError::OrderNotFound { id: id.to_string() })?;
        if order.status != OrderStatus::Queued {
            return Err(order.invalid_state("only queued orders can be executed"));
        }
        order.status = OrderStatus::InProgress;
        Ok(order.clone())
    }

    pub(crate) async fn finish_execution(&self, id: OrderId, outcome: OrderStatus) -> DomainResult<Order> {
        let mut ledger = self.ledger.write().await;
        let order = ledger
            .orders
            .get_mut(&id)
            .ok_or_else(|| DomainError::OrderNotFound { id: id.to_string() })?;
        order.status = outcome;
        Ok(order.clone())
    }
}
