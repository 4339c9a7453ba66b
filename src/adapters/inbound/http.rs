use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::application::DeliveryService;
use crate::common::{ApplicationError, DomainError, StateSnapshot};
use crate::domains::delivery::Order;
use crate::domains::location::LocationTable;
use crate::domains::robot::RobotState;

pub type SharedService = Arc<DeliveryService>;

pub fn build_router(service: SharedService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/locations", get(list_locations))
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/status", post(set_order_status))
        .route("/orders/:id/execute", post(execute_order))
        .route("/tx", post(transmit))
        .route("/mode", post(set_mode))
        .route("/robot", get(get_robot))
        .route("/robot/reset", post(reset_robot))
        .route("/state", get(get_state))
        .route("/ws", get(super::ws::push_channel))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::InvalidCommand { .. }
        | DomainError::MissingEndpoint { .. }
        | DomainError::InvalidOrderState { .. }
        | DomainError::InvalidMode { .. }
        | DomainError::InvalidStatus { .. } => StatusCode::BAD_REQUEST,
        DomainError::OrderNotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::RobotBusy { .. } => StatusCode::CONFLICT,
        DomainError::PlanUnresolved { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::InfrastructureError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Status and `{error, message}` body shared by HTTP responses and push-channel error frames.
pub(crate) fn error_body(error: &ApplicationError) -> (StatusCode, Value) {
    let (status, code, message) = match error {
        ApplicationError::Domain(e) => (status_for(e), e.code(), e.to_string()),
        ApplicationError::Transport(m) => (StatusCode::INTERNAL_SERVER_ERROR, "TransportError", m.clone()),
        ApplicationError::Configuration(e) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "ConfigurationError", e.to_string())
        }
    };
    (status, json!({ "error": code, "message": message }))
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let (status, body) = error_body(&self);
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApplicationError>;

#[derive(Debug, Default, Deserialize)]
struct CreateOrderRequest {
    from: Option<String>,
    to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StatusRequest {
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CommandRequest {
    cmd: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ModeRequest {
    mode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ResetRequest {
    x: Option<f64>,
    y: Option<f64>,
    heading: Option<f64>,
}

// A missing or unparsable body is treated as `{}` so the domain reports what is absent.
fn body<T: Default>(payload: Option<Json<T>>) -> T {
    payload.map(|Json(inner)| inner).unwrap_or_default()
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn list_locations(State(service): State<SharedService>) -> Json<LocationTable> {
    Json(service.locations())
}

async fn list_orders(State(service): State<SharedService>) -> Json<Vec<Order>> {
    Json(service.list_orders().await)
}

async fn get_order(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> ApiResult<Json<Order>> {
    Ok(Json(service.order(&id).await?))
}

async fn create_order(
    State(service): State<SharedService>,
    payload: Option<Json<CreateOrderRequest>>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let request = body(payload);
    let order = service
        .create_order(request.from.as_deref(), request.to.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn set_order_status(
    State(service): State<SharedService>,
    Path(id): Path<String>,
    payload: Option<Json<StatusRequest>>,
) -> ApiResult<Json<Order>> {
    let request = body(payload);
    Ok(Json(
        service
            .set_order_status(&id, request.status.as_deref())
            .await?,
    ))
}

async fn execute_order(
    State(service): State<SharedService>,
    Path(id): Path<String>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    // The run's task handle is dropped on purpose; completion shows up in the push channel.
    let handle = service.execute_order(&id).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "ok": true, "order": handle.order })),
    ))
}

async fn transmit(
    State(service): State<SharedService>,
    payload: Option<Json<CommandRequest>>,
) -> ApiResult<Json<RobotState>> {
    let request = body(payload);
    Ok(Json(service.manual_command(request.cmd.as_deref()).await?))
}

async fn set_mode(
    State(service): State<SharedService>,
    payload: Option<Json<ModeRequest>>,
) -> ApiResult<Json<RobotState>> {
    let request = body(payload);
    Ok(Json(service.set_mode(request.mode.as_deref()).await?))
}

async fn get_robot(State(service): State<SharedService>) -> Json<RobotState> {
    Json(service.robot().await)
}

async fn reset_robot(
    State(service): State<SharedService>,
    payload: Option<Json<ResetRequest>>,
) -> ApiResult<Json<RobotState>> {
    let request = body(payload);
    let heading = request.heading.map(|h| h.round() as i64);
    Ok(Json(service.reset_robot(request.x, request.y, heading).await?))
}

async fn get_state(State(service): State<SharedService>) -> Json<StateSnapshot> {
    Json(service.snapshot().await)
}
