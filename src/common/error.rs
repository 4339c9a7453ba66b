use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid command: {reason}")]
    InvalidCommand { reason: String },

    #[error("Missing endpoint: '{field}' is required")]
    MissingEndpoint { field: String },

    #[error("Order not found: {id}")]
    OrderNotFound { id: String },

    #[error("Order {id} is {status}: {reason}")]
    InvalidOrderState {
        id: u64,
        status: String,
        reason: String,
    },

    #[error("Location could not be resolved: {location}")]
    PlanUnresolved { location: String },

    #[error("Invalid mode '{mode}': expected manual or auto")]
    InvalidMode { mode: String },

    #[error("Invalid order status '{status}'")]
    InvalidStatus { status: String },

    #[error("Robot is busy: {reason}")]
    RobotBusy { reason: String },

    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

impl DomainError {
    /// Stable identifier used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::InvalidCommand { .. } => "InvalidCommand",
            DomainError::MissingEndpoint { .. } => "MissingEndpoint",
            DomainError::OrderNotFound { .. } => "OrderNotFound",
            DomainError::InvalidOrderState { .. } => "InvalidOrderState",
            DomainError::PlanUnresolved { .. } => "PlanUnresolved",
            DomainError::InvalidMode { .. } => "InvalidMode",
            DomainError::InvalidStatus { .. } => "InvalidStatus",
            DomainError::RobotBusy { .. } => "RobotBusy",
            DomainError::InfrastructureError(_) => "InfrastructureError",
        }
    }
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
