use crate::domains::logger::{DomainLogger, DynLogger, FileLogger};
use std::sync::Arc;

const TARGET: &str = "campus_courier::delivery";

/// Forwards domain messages into the process `tracing` subscriber.
struct TracingBridge;

impl DomainLogger for TracingBridge {
    fn info(&self, msg: &str) {
        tracing::info!(target: TARGET, "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: TARGET, "{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: TARGET, "{}", msg);
    }
}

pub fn init_tracing_logger() -> DynLogger {
    Arc::new(TracingBridge)
}

struct NoOp;

impl DomainLogger for NoOp {
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

/// Swallows everything. Default for tests that do not inspect logs.
pub fn init_noop_logger() -> DynLogger {
    Arc::new(NoOp)
}

/// Initialize `fast_log` and return the file-backed domain logger.
pub fn init_file_logger(path: &str) -> Result<DynLogger, String> {
    FileLogger::init(path).map_err(|e| format!("Failed to initialize fast_log: {}", e))?;
    Ok(Arc::new(FileLogger))
}

/// Fans one message out to a primary and an optional secondary logger.
pub struct MultiLogger {
    primary: DynLogger,
    secondary: Option<DynLogger>,
}

impl MultiLogger {
    pub fn new(primary: DynLogger, secondary: Option<DynLogger>) -> Self {
        Self { primary, secondary }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.primary.info(msg);
        if let Some(sec) = &self.secondary {
            sec.info(msg);
        }
    }

    fn warn(&self, msg: &str) {
        self.primary.warn(msg);
        if let Some(sec) = &self.secondary {
            sec.warn(msg);
        }
    }

    fn error(&self, msg: &str) {
        self.primary.error(msg);
        if let Some(sec) = &self.secondary {
            sec.error(msg);
        }
    }
}

/// Tracing output always; the delivery log file as well when one is configured
/// and `fast_log` could be installed.
pub fn init_domain_logger(log_file: Option<&str>) -> DynLogger {
    let tracing_logger = init_tracing_logger();
    let Some(path) = log_file else {
        return tracing_logger;
    };
    match init_file_logger(path) {
        Ok(file_logger) => Arc::new(MultiLogger::new(tracing_logger, Some(file_logger))),
        Err(e) => {
            tracing::warn!("{}; delivery log stays on the console", e);
            tracing_logger
        }
    }
}
