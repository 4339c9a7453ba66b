use campus_courier::adapters::outbound::{init_noop_logger, MultiLogger};
use campus_courier::application::{DeliveryService, ServiceSettings};
use campus_courier::domains::delivery::OrderStatus;
use campus_courier::domains::location::LocationTable;
use campus_courier::domains::logger::{DomainLogger, DynLogger};
use campus_courier::domains::path_planning::PlannerSettings;
use campus_courier::domains::robot::{ExecutorSettings, WorkspaceBounds};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct CaptureLogger {
    messages: Arc<Mutex<Vec<String>>>,
}

impl CaptureLogger {
    fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn contains(&self, needle: &str) -> bool {
        self.messages.lock().unwrap().iter().any(|m| m.contains(needle))
    }
}

impl DomainLogger for CaptureLogger {
    fn info(&self, msg: &str) {
        self.messages.lock().unwrap().push(format!("INFO:{}", msg));
    }
    fn warn(&self, msg: &str) {
        self.messages.lock().unwrap().push(format!("WARN:{}", msg));
    }
    fn error(&self, msg: &str) {
        self.messages.lock().unwrap().push(format!("ERR:{}", msg));
    }
}

fn service_logging_to(capture: Arc<CaptureLogger>, bounds: Option<WorkspaceBounds>) -> DeliveryService {
    DeliveryService::new(
        ServiceSettings {
            executor: ExecutorSettings {
                settle: Duration::from_millis(1),
                bounds,
                ..ExecutorSettings::default()
            },
            planner: PlannerSettings {
                turn_ms: 1,
                forward_ms: 1,
            },
            push_buffer: 64,
        },
        Arc::new(LocationTable::campus_default()),
        capture,
    )
}

#[tokio::test]
async fn test_order_creation_is_logged() {
    let capture = Arc::new(CaptureLogger::new());
    let service = service_logging_to(capture.clone(), None);

    service.create_order(Some("Library"), Some("Dining Hall")).await.unwrap();
    service.create_order(Some("Library"), Some("Atlantis")).await.unwrap();

    assert!(capture.contains("INFO:Order 1 created: Library -> Dining Hall"));
    assert!(capture.contains("WARN:No plan for Library -> Atlantis"));
}

#[tokio::test]
async fn test_failed_run_is_logged_not_raised() {
    let capture = Arc::new(CaptureLogger::new());
    let service = service_logging_to(
        capture.clone(),
        Some(WorkspaceBounds {
            min_x: -2.0,
            max_x: 2.0,
            min_y: -2.0,
            max_y: 2.0,
        }),
    );

    let order = service
        .create_order(Some("Dining Hall"), Some("Parking Lot"))
        .await
        .unwrap();
    let handle = service.execute_order(&order.id.to_string()).await.unwrap();
    assert_eq!(handle.task.await.unwrap(), OrderStatus::Failed);

    assert!(capture.contains("INFO:Order 1: executing"));
    assert!(capture.contains("ERR:Order 1: step 4/"));
    assert!(capture.contains("INFO:Order 1 failed"));
}

#[tokio::test]
async fn test_multi_logger_fans_out() {
    let primary = Arc::new(CaptureLogger::new());
    let secondary = Arc::new(CaptureLogger::new());
    let multi = MultiLogger::new(primary.clone(), Some(secondary.clone() as DynLogger));

    multi.info("one");
    multi.warn("two");
    multi.error("three");

    for capture in [&primary, &secondary] {
        assert!(capture.contains("INFO:one"));
        assert!(capture.contains("WARN:two"));
        assert!(capture.contains("ERR:three"));
    }

    // No-op logger accepts calls without side effects.
    let noop = init_noop_logger();
    noop.info("ignored");
    noop.error("ignored-err");
}
