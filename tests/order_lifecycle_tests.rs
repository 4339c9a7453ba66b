use campus_courier::adapters::outbound::init_noop_logger;
use campus_courier::application::{DeliveryService, ServiceSettings};
use campus_courier::common::{ApplicationError, DomainError};
use campus_courier::domains::delivery::OrderStatus;
use campus_courier::domains::location::LocationTable;
use campus_courier::domains::path_planning::PlannerSettings;
use campus_courier::domains::robot::{Activity, Command, ExecutorSettings, Mode, WorkspaceBounds};
use std::sync::Arc;
use std::time::Duration;

fn fast_settings() -> ServiceSettings {
    ServiceSettings {
        executor: ExecutorSettings {
            settle: Duration::from_millis(1),
            ..ExecutorSettings::default()
        },
        planner: PlannerSettings {
            turn_ms: 1,
            forward_ms: 1,
        },
        push_buffer: 1024,
    }
}

fn service_with(settings: ServiceSettings) -> DeliveryService {
    DeliveryService::new(
        settings,
        Arc::new(LocationTable::campus_default()),
        init_noop_logger(),
    )
}

fn domain_error(result: Result<impl std::fmt::Debug, ApplicationError>) -> DomainError {
    match result {
        Err(ApplicationError::Domain(e)) => e,
        other => panic!("Expected a domain error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_requires_both_endpoints() {
    let service = service_with(fast_settings());

    match domain_error(service.create_order(None, Some("Library")).await) {
        DomainError::MissingEndpoint { field } => assert_eq!(field, "from"),
        other => panic!("Expected MissingEndpoint, got {:?}", other),
    }
    match domain_error(service.create_order(Some("Library"), Some("   ")).await) {
        DomainError::MissingEndpoint { field } => assert_eq!(field, "to"),
        other => panic!("Expected MissingEndpoint, got {:?}", other),
    }
    assert!(service.list_orders().await.is_empty());
}

#[tokio::test]
async fn test_unknown_location_still_records_order() {
    let service = service_with(fast_settings());

    let order = service
        .create_order(Some("Library"), Some("Moon Base"))
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Queued);
    assert!(order.plan.is_empty());
    assert_eq!(order.distance, 0);
    assert_eq!(order.estimated_time_ms, 0);
}

#[tokio::test]
async fn test_ids_are_monotonic_and_listed_in_creation_order() {
    let service = service_with(fast_settings());

    let a = service.create_order(Some("Library"), Some("Dining Hall")).await.unwrap();
    let b = service.create_order(Some("Dining Hall"), Some("Parking Lot")).await.unwrap();
    let c = service.create_order(Some("Parking Lot"), Some("Library")).await.unwrap();

    assert_eq!((a.id, b.id, c.id), (1, 2, 3));
    let ids: Vec<u64> = service.list_orders().await.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_set_status_unknown_order() {
    let service = service_with(fast_settings());

    assert!(matches!(
        domain_error(service.set_order_status("42", Some("completed")).await),
        DomainError::OrderNotFound { .. }
    ));
    assert!(matches!(
        domain_error(service.set_order_status("abc", Some("completed")).await),
        DomainError::OrderNotFound { .. }
    ));
}

#[tokio::test]
async fn test_set_status_override_rules() {
    let service = service_with(fast_settings());
    let order = service.create_order(Some("Library"), Some("Admin Building")).await.unwrap();
    let id = order.id.to_string();

    assert!(matches!(
        domain_error(service.set_order_status(&id, Some("delivered")).await),
        DomainError::InvalidStatus { .. }
    ));
    assert!(matches!(
        domain_error(service.set_order_status(&id, Some("in-progress")).await),
        DomainError::InvalidOrderState { .. }
    ));

    let unchanged = service.set_order_status(&id, None).await.unwrap();
    assert_eq!(unchanged.status, OrderStatus::Queued);

    let failed = service.set_order_status(&id, Some("failed")).await.unwrap();
    assert_eq!(failed.status, OrderStatus::Failed);

    let corrected = service.set_order_status(&id, Some("completed")).await.unwrap();
    assert_eq!(corrected.status, OrderStatus::Completed);

    assert!(matches!(
        domain_error(service.set_order_status(&id, Some("queued")).await),
        DomainError::InvalidOrderState { .. }
    ));
}

#[tokio::test]
async fn test_library_to_student_center_end_to_end() {
    let service = service_with(fast_settings());

    let order = service
        .create_order(Some("Library"), Some("Student Center"))
        .await
        .unwrap();
    assert_eq!(order.distance, 20);
    assert_eq!(order.plan.steps[0].command, Command::Left);
    assert_eq!(order.plan.steps[16].command, Command::Right);

    let handle = service.execute_order(&order.id.to_string()).await.unwrap();
    assert_eq!(handle.order.status, OrderStatus::InProgress);

    let outcome = handle.task.await.unwrap();
    assert_eq!(outcome, OrderStatus::Completed);

    let stored = service.order(&order.id.to_string()).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Completed);
    assert_eq!(stored.plan, order.plan);

    let robot = service.robot().await;
    assert_eq!(robot.mode, Mode::Manual);
    assert_eq!(robot.activity, Activity::Ready);
    // LEFT (345), 15 forwards, RIGHT (0), 5 forwards.
    assert_eq!(robot.heading, 0);
    let rad = 345f64.to_radians();
    assert!((robot.x - (15.0 * rad.cos() + 5.0)).abs() < 1e-6);
    assert!((robot.y - 15.0 * rad.sin()).abs() < 1e-6);
}

#[tokio::test]
async fn test_execute_refused_once_order_left_queued() {
    let service = service_with(fast_settings());
    let order = service.create_order(Some("Library"), Some("Dining Hall")).await.unwrap();
    let id = order.id.to_string();

    let handle = service.execute_order(&id).await.unwrap();
    assert!(matches!(
        domain_error(service.execute_order(&id).await),
        DomainError::InvalidOrderState { .. }
    ));
    handle.task.await.unwrap();

    match domain_error(service.execute_order(&id).await) {
        DomainError::InvalidOrderState { status, .. } => assert_eq!(status, "completed"),
        other => panic!("Expected InvalidOrderState, got {:?}", other),
    }
    assert!(matches!(
        domain_error(service.execute_order("99").await),
        DomainError::OrderNotFound { .. }
    ));
}

#[tokio::test]
async fn test_second_run_and_manual_commands_refused_while_busy() {
    let service = service_with(fast_settings());
    let first = service.create_order(Some("Library"), Some("Sports Complex")).await.unwrap();
    let second = service.create_order(Some("Dining Hall"), Some("Library")).await.unwrap();

    let handle = service.execute_order(&first.id.to_string()).await.unwrap();

    assert!(matches!(
        domain_error(service.execute_order(&second.id.to_string()).await),
        DomainError::RobotBusy { .. }
    ));
    assert!(matches!(
        domain_error(service.manual_command(Some("LEFT")).await),
        DomainError::RobotBusy { .. }
    ));
    assert!(matches!(
        domain_error(service.set_mode(Some("manual")).await),
        DomainError::RobotBusy { .. }
    ));

    assert_eq!(handle.task.await.unwrap(), OrderStatus::Completed);

    let second = service.order(&second.id.to_string()).await.unwrap();
    assert_eq!(second.status, OrderStatus::Queued);
    let handle = service.execute_order(&second.id.to_string()).await.unwrap();
    assert_eq!(handle.task.await.unwrap(), OrderStatus::Completed);
}

#[tokio::test]
async fn test_failed_step_fails_order_without_rollback() {
    let mut settings = fast_settings();
    settings.executor.bounds = Some(WorkspaceBounds {
        min_x: -3.0,
        max_x: 3.0,
        min_y: -3.0,
        max_y: 3.0,
    });
    let service = service_with(settings);

    let order = service
        .create_order(Some("Library"), Some("Student Center"))
        .await
        .unwrap();
    let handle = service.execute_order(&order.id.to_string()).await.unwrap();
    assert_eq!(handle.task.await.unwrap(), OrderStatus::Failed);

    let stored = service.order(&order.id.to_string()).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Failed);

    let robot = service.robot().await;
    assert_eq!(robot.activity, Activity::Error);
    assert_eq!(robot.mode, Mode::Manual);
    // Three forwards at 345 degrees were applied before the fourth left the bounds.
    assert_eq!(robot.heading, 345);
    assert!((robot.x - 3.0 * 345f64.to_radians().cos()).abs() < 1e-6);

    // The robot is free again and a manual command clears the error.
    let robot = service.manual_command(Some("RIGHT")).await.unwrap();
    assert_eq!(robot.activity, Activity::Ready);
}

#[tokio::test]
async fn test_empty_plan_completes_immediately() {
    let service = service_with(fast_settings());
    let order = service.create_order(Some("Library"), Some("Library")).await.unwrap();
    assert!(order.plan.is_empty());

    let handle = service.execute_order(&order.id.to_string()).await.unwrap();
    assert_eq!(handle.task.await.unwrap(), OrderStatus::Completed);
    assert_eq!(service.robot().await.mode, Mode::Manual);
}

#[tokio::test]
async fn test_reset_then_read_back() {
    let service = service_with(fast_settings());
    service.manual_command(Some("FORWARD")).await.unwrap();

    service.reset_robot(Some(5.0), Some(5.0), Some(90)).await.unwrap();
    let robot = service.robot().await;
    assert_eq!((robot.x, robot.y, robot.heading), (5.0, 5.0, 90));
    assert_eq!(robot.activity, Activity::Ready);
}
