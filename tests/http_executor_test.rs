use routing_manager::domain::Interest;
use routing_manager::scheduler::{
    ExecutorError, HttpTaskExecutor, TaskExecutor, TaskSchedulerObserver,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn executor_for(server: &MockServer) -> HttpTaskExecutor {
    HttpTaskExecutor::new(server.uri(), Duration::from_secs(2)).expect("Failed to build client")
}

#[tokio::test]
async fn test_posts_health_check_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/policy/routing/def"))
        .and(header("X-Source", "routing-manager"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({
            "appName": "web",
            "serviceIp": "10.0.0.1",
            "requestType": "health_check"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let executor = executor_for(&server);
    let result = executor
        .execute_task(&Interest::new("web", "10.0.0.1"))
        .await;

    assert!(result.is_ok(), "expected success, got {:?}", result);
    server.verify().await;
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/policy/routing/def"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let executor = executor_for(&server);
    let err = executor
        .execute_task(&Interest::new("web", "10.0.0.1"))
        .await
        .unwrap_err();

    match err {
        ExecutorError::Status { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "unavailable");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_service_is_a_request_error() {
    // Grab a free port, then close it so nothing is listening.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let executor =
        HttpTaskExecutor::new(format!("http://127.0.0.1:{}", port), Duration::from_secs(1))
            .unwrap();
    let err = executor
        .execute_task(&Interest::new("web", "10.0.0.1"))
        .await
        .unwrap_err();

    assert!(matches!(err, ExecutorError::Request(_)), "got {:?}", err);
}

#[test]
fn test_endpoint_ignores_trailing_slash() {
    let executor = HttpTaskExecutor::new("http://monitoring:10999/", Duration::ZERO).unwrap();
    assert_eq!(
        executor.endpoint(),
        "http://monitoring:10999/policy/routing/def"
    );
}

/// A failing endpoint is retried on the next tick rather than ending the job.
#[tokio::test]
async fn test_scheduler_keeps_ticking_against_failing_service() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/policy/routing/def"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let scheduler = TaskSchedulerObserver::new(
        Arc::new(executor_for(&server)),
        Duration::from_millis(20),
    );
    scheduler.start_job(&Interest::new("web", "10.0.0.1")).await;

    tokio::time::sleep(Duration::from_millis(150)).await;
    scheduler.shutdown().await;
    // Let the server finish reading anything already on the wire.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.len() >= 2, "only {} requests", requests.len());

    // Shutdown is final: nothing more reaches the server.
    let seen = requests.len();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let after = server.received_requests().await.unwrap_or_default();
    assert_eq!(after.len(), seen);
}
