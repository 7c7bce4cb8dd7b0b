//! Liveness, readiness and info endpoint tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tokio_health::{BuildInfo, CheckError, Health, HealthConfig, ProbeContext};

use crate::helpers::*;

/// Liveness never runs checks
#[tokio::test]
async fn test_liveness_with_failing_check() {
    let server = TestServer::start().await;
    server
        .health
        .add_check_fn(|_| async { Err(CheckError::msg("failed")) });

    let resp = server.get("/livez").await;
    assert_status(&resp, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_readiness_without_checks() {
    let server = TestServer::start().await;

    let resp = server.get("/readyz").await;
    assert_status(&resp, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_readiness_successful_check() {
    let server = TestServer::start().await;
    server.health.add_check_fn(|_| async { Ok(()) });

    let resp = server.get("/readyz").await;
    assert_status(&resp, StatusCode::NO_CONTENT);
}

/// 503 with no failure details in the body
#[tokio::test]
async fn test_readiness_failing_check() {
    let server = TestServer::start().await;
    server.health.add_check_fn(|_| async { Ok(()) });
    server
        .health
        .add_check_fn(|_| async { Err(CheckError::msg("database down")) });

    let resp = server.get("/readyz").await;
    assert_status(&resp, StatusCode::SERVICE_UNAVAILABLE);
    assert_empty_body(resp).await;
}

/// Checks registered after the server started are picked up
#[tokio::test]
async fn test_readiness_check_added_while_serving() {
    let server = TestServer::start().await;

    let resp = server.get("/readyz").await;
    assert_status(&resp, StatusCode::NO_CONTENT);

    server
        .health
        .add_check_fn(|_| async { Err(CheckError::msg("late")) });

    let resp = server.get("/readyz").await;
    assert_status(&resp, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_readiness_timeout() {
    let config = HealthConfig::default().with_ready_timeout(Duration::from_millis(20));
    let server = TestServer::with_health(Health::new(config)).await;

    server.health.add_check_fn(|_| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(())
    });

    let started = std::time::Instant::now();
    let resp = server.get("/readyz").await;
    assert_status(&resp, StatusCode::SERVICE_UNAVAILABLE);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_observer_sees_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let health = Health::default().with_observer(move |err: &CheckError| {
        assert_eq!(err.to_string(), "boom");
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let server = TestServer::with_health(health).await;
    server
        .health
        .add_check_fn(|_| async { Err(CheckError::msg("boom")) });

    let resp = server.get("/readyz").await;
    assert_status(&resp, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_info_not_enabled() {
    let server = TestServer::start().await;

    let resp = server.get("/infoz").await;
    assert_status(&resp, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_info_enabled() {
    let server = TestServer::start().await;
    server
        .health
        .enable_info(
            &BuildInfo::new("1.4.0").with_setting("profile", "release"),
            &serde_json::json!({"region": "eu-west-1"}),
        )
        .unwrap();

    let resp = server.get("/infoz").await;
    assert_status(&resp, StatusCode::OK);
    assert_header_starts_with(&resp, "content-type", "application/json");

    let info: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(info["version"], "1.4.0");
    assert_eq!(info["build_settings"]["profile"], "release");
    assert_eq!(info["region"], "eu-west-1");
}

#[tokio::test]
async fn test_prefixed_paths() {
    let config = HealthConfig::default().with_prefix("/health");
    let server = TestServer::with_health(Health::new(config)).await;

    let resp = server.get("/health/livez").await;
    assert_status(&resp, StatusCode::NO_CONTENT);

    let resp = server.get("/livez").await;
    assert_status(&resp, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_not_allowed() {
    let server = TestServer::start().await;

    let resp = server.post("/readyz").await;
    assert_status(&resp, StatusCode::METHOD_NOT_ALLOWED);
}

/// Concurrent readiness requests and registrations do not interfere
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_and_registrations() {
    let server = Arc::new(TestServer::start().await);

    let mut requests = Vec::new();
    for _ in 0..20 {
        let server = Arc::clone(&server);
        requests.push(tokio::spawn(async move {
            server.health.add_check_fn(|_| async {
                tokio::time::sleep(Duration::from_millis(2)).await;
                Ok(())
            });
            server.get("/readyz").await.status()
        }));
    }

    for request in requests {
        assert_eq!(request.await.unwrap(), StatusCode::NO_CONTENT);
    }
    assert_eq!(server.health.check_count(), 20);
    assert!(server
        .health
        .execute_ready(&ProbeContext::background())
        .await
        .is_ok());
}

#[tokio::test]
async fn test_shutdown_stops_accepting() {
    let server = TestServer::start().await;

    let resp = server.get("/livez").await;
    assert_status(&resp, StatusCode::NO_CONTENT);
    drop(resp);

    assert!(server.shutdown().await);
}
