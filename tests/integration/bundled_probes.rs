//! Bundled probes against a live server

use reqwest::StatusCode;
use tokio_health::{
    CheckError, Health, PingCheck, ProbeContext, TcpPinger, UrlCheck, UrlFailure,
};

use crate::helpers::*;

/// A URL check pointed at a healthy server's liveness endpoint
#[tokio::test]
async fn test_url_check_against_liveness() {
    let upstream = TestServer::start().await;

    let server = TestServer::start().await;
    server
        .health
        .add_check(UrlCheck::get(upstream.url("/livez")));

    let resp = server.get("/readyz").await;
    assert_status(&resp, StatusCode::NO_CONTENT);
}

/// A failing upstream readiness propagates as a URL check failure
#[tokio::test]
async fn test_url_check_against_unready_upstream() {
    let upstream = TestServer::start().await;
    upstream
        .health
        .add_check_fn(|_| async { Err(CheckError::msg("not ready")) });

    let health = Health::default();
    health.add_check(UrlCheck::get(upstream.url("/readyz")));

    let err = health
        .execute_ready(&ProbeContext::background())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CheckError::Url {
            reason: UrlFailure::Status(503),
            ..
        }
    ));
}

#[tokio::test]
async fn test_url_check_with_custom_client_and_method() {
    let upstream = TestServer::start().await;

    let check = UrlCheck::new("HEAD", upstream.url("/livez")).with_client(reqwest::Client::new());
    assert!(tokio_health::Check::check(&check, &ProbeContext::background())
        .await
        .is_ok());
}

#[tokio::test]
async fn test_url_check_not_found_path() {
    let upstream = TestServer::start().await;

    let err = tokio_health::Check::check(
        &UrlCheck::get(upstream.url("/missing")),
        &ProbeContext::background(),
    )
    .await
    .unwrap_err();
    assert!(err.is_url_check());
}

#[tokio::test]
async fn test_tcp_ping_check() {
    let upstream = TestServer::start().await;

    let health = Health::default();
    health.add_check(PingCheck::new(TcpPinger::new(upstream.addr.to_string())));

    assert!(health
        .execute_ready(&ProbeContext::background())
        .await
        .is_ok());
}
