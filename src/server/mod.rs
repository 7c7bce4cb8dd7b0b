//! HTTP front end for the probe endpoints.
//!
//! | Route | Success | Failure |
//! |-------|---------|---------|
//! | liveness (`/livez`) | 204 | never fails |
//! | readiness (`/readyz`) | 204 | 503 |
//! | info (`/infoz`) | 200 JSON | 404 until enabled |
//!
//! Readiness responses never carry failure details; configure a
//! [`FailureObserver`](crate::FailureObserver) to log them.
//!
//! # Example
//!
//! ```rust,ignore
//! use tokio_health::{Health, HealthConfig, server::Server};
//!
//! let health = Arc::new(Health::new(HealthConfig::default()));
//! let server = Server::new(Arc::clone(&health));
//!
//! let listener = TcpListener::bind("0.0.0.0:8080").await?;
//! server.run(listener).await?;
//! ```
//!
//! # Graceful Shutdown
//!
//! [`Server::trigger_shutdown`] stops the accept loop and asks open
//! connections to finish their current request:
//!
//! ```rust,ignore
//! server.trigger_shutdown();
//! server.wait_for_drain(Duration::from_secs(5)).await;
//! ```

mod routing;

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderValue, Method, Request, Response, StatusCode};
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub use routing::{resolve, Route};

use crate::context::ProbeContext;
use crate::health::Health;

/// Answer one probe request.
///
/// Readiness runs under a fresh context. If the client goes away, hyper
/// drops this future, which aborts the in-flight checks.
pub async fn handle<B>(health: &Health, req: Request<B>) -> Response<Full<Bytes>> {
    let route = resolve(req.uri().path(), health.config());

    let response = if route != Route::NotFound && !is_read_method(req.method()) {
        let mut response = empty(StatusCode::METHOD_NOT_ALLOWED);
        response
            .headers_mut()
            .insert(ALLOW, HeaderValue::from_static("GET, HEAD"));
        response
    } else {
        match route {
            Route::Live => empty(StatusCode::NO_CONTENT),
            Route::Ready => match health.execute_ready(&ProbeContext::background()).await {
                Ok(()) => empty(StatusCode::NO_CONTENT),
                Err(_) => empty(StatusCode::SERVICE_UNAVAILABLE),
            },
            Route::Info => match health.info_payload() {
                Some(payload) => json(payload),
                None => not_found(),
            },
            Route::NotFound => not_found(),
        }
    };

    debug!(
        method = %req.method(),
        path = req.uri().path(),
        route = %route,
        status = response.status().as_u16(),
        "Probe request"
    );

    response
}

#[inline]
fn is_read_method(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD
}

fn empty(status: StatusCode) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

fn not_found() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(b"Not Found")));
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    response
}

fn json(payload: Bytes) -> Response<Full<Bytes>> {
    let length = HeaderValue::from(payload.len());
    let mut response = Response::new(Full::new(payload));
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=UTF-8"),
    );
    headers.insert(CONTENT_LENGTH, length);
    response
}

/// Decrements the active connection counter when dropped.
struct ConnectionGuard(Arc<AtomicUsize>);

impl ConnectionGuard {
    fn new(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        Self(Arc::clone(counter))
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

/// HTTP/1.1 server exposing one [`Health`].
pub struct Server {
    health: Arc<Health>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    shutdown_initiated: AtomicBool,
    active_connections: Arc<AtomicUsize>,
}

impl Server {
    pub fn new(health: Arc<Health>) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            health,
            shutdown_tx,
            shutdown_rx,
            shutdown_initiated: AtomicBool::new(false),
            active_connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The handler served by this server.
    pub fn health(&self) -> &Arc<Health> {
        &self.health
    }

    /// Accept connections on `listener` until shutdown is triggered.
    pub async fn run(&self, listener: TcpListener) -> std::io::Result<()> {
        let mut shutdown_rx = self.shutdown_rx.clone();
        if *shutdown_rx.borrow() {
            return Ok(());
        }

        if let Ok(addr) = listener.local_addr() {
            info!("Probe server listening on http://{}", addr);
        }

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, remote_addr) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            // Usually fd exhaustion, back off briefly
                            warn!("Accept failed: {}", e);
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            continue;
                        }
                    };
                    let _ = stream.set_nodelay(true);

                    let health = Arc::clone(&self.health);
                    let guard = ConnectionGuard::new(&self.active_connections);
                    let mut conn_shutdown = self.shutdown_rx.clone();

                    tokio::spawn(async move {
                        let _guard = guard;
                        let service = service_fn(move |req| {
                            let health = Arc::clone(&health);
                            async move { Ok::<_, Infallible>(handle(&health, req).await) }
                        });

                        let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
                        tokio::pin!(conn);

                        let result = tokio::select! {
                            result = conn.as_mut() => result,
                            _ = conn_shutdown.changed() => {
                                conn.as_mut().graceful_shutdown();
                                conn.await
                            }
                        };

                        if let Err(e) = result {
                            debug!("Connection from {} closed with error: {}", remote_addr, e);
                        }
                    });
                }
                _ = shutdown_rx.changed() => {
                    debug!("Probe server received shutdown signal");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Stop accepting connections and ask open ones to close.
    pub fn trigger_shutdown(&self) {
        if self.shutdown_initiated.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.shutdown_tx.send(true);
    }

    /// Number of open connections.
    pub fn active_connections(&self) -> usize {
        self.active_connections.load(Ordering::Relaxed)
    }

    /// Wait for all active connections to drain.
    /// Returns true if drained successfully, false if timeout was reached.
    pub async fn wait_for_drain(&self, timeout: Duration) -> bool {
        let start = std::time::Instant::now();
        let check_interval = Duration::from_millis(50);

        loop {
            let active = self.active_connections();
            if active == 0 {
                return true;
            }

            if start.elapsed() >= timeout {
                warn!("Drain timeout reached with {} active connections", active);
                return false;
            }

            debug!("Waiting for {} connections to drain...", active);
            tokio::time::sleep(check_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HealthConfig;
    use crate::error::CheckError;
    use crate::info::BuildInfo;
    use http_body_util::BodyExt;

    fn get(path: &str) -> Request<()> {
        Request::builder().uri(path).body(()).unwrap()
    }

    async fn body_bytes(response: Response<Full<Bytes>>) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_liveness_ignores_failing_checks() {
        let health = Health::default();
        health.add_check_fn(|_| async { Err(CheckError::msg("failed")) });

        let response = handle(&health, get("/livez")).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_readiness_success() {
        let health = Health::default();
        health.add_check_fn(|_| async { Ok(()) });

        let response = handle(&health, get("/readyz")).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_readiness_failure_hides_details() {
        let health = Health::default();
        health.add_check_fn(|_| async { Err(CheckError::msg("secret detail")) });

        let response = handle(&health, get("/readyz")).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_info_not_found_until_enabled() {
        let health = Health::default();

        let response = handle(&health, get("/infoz")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        health.enable_info(&BuildInfo::new(""), &()).unwrap();

        let response = handle(&health, get("/infoz")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "application/json; charset=UTF-8"
        );

        let value: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"version": "", "build_settings": {}})
        );
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let health = Health::default();
        let response = handle(&health, get("/metrics")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let health = Health::default();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/readyz")
            .body(())
            .unwrap();

        let response = handle(&health, request).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET, HEAD");
    }

    #[tokio::test]
    async fn test_head_is_served() {
        let health = Health::default();
        let request = Request::builder()
            .method(Method::HEAD)
            .uri("/livez")
            .body(())
            .unwrap();

        let response = handle(&health, request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_custom_paths_and_prefix() {
        let config = HealthConfig::default()
            .with_prefix("/health")
            .with_ready_path("/ready");
        let health = Health::new(config);

        let response = handle(&health, get("/health/ready")).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = handle(&health, get("/readyz")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_shutdown_before_run_returns() {
        let server = Server::new(Arc::new(Health::default()));
        server.trigger_shutdown();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        server.run(listener).await.unwrap();
        assert!(server.wait_for_drain(Duration::from_millis(10)).await);
    }
}
