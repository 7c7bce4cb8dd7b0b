//! Test helpers and utilities

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tokio::net::TcpListener;
use tokio_health::server::Server;
use tokio_health::{Health, HealthConfig};

/// In-process probe server bound to 127.0.0.1 on an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub health: Arc<Health>,
    pub client: Client,
    server: Arc<Server>,
}

#[allow(dead_code)]
impl TestServer {
    /// Start a server with default configuration
    pub async fn start() -> Self {
        Self::with_health(Health::new(HealthConfig::default())).await
    }

    /// Start a server for a prepared handler
    pub async fn with_health(health: Health) -> Self {
        let health = Arc::new(health);
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let server = Arc::new(Server::new(Arc::clone(&health)));
        let running = Arc::clone(&server);
        tokio::spawn(async move {
            running.run(listener).await.expect("Server failed");
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            addr,
            health,
            client,
            server,
        }
    }

    /// Full URL for a path on this server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Make a GET request to the server
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// Make a POST request to the server
    pub async fn post(&self, path: &str) -> Response {
        self.client
            .post(self.url(path))
            .send()
            .await
            .expect("POST request failed")
    }

    /// Stop accepting connections
    pub async fn shutdown(&self) -> bool {
        self.server.trigger_shutdown();
        self.server.wait_for_drain(Duration::from_secs(5)).await
    }
}

/// Assert that response has expected status
pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(
        response.status(),
        expected,
        "Expected status {}, got {}",
        expected,
        response.status()
    );
}

/// Assert that response contains header with prefix
pub fn assert_header_starts_with(response: &Response, name: &str, prefix: &str) {
    let value = response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("Header '{}' not found", name))
        .to_str()
        .unwrap();
    assert!(
        value.starts_with(prefix),
        "Header '{}' expected to start with '{}', got '{}'",
        name,
        prefix,
        value
    );
}

/// Assert that the body is empty
pub async fn assert_empty_body(response: Response) {
    let body = response.bytes().await.expect("Failed to read body");
    assert!(body.is_empty(), "Expected empty body, got {} bytes", body.len());
}
