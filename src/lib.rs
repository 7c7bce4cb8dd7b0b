//! tokio_health - Liveness and readiness probes for Tokio services.
//!
//! Register readiness checks at any time; a readiness request runs all of
//! them concurrently under a shared timeout and fails on the first failure.
//!
//! # Features
//!
//! - **Concurrent checks**: One task per check, first failure wins and
//!   cancels the others
//! - **Bounded evaluation**: Configurable readiness timeout (default 10s)
//! - **Bundled probes**: HTTP reachability and ping-style connectivity checks
//! - **Info endpoint**: Build metadata as JSON
//! - **Kubernetes paths**: `/livez`, `/readyz`, `/infoz` by default
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tokio_health::{build_info, Health, HealthConfig, LogObserver, UrlCheck};
//! use tokio_health::server::Server;
//!
//! let health = Arc::new(Health::new(HealthConfig::default()).with_observer(LogObserver));
//! health.add_check(UrlCheck::get("http://localhost:1234/"));
//! health.add_check_fn(|_ctx| async { Ok(()) });
//! health.enable_info(&build_info!(), &())?;
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! Server::new(health).run(listener).await?;
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit hash (8 chars) with optional "-dirty" suffix
pub const BUILD_VERSION: &str = env!("BUILD_VERSION");

pub mod check;
pub mod config;
pub mod context;
pub mod error;
pub mod health;
pub mod info;
pub mod logging;
pub mod probe;
pub mod server;

// Re-exports for convenience
pub use check::{check_fn, Check, CheckFn};
pub use config::HealthConfig;
pub use context::ProbeContext;
pub use error::{BoxError, CheckError, InfoError, UrlFailure};
pub use health::{FailureObserver, Health, LogObserver, NoopObserver};
pub use info::BuildInfo;
pub use probe::{PingCheck, Pinger, TcpPinger, UrlCheck};
