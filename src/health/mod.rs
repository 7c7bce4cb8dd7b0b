//! Liveness and readiness probing for orchestration platforms.
//!
//! - **Liveness**: Is the process alive? Never runs checks.
//! - **Readiness**: Can the service handle traffic? Runs every registered
//!   check concurrently under a shared timeout.
//! - **Info**: Optional build metadata as JSON.
//!
//! # Kubernetes Integration
//!
//! ```yaml
//! livenessProbe:
//!   httpGet:
//!     path: /livez
//!     port: 8080
//!   periodSeconds: 10
//!
//! readinessProbe:
//!   httpGet:
//!     path: /readyz
//!     port: 8080
//!   periodSeconds: 5
//!   timeoutSeconds: 11
//! ```

mod executor;
mod observer;
mod registry;

use std::sync::{Arc, PoisonError, RwLock};

use bytes::Bytes;
use serde::Serialize;
use tracing::info;

pub use executor::execute;
pub use observer::{FailureObserver, LogObserver, NoopObserver};
pub use registry::{Registry, Snapshot};

use crate::check::{Check, CheckFn};
use crate::config::HealthConfig;
use crate::context::ProbeContext;
use crate::error::{CheckError, InfoError};
use crate::info::{info_payload, BuildInfo};

/// Liveness and readiness handler.
///
/// Share it as `Arc<Health>` between the code registering checks and the
/// HTTP server; registration is allowed at any time.
pub struct Health {
    config: HealthConfig,
    registry: Registry,
    observer: Arc<dyn FailureObserver>,
    info: RwLock<Option<Bytes>>,
}

impl Health {
    /// Create a handler with no checks and no failure observer.
    pub fn new(config: HealthConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
            observer: Arc::new(NoopObserver),
            info: RwLock::new(None),
        }
    }

    /// Notify `observer` whenever a readiness evaluation fails.
    pub fn with_observer(mut self, observer: impl FailureObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// The configuration this handler was built with.
    pub fn config(&self) -> &HealthConfig {
        &self.config
    }

    /// Register another readiness check.
    pub fn add_check(&self, check: impl Check + 'static) {
        self.registry.register(Arc::new(check));
    }

    /// Register a shared readiness check.
    pub fn add_shared_check(&self, check: Arc<dyn Check>) {
        self.registry.register(check);
    }

    /// Register a bare async function as a readiness check.
    pub fn add_check_fn<F, Fut>(&self, f: F)
    where
        F: Fn(ProbeContext) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), CheckError>> + Send + 'static,
    {
        self.add_check(CheckFn::new(f));
    }

    /// Number of registered checks.
    pub fn check_count(&self) -> usize {
        self.registry.len()
    }

    /// Run all registered checks.
    ///
    /// `ctx` is usually tied to the inbound request. The evaluation is further
    /// bounded by the configured readiness timeout. On failure the observer is
    /// called once with the returned error.
    pub async fn execute_ready(&self, ctx: &ProbeContext) -> Result<(), CheckError> {
        let result = execute(self.registry.snapshot(), ctx, self.config.ready_timeout).await;

        if let Err(ref err) = result {
            self.observer.on_failure(err);
        }

        result
    }

    /// Enable the info endpoint with `build` metadata and caller `fields`.
    ///
    /// The payload is serialized here, once. Errors are configuration errors
    /// and should abort startup.
    pub fn enable_info<T>(&self, build: &BuildInfo, fields: &T) -> Result<(), InfoError>
    where
        T: Serialize + ?Sized,
    {
        let payload = info_payload(build, fields)?;
        info!(version = %build.version, bytes = payload.len(), "Info endpoint enabled");

        *self.info.write().unwrap_or_else(PoisonError::into_inner) = Some(payload);
        Ok(())
    }

    /// The serialized info payload, `None` until enabled.
    pub fn info_payload(&self) -> Option<Bytes> {
        self.info
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(HealthConfig::default())
    }
}

impl std::fmt::Debug for Health {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Health")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("info_enabled", &self.info_payload().is_some())
            .finish()
    }
}
