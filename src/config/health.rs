//! Probe endpoint configuration.

use std::time::Duration;

use super::parse::{env_duration, env_opt};
use super::ConfigError;

/// Default readiness timeout.
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(10);

/// Default liveness path.
pub const DEFAULT_LIVE_PATH: &str = "/livez";

/// Default readiness path.
pub const DEFAULT_READY_PATH: &str = "/readyz";

/// Default info path.
pub const DEFAULT_INFO_PATH: &str = "/infoz";

/// Per-instance probe configuration, fixed once a [`Health`](crate::Health)
/// is built.
#[derive(Clone, Debug)]
pub struct HealthConfig {
    /// Bound for one readiness evaluation. `None` or zero disables the bound.
    pub ready_timeout: Option<Duration>,
    /// Liveness path (default: /livez).
    pub live_path: String,
    /// Readiness path (default: /readyz).
    pub ready_path: String,
    /// Info path (default: /infoz).
    pub info_path: String,
    /// Prefix stripped from request paths before routing (e.g. "/health").
    pub prefix: Option<String>,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            ready_timeout: Some(DEFAULT_READY_TIMEOUT),
            live_path: DEFAULT_LIVE_PATH.to_string(),
            ready_path: DEFAULT_READY_PATH.to_string(),
            info_path: DEFAULT_INFO_PATH.to_string(),
            prefix: None,
        }
    }
}

impl HealthConfig {
    /// Set the readiness timeout. A zero duration disables the bound.
    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Evaluate readiness without a timeout of its own.
    pub fn without_ready_timeout(mut self) -> Self {
        self.ready_timeout = None;
        self
    }

    pub fn with_live_path(mut self, path: impl Into<String>) -> Self {
        self.live_path = path.into();
        self
    }

    pub fn with_ready_path(mut self, path: impl Into<String>) -> Self {
        self.ready_path = path.into();
        self
    }

    pub fn with_info_path(mut self, path: impl Into<String>) -> Self {
        self.info_path = path.into();
        self
    }

    /// Strip `prefix` from request paths before routing.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let trimmed = prefix.trim_end_matches('/');
        self.prefix = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self {
            ready_timeout: env_duration("READY_TIMEOUT", "10s")?,
            ..Self::default()
        };

        if let Some(path) = env_opt("LIVE_PATH") {
            config.live_path = path;
        }
        if let Some(path) = env_opt("READY_PATH") {
            config.ready_path = path;
        }
        if let Some(path) = env_opt("INFO_PATH") {
            config.info_path = path;
        }
        if let Some(prefix) = env_opt("HEALTH_PREFIX") {
            config = config.with_prefix(prefix);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that every path is absolute and distinct.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let paths = [
            ("LIVE_PATH", &self.live_path),
            ("READY_PATH", &self.ready_path),
            ("INFO_PATH", &self.info_path),
        ];

        for (key, path) in paths {
            if !path.starts_with('/') {
                return Err(ConfigError::Invalid {
                    key: key.into(),
                    message: format!("'{}' must start with '/'", path),
                });
            }
        }

        if self.live_path == self.ready_path
            || self.live_path == self.info_path
            || self.ready_path == self.info_path
        {
            return Err(ConfigError::Invalid {
                key: "LIVE_PATH/READY_PATH/INFO_PATH".into(),
                message: "probe paths must be distinct".into(),
            });
        }

        if let Some(ref prefix) = self.prefix {
            if !prefix.starts_with('/') {
                return Err(ConfigError::Invalid {
                    key: "HEALTH_PREFIX".into(),
                    message: format!("'{}' must start with '/'", prefix),
                });
            }
        }

        Ok(())
    }
}
