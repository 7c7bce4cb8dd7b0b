//! Configuration module for tokio_health.
//!
//! The library types ([`HealthConfig`]) are plain values built in code. The
//! standalone binary loads everything from environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use tokio_health::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Listen address: {}", config.server.listen_addr);
//! println!("Ready timeout: {:?}", config.health.ready_timeout);
//! ```

mod error;
mod health;
mod logging;
mod parse;
mod server;

pub use error::ConfigError;
pub use health::{
    HealthConfig, DEFAULT_INFO_PATH, DEFAULT_LIVE_PATH, DEFAULT_READY_PATH, DEFAULT_READY_TIMEOUT,
};
pub use logging::{LogFormat, LoggingConfig};
pub use parse::parse_duration;
pub use server::{ChecksConfig, ServerConfig};

/// Serializes tests that mutate process environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Complete configuration of the standalone binary.
#[derive(Clone, Debug)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Probe endpoint configuration.
    pub health: HealthConfig,
    /// Bundled checks to register.
    pub checks: ChecksConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            health: HealthConfig::from_env()?,
            checks: ChecksConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!("  Listen: {}", self.server.listen_addr);
        if let Some(ref prefix) = self.health.prefix {
            info!("  Prefix: {}", prefix);
        }
        info!("  Liveness: {}", self.health.live_path);
        info!("  Readiness: {}", self.health.ready_path);

        if self.server.info_enabled {
            info!("  Info: {}", self.health.info_path);
        } else {
            info!("  Info: disabled");
        }

        match self.health.ready_timeout {
            Some(timeout) => info!("  Ready timeout: {:?}", timeout),
            None => info!("  Ready timeout: disabled"),
        }

        for url in &self.checks.urls {
            info!("  URL check: {}", url);
        }
        for addr in &self.checks.tcp {
            info!("  TCP check: {}", addr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_config_defaults() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        // Clear all env vars that might affect the test
        std::env::remove_var("LISTEN_ADDR");
        std::env::remove_var("READY_TIMEOUT");
        std::env::remove_var("LIVE_PATH");
        std::env::remove_var("READY_PATH");
        std::env::remove_var("INFO_PATH");
        std::env::remove_var("HEALTH_PREFIX");
        std::env::remove_var("INFO_ENABLED");
        std::env::remove_var("DRAIN_TIMEOUT");
        std::env::remove_var("CHECK_URLS");
        std::env::remove_var("CHECK_TCP");
        std::env::remove_var("LOG_FORMAT");

        let config = Config::from_env().expect("Should load config");

        assert_eq!(
            config.server.listen_addr,
            "0.0.0.0:8080".parse().unwrap()
        );
        assert!(config.server.info_enabled);
        assert_eq!(config.health.ready_timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.health.ready_path, "/readyz");
        assert!(config.checks.is_empty());
        assert_eq!(config.logging.format, LogFormat::Text);
    }
}
