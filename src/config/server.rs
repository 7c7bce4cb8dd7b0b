//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

use super::parse::{env_bool, env_duration, env_list, env_or};
use super::ConfigError;

/// Server configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address (default: 0.0.0.0:8080).
    pub listen_addr: SocketAddr,
    /// Grace period for open connections after shutdown is requested.
    pub drain_timeout: Duration,
    /// Serve the info endpoint.
    pub info_enabled: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr: SocketAddr = env_or("LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .map_err(|e| ConfigError::Parse {
                key: "LISTEN_ADDR".into(),
                value: env_or("LISTEN_ADDR", "0.0.0.0:8080"),
                error: format!("{}", e),
            })?;

        let drain_timeout = env_duration("DRAIN_TIMEOUT", "5s")?.unwrap_or(Duration::ZERO);

        Ok(Self {
            listen_addr,
            drain_timeout,
            info_enabled: env_bool("INFO_ENABLED", true),
        })
    }
}

/// Bundled checks registered by the standalone binary.
#[derive(Clone, Debug, Default)]
pub struct ChecksConfig {
    /// URLs probed with GET (CHECK_URLS, comma-separated).
    pub urls: Vec<String>,
    /// host:port endpoints probed with a TCP connect (CHECK_TCP, comma-separated).
    pub tcp: Vec<String>,
}

impl ChecksConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let urls = env_list("CHECK_URLS");
        for url in &urls {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    key: "CHECK_URLS".into(),
                    message: format!("'{}' is not an http(s) URL", url),
                });
            }
        }

        let tcp = env_list("CHECK_TCP");
        for addr in &tcp {
            if addr.rsplit_once(':').is_none() {
                return Err(ConfigError::Invalid {
                    key: "CHECK_TCP".into(),
                    message: format!("'{}' is missing a port", addr),
                });
            }
        }

        Ok(Self { urls, tcp })
    }

    /// Total number of configured checks.
    pub fn len(&self) -> usize {
        self.urls.len() + self.tcp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
