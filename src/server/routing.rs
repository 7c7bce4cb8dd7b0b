//! Request path resolution.

use crate::config::HealthConfig;

/// Endpoint addressed by a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Live,
    Ready,
    Info,
    NotFound,
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "liveness"),
            Self::Ready => write!(f, "readiness"),
            Self::Info => write!(f, "info"),
            Self::NotFound => write!(f, "not_found"),
        }
    }
}

/// Resolve a URI path against the configured probe paths.
///
/// The configured prefix, if any, must be present and is stripped first.
#[inline]
pub fn resolve(uri_path: &str, config: &HealthConfig) -> Route {
    let path = match config.prefix.as_deref() {
        Some(prefix) => match uri_path.strip_prefix(prefix) {
            Some(rest) if rest.starts_with('/') => rest,
            _ => return Route::NotFound,
        },
        None => uri_path,
    };

    if path == config.live_path {
        Route::Live
    } else if path == config.ready_path {
        Route::Ready
    } else if path == config.info_path {
        Route::Info
    } else {
        Route::NotFound
    }
}
