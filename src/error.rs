//! Error types for readiness evaluation and info enablement.

/// Boxed error accepted as the cause of a check failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a failed check or of a failed readiness evaluation.
///
/// The engine surfaces exactly one of these per evaluation. It never tells
/// which registered check produced it.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// A check failed with an underlying cause.
    #[error("check failed: {0}")]
    Failed(#[source] BoxError),

    /// A check failed with a plain message.
    #[error("{0}")]
    Message(String),

    /// The bounded context expired before all checks completed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The context was cancelled before the check completed.
    #[error("context cancelled")]
    Cancelled,

    /// A URL probe could not build, send or validate its request.
    #[error("URL check failed: {reason} for {method} {url}")]
    Url {
        method: String,
        url: String,
        reason: UrlFailure,
    },

    /// A connectivity probe failed to ping its endpoint.
    #[error("ping check failed: {0}")]
    Ping(#[source] BoxError),

    /// The task running a check panicked.
    #[error("check panicked: {0}")]
    Panicked(String),
}

impl CheckError {
    /// Wrap an arbitrary error as a check failure.
    pub fn failed<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        CheckError::Failed(err.into())
    }

    /// Create a failure from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        CheckError::Message(message.into())
    }

    /// Returns true if the bounded context expired.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, CheckError::DeadlineExceeded)
    }

    /// Returns true if the context was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CheckError::Cancelled)
    }

    /// Returns true for failures reported by [`UrlCheck`](crate::probe::UrlCheck).
    pub fn is_url_check(&self) -> bool {
        matches!(self, CheckError::Url { .. })
    }

    /// Returns true for failures reported by [`PingCheck`](crate::probe::PingCheck).
    pub fn is_ping_check(&self) -> bool {
        matches!(self, CheckError::Ping(_))
    }
}

impl From<String> for CheckError {
    fn from(message: String) -> Self {
        CheckError::Message(message)
    }
}

impl From<&str> for CheckError {
    fn from(message: &str) -> Self {
        CheckError::Message(message.to_string())
    }
}

impl From<std::io::Error> for CheckError {
    fn from(e: std::io::Error) -> Self {
        CheckError::Failed(Box::new(e))
    }
}

/// Why a URL probe failed.
#[derive(Debug, thiserror::Error)]
pub enum UrlFailure {
    /// The method or URL could not be turned into a request.
    #[error("failed to create http request: {0}")]
    InvalidRequest(String),

    /// The request could not be sent or no response arrived.
    #[error("failed to issue http request: {0}")]
    Transport(String),

    /// The response carried a status code >= 400.
    #[error("got failing status code {0}")]
    Status(u16),
}

/// Error returned when the info endpoint cannot be enabled.
#[derive(Debug, thiserror::Error)]
pub enum InfoError {
    /// Caller fields failed to serialize.
    #[error("failed to serialize info payload: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Caller fields did not serialize to a JSON object.
    #[error("info fields must serialize to a JSON object, got {0}")]
    NotAnObject(&'static str),
}
