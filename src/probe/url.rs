//! HTTP reachability probe.

use std::sync::OnceLock;

use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::check::Check;
use crate::context::ProbeContext;
use crate::error::{CheckError, UrlFailure};

static DEFAULT_CLIENT: OnceLock<Client> = OnceLock::new();

/// Check that issues a request and expects a status code < 400.
///
/// Invalid methods or URLs, transport errors, context expiry and failing
/// status codes are all reported as [`CheckError::Url`].
#[derive(Debug, Clone)]
pub struct UrlCheck {
    method: String,
    url: String,
    client: Client,
}

impl UrlCheck {
    /// `GET url` with the shared default client.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    /// `method url` with the shared default client.
    ///
    /// The method is validated when the check runs.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            client: DEFAULT_CLIENT.get_or_init(Client::new).clone(),
        }
    }

    /// Issue requests with `client` instead of the default one.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn fail(&self, reason: UrlFailure) -> CheckError {
        CheckError::Url {
            method: self.method.clone(),
            url: self.url.clone(),
            reason,
        }
    }
}

#[async_trait]
impl Check for UrlCheck {
    async fn check(&self, ctx: &ProbeContext) -> Result<(), CheckError> {
        let method = Method::from_bytes(self.method.as_bytes())
            .map_err(|e| self.fail(UrlFailure::InvalidRequest(e.to_string())))?;

        let mut builder = self.client.request(method, &self.url);
        if let Some(remaining) = ctx.remaining() {
            builder = builder.timeout(remaining);
        }
        let request = builder
            .build()
            .map_err(|e| self.fail(UrlFailure::InvalidRequest(e.to_string())))?;

        let response = ctx
            .run(async {
                self.client
                    .execute(request)
                    .await
                    .map_err(|e| self.fail(UrlFailure::Transport(e.to_string())))
            })
            .await
            .map_err(|e| match e {
                err @ (CheckError::DeadlineExceeded | CheckError::Cancelled) => {
                    self.fail(UrlFailure::Transport(err.to_string()))
                }
                other => other,
            })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(self.fail(UrlFailure::Status(status.as_u16())));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        &self.url
    }
}
