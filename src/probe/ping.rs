//! Connectivity probe.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::TcpStream;

use crate::check::Check;
use crate::context::ProbeContext;
use crate::error::{BoxError, CheckError};

/// A connection type able to check that its remote endpoint is alive.
///
/// Implement it for a database pool, a broker client or any other handle the
/// service depends on.
#[async_trait]
pub trait Pinger: Send + Sync {
    /// Returns `Ok(())` if the endpoint is healthy.
    async fn ping(&self, ctx: &ProbeContext) -> Result<(), BoxError>;
}

#[async_trait]
impl<P> Pinger for Arc<P>
where
    P: Pinger + ?Sized,
{
    async fn ping(&self, ctx: &ProbeContext) -> Result<(), BoxError> {
        (**self).ping(ctx).await
    }
}

/// Check that pings a [`Pinger`].
///
/// Failures, including context expiry, are reported as [`CheckError::Ping`].
pub struct PingCheck<P> {
    pinger: P,
    name: String,
}

impl<P: Pinger> PingCheck<P> {
    pub fn new(pinger: P) -> Self {
        Self {
            pinger,
            name: "ping".to_string(),
        }
    }

    /// Set the name reported in logs.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl<P: Pinger> Check for PingCheck<P> {
    async fn check(&self, ctx: &ProbeContext) -> Result<(), CheckError> {
        let result = ctx
            .run(async { self.pinger.ping(ctx).await.map_err(CheckError::Ping) })
            .await;

        match result {
            Err(err @ (CheckError::DeadlineExceeded | CheckError::Cancelled)) => {
                Err(CheckError::Ping(Box::new(err)))
            }
            other => other,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Pinger that opens (and closes) a TCP connection.
#[derive(Debug, Clone)]
pub struct TcpPinger {
    addr: String,
}

impl TcpPinger {
    /// `addr` is a `host:port` pair, resolved on every ping.
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait]
impl Pinger for TcpPinger {
    async fn ping(&self, _ctx: &ProbeContext) -> Result<(), BoxError> {
        let stream = TcpStream::connect(&self.addr).await?;
        drop(stream);
        Ok(())
    }
}
