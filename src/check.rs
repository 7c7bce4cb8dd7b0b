//! The readiness check capability.

use std::future::Future;

use async_trait::async_trait;

use crate::context::ProbeContext;
use crate::error::CheckError;

/// A single readiness predicate.
///
/// Any `Err` counts as a failure, including context expiry. Implementations
/// should return promptly once `ctx` is done.
#[async_trait]
pub trait Check: Send + Sync {
    /// Execute the check.
    async fn check(&self, ctx: &ProbeContext) -> Result<(), CheckError>;

    /// Name used in log output.
    fn name(&self) -> &str {
        "check"
    }
}

/// A [`Check`] backed by a bare async function.
pub struct CheckFn<F> {
    name: String,
    f: F,
}

impl<F, Fut> CheckFn<F>
where
    F: Fn(ProbeContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), CheckError>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self {
            name: "check_fn".to_string(),
            f,
        }
    }

    /// Set the name reported in logs.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl<F, Fut> Check for CheckFn<F>
where
    F: Fn(ProbeContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), CheckError>> + Send + 'static,
{
    async fn check(&self, ctx: &ProbeContext) -> Result<(), CheckError> {
        (self.f)(ctx.clone()).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Shorthand for [`CheckFn::new`].
///
/// ```rust,ignore
/// health.add_check(check_fn(|_ctx| async { Ok(()) }));
/// ```
pub fn check_fn<F, Fut>(f: F) -> CheckFn<F>
where
    F: Fn(ProbeContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), CheckError>> + Send + 'static,
{
    CheckFn::new(f)
}
