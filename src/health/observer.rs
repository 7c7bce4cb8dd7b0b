//! Observers notified when a readiness evaluation fails.

use tracing::warn;

use crate::error::CheckError;

/// Hook invoked once with the aggregated failure of a readiness evaluation.
///
/// Never invoked on success. Any `Fn(&CheckError) + Send + Sync` closure is an
/// observer.
pub trait FailureObserver: Send + Sync {
    fn on_failure(&self, err: &CheckError);
}

impl<F> FailureObserver for F
where
    F: Fn(&CheckError) + Send + Sync,
{
    fn on_failure(&self, err: &CheckError) {
        self(err)
    }
}

/// Observer that ignores failures. Used when none is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl FailureObserver for NoopObserver {
    #[inline]
    fn on_failure(&self, _err: &CheckError) {}
}

/// Observer that logs failures at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl FailureObserver for LogObserver {
    fn on_failure(&self, err: &CheckError) {
        warn!(error = %err, "Readiness check failed");
    }
}
