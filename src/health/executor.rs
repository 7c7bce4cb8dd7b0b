//! Concurrent readiness evaluation.
//!
//! Every check of a snapshot runs as its own task in a [`JoinSet`], sharing
//! one child context:
//!
//! ```text
//! caller ctx ──▶ child ctx (deadline = min(caller, now + timeout))
//!                   │
//!        ┌──────────┼──────────┐
//!        ▼          ▼          ▼
//!     check A    check B    check C     (one task each)
//!        │          │          │
//!        └──── join_next() ────┘
//!              first Err wins, child ctx cancelled,
//!              remaining tasks still joined
//! ```

use std::time::{Duration, Instant};

use tokio::task::{JoinError, JoinSet};
use tracing::{debug, trace};

use super::registry::Snapshot;
use crate::context::ProbeContext;
use crate::error::CheckError;

/// Run all checks of `checks` concurrently and collapse their outcomes.
///
/// Returns `Ok(())` when every check succeeds (immediately for an empty
/// snapshot). Otherwise returns the first failure to arrive; the shared
/// context is cancelled so siblings can stop early, and their results are
/// discarded. All tasks are joined before this returns.
pub async fn execute(
    checks: Snapshot,
    parent: &ProbeContext,
    timeout: Option<Duration>,
) -> Result<(), CheckError> {
    if checks.is_empty() {
        return Ok(());
    }

    // Zero means unbounded
    let ctx = match timeout.filter(|t| !t.is_zero()) {
        Some(timeout) => parent.with_timeout(timeout),
        None => parent.child(),
    };

    let started = Instant::now();
    let total = checks.len();
    let mut tasks = JoinSet::new();

    for check in checks {
        let ctx = ctx.clone();
        tasks.spawn(async move {
            let result = ctx.run(check.check(&ctx)).await;
            trace!(check = check.name(), ok = result.is_ok(), "Check finished");
            result
        });
    }

    let mut first_failure: Option<CheckError> = None;

    while let Some(joined) = tasks.join_next().await {
        let outcome = joined.unwrap_or_else(|e| Err(join_failure(e)));

        if let Err(err) = outcome {
            if first_failure.is_none() {
                // Stop the siblings; they are still joined below.
                ctx.cancel();
                first_failure = Some(err);
            }
        }
    }

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    match first_failure {
        None => {
            debug!(checks = total, elapsed_ms, "Readiness checks passed");
            Ok(())
        }
        Some(err) => {
            debug!(checks = total, elapsed_ms, error = %err, "Readiness checks failed");
            Err(err)
        }
    }
}

fn join_failure(err: JoinError) -> CheckError {
    if err.is_panic() {
        let payload = err.into_panic();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        CheckError::Panicked(message)
    } else {
        CheckError::Cancelled
    }
}
