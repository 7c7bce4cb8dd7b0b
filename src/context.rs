//! Cancellation and deadline signal shared by the checks of one evaluation.
//!
//! A [`ProbeContext`] pairs a [`CancellationToken`] with an optional deadline.
//! Children inherit both: cancelling a parent cancels every child, and a
//! child's deadline never extends past its parent's.
//!
//! ```rust,ignore
//! let ctx = ProbeContext::background().with_timeout(Duration::from_secs(2));
//!
//! let value = ctx.run(async { fetch().await }).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::CheckError;

/// Cancellable context handed to every check.
///
/// Cloning is cheap; clones observe the same cancellation state.
#[derive(Clone, Debug)]
pub struct ProbeContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl ProbeContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Derive a child with the same deadline.
    ///
    /// Cancelling the child does not cancel `self`.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Derive a child bounded by `min(self deadline, now + timeout)`.
    ///
    /// A timeout too large to represent as an instant leaves the child with
    /// the parent's deadline.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.child(),
        }
    }

    /// Derive a child bounded by `min(self deadline, deadline)`.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(parent) => parent.min(deadline),
            None => deadline,
        };

        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    /// Cancel this context and all of its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns true once [`cancel`](Self::cancel) was called on this context
    /// or any ancestor.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The instant after which the context is considered expired.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline, `None` without one.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// `None` while the context is live, otherwise the reason it is done.
    ///
    /// An elapsed deadline takes precedence over cancellation.
    pub fn err(&self) -> Option<CheckError> {
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            Some(CheckError::DeadlineExceeded)
        } else if self.token.is_cancelled() {
            Some(CheckError::Cancelled)
        } else {
            None
        }
    }

    /// Resolves once the context is cancelled or its deadline has passed.
    pub async fn done(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }

    /// Drive `fut` until it completes or the context is done.
    ///
    /// When the context finishes first, `fut` is dropped at its current
    /// suspension point and the context error is returned.
    pub async fn run<F, T>(&self, fut: F) -> Result<T, CheckError>
    where
        F: Future<Output = Result<T, CheckError>>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }

        tokio::select! {
            biased;
            _ = self.done() => Err(self.err().unwrap_or(CheckError::Cancelled)),
            result = fut => result,
        }
    }
}

impl Default for ProbeContext {
    fn default() -> Self {
        Self::background()
    }
}
