//! Append-only registry of readiness checks.
//!
//! Thread-safe with RwLock: writers hold the lock only for the push, readers
//! only long enough to clone the current list of `Arc`s.

use std::sync::{Arc, PoisonError, RwLock};

use crate::check::Check;

/// Snapshot of registered checks, in registration order.
pub type Snapshot = Vec<Arc<dyn Check>>;

/// Registry of readiness checks.
///
/// Grows monotonically for the life of its owner; checks are never removed.
#[derive(Default)]
pub struct Registry {
    checks: RwLock<Vec<Arc<dyn Check>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a check. Safe to call concurrently with evaluations.
    pub fn register(&self, check: Arc<dyn Check>) {
        // A panic while holding the lock cannot leave a half-pushed Vec,
        // so poisoning is ignored.
        self.checks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(check);
    }

    /// Copy the current list of checks.
    ///
    /// Checks registered after this call are not part of the snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.checks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of registered checks.
    pub fn len(&self) -> usize {
        self.checks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no check has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("checks", &self.len())
            .finish()
    }
}
