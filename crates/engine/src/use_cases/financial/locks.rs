//! Per-decision critical sections for resolution.

use std::sync::Arc;

use blankwars_domain::DecisionId;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per decision being resolved.
///
/// Entries are created on demand and removed when the last holder or waiter
/// lets go, so the map only ever holds decisions currently in flight.
#[derive(Default)]
pub struct ResolutionLocks {
    inner: Arc<DashMap<DecisionId, Arc<Mutex<()>>>>,
}

impl ResolutionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, id: DecisionId) -> ResolutionGuard {
        let mutex = self
            .inner
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = mutex.lock_owned().await;
        ResolutionGuard {
            id,
            locks: Arc::clone(&self.inner),
            guard: Some(guard),
        }
    }

    /// Decisions currently locked or awaited.
    pub fn in_flight(&self) -> usize {
        self.inner.len()
    }
}

pub struct ResolutionGuard {
    id: DecisionId,
    locks: Arc<DashMap<DecisionId, Arc<Mutex<()>>>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map's own handle left: nobody holds or awaits this lock
        self.locks
            .remove_if(&self.id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
