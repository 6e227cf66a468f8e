//! Per-batch mutual exclusion for handlers that load, mutate and save a batch.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::BatchId;

/// One async mutex per batch id, shared across requests.
///
/// Entries nobody holds or waits on are dropped on the next acquire.
#[derive(Debug, Clone, Default)]
pub struct BatchLocks {
    locks: Arc<Mutex<HashMap<BatchId, Arc<Mutex<()>>>>>,
}

impl BatchLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other caller holds `id`, then hold it until the guard drops.
    pub async fn acquire(&self, id: BatchId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of batch ids currently tracked.
    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}
