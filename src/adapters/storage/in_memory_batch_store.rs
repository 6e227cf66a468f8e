//! In-Memory Batch Store Adapter
//!
//! Keeps processed batches in memory. Batches are lost on restart, which
//! matches the single-session workflow of the retention desk. The store is
//! bounded: saving a new batch past the limit drops the oldest one.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::BatchId;
use crate::domain::retention::Batch;
use crate::ports::{BatchStore, BatchStoreError};

/// Batches kept when no limit is configured.
pub const DEFAULT_MAX_BATCHES: usize = 50;

/// In-memory storage for processed batches
#[derive(Debug, Clone)]
pub struct InMemoryBatchStore {
    batches: Arc<RwLock<HashMap<BatchId, Batch>>>,
    max_batches: usize,
}

impl Default for InMemoryBatchStore {
    fn default() -> Self {
        Self::with_max_batches(DEFAULT_MAX_BATCHES)
    }
}

impl InMemoryBatchStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding at most `max_batches` batches (minimum 1)
    pub fn with_max_batches(max_batches: usize) -> Self {
        Self {
            batches: Arc::new(RwLock::new(HashMap::new())),
            max_batches: max_batches.max(1),
        }
    }

    /// Clear all stored batches (useful for tests)
    pub async fn clear(&self) {
        self.batches.write().await.clear();
    }

    /// Get the number of stored batches
    pub async fn batch_count(&self) -> usize {
        self.batches.read().await.len()
    }
}

#[async_trait]
impl BatchStore for InMemoryBatchStore {
    async fn save(&self, batch: &Batch) -> Result<(), BatchStoreError> {
        let mut batches = self.batches.write().await;
        if !batches.contains_key(&batch.id()) {
            while batches.len() >= self.max_batches {
                let Some(oldest) = batches
                    .values()
                    .min_by_key(|stored| stored.created_at())
                    .map(Batch::id)
                else {
                    break;
                };
                batches.remove(&oldest);
                tracing::debug!(batch_id = %oldest, "Evicted oldest batch");
            }
        }
        batches.insert(batch.id(), batch.clone());
        Ok(())
    }

    async fn load(&self, id: BatchId) -> Result<Batch, BatchStoreError> {
        let batches = self.batches.read().await;
        batches
            .get(&id)
            .cloned()
            .ok_or(BatchStoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::retention::{BatchRowResult, CancellationRequest, ClassificationError};

    fn batch() -> Batch {
        Batch::new(vec![BatchRowResult::unclassified(
            1,
            CancellationRequest::new("a@x.com", ""),
            ClassificationError::EmptyReason,
        )])
    }

    #[tokio::test]
    async fn save_then_load_returns_same_batch() {
        let store = InMemoryBatchStore::new();
        let batch = batch();

        store.save(&batch).await.unwrap();

        assert_eq!(store.load(batch.id()).await.unwrap(), batch);
        assert_eq!(store.batch_count().await, 1);
    }

    #[tokio::test]
    async fn save_replaces_existing_batch() {
        let store = InMemoryBatchStore::new();
        let mut batch = batch();
        store.save(&batch).await.unwrap();

        batch.rows_mut()[0].send_status = crate::domain::retention::SendStatus::Sent;
        store.save(&batch).await.unwrap();

        let loaded = store.load(batch.id()).await.unwrap();
        assert!(loaded.rows()[0].send_status.is_sent());
        assert_eq!(store.batch_count().await, 1);
    }

    #[tokio::test]
    async fn load_unknown_id_is_not_found() {
        let store = InMemoryBatchStore::new();
        let id = BatchId::new();

        let result = store.load(id).await;

        assert!(matches!(result, Err(BatchStoreError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn save_past_limit_evicts_oldest_batch() {
        let store = InMemoryBatchStore::with_max_batches(2);
        let mut saved = Vec::new();
        for _ in 0..3 {
            let batch = batch();
            store.save(&batch).await.unwrap();
            saved.push(batch);
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        assert_eq!(store.batch_count().await, 2);
        assert!(matches!(
            store.load(saved[0].id()).await,
            Err(BatchStoreError::NotFound(_))
        ));
        assert!(store.load(saved[1].id()).await.is_ok());
        assert!(store.load(saved[2].id()).await.is_ok());
    }

    #[tokio::test]
    async fn resaving_at_limit_does_not_evict() {
        let store = InMemoryBatchStore::with_max_batches(1);
        let mut batch = batch();
        store.save(&batch).await.unwrap();

        batch.rows_mut()[0].send_status = crate::domain::retention::SendStatus::Sent;
        store.save(&batch).await.unwrap();

        assert_eq!(store.batch_count().await, 1);
        assert!(store.load(batch.id()).await.unwrap().rows()[0]
            .send_status
            .is_sent());
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let store = InMemoryBatchStore::new();
        store.save(&batch()).await.unwrap();
        store.clear().await;
        assert_eq!(store.batch_count().await, 0);
    }
}
