//! Batch Store Port - Interface for keeping processed batches between requests.
//!
//! Batches live for the life of the process so the results view, send-all,
//! notifications and CSV download can refer back to them by id.

use async_trait::async_trait;

use crate::domain::foundation::BatchId;
use crate::domain::retention::Batch;

/// Errors that can occur during batch storage operations
#[derive(Debug, thiserror::Error)]
pub enum BatchStoreError {
    #[error("Batch not found: {0}")]
    NotFound(BatchId),

    #[error("Batch storage unavailable: {0}")]
    Unavailable(String),
}

/// Port for persisting and loading processed batches
#[async_trait]
pub trait BatchStore: Send + Sync {
    /// Insert or replace a batch under its own id
    async fn save(&self, batch: &Batch) -> Result<(), BatchStoreError>;

    /// Load a batch
    ///
    /// # Errors
    /// Returns `BatchStoreError::NotFound` if no batch has this id
    async fn load(&self, id: BatchId) -> Result<Batch, BatchStoreError>;
}
