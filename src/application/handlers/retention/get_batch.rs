//! GetBatchHandler - query handler for a processed batch.

use std::sync::Arc;

use crate::domain::foundation::BatchId;
use crate::domain::retention::Batch;
use crate::ports::{BatchStore, BatchStoreError};

/// Query to fetch a batch.
#[derive(Debug, Clone)]
pub struct GetBatchQuery {
    pub batch_id: BatchId,
}

pub struct GetBatchHandler {
    batch_store: Arc<dyn BatchStore>,
}

impl GetBatchHandler {
    pub fn new(batch_store: Arc<dyn BatchStore>) -> Self {
        Self { batch_store }
    }

    pub async fn handle(&self, query: GetBatchQuery) -> Result<Batch, BatchStoreError> {
        self.batch_store.load(query.batch_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryBatchStore;

    #[tokio::test]
    async fn returns_stored_batch() {
        let store = Arc::new(InMemoryBatchStore::new());
        let batch = Batch::new(vec![]);
        store.save(&batch).await.unwrap();

        let handler = GetBatchHandler::new(store);
        let loaded = handler
            .handle(GetBatchQuery {
                batch_id: batch.id(),
            })
            .await
            .unwrap();

        assert_eq!(loaded.id(), batch.id());
    }

    #[tokio::test]
    async fn unknown_batch_is_not_found() {
        let handler = GetBatchHandler::new(Arc::new(InMemoryBatchStore::new()));
        let result = handler
            .handle(GetBatchQuery {
                batch_id: BatchId::new(),
            })
            .await;
        assert!(matches!(result, Err(BatchStoreError::NotFound(_))));
    }
}
