//! RunBatchHandler - processes an uploaded list of cancellations.

use std::sync::Arc;

use super::process_cancellation::{ProcessCancellationCommand, ProcessCancellationHandler};
use crate::domain::retention::{Batch, CancellationRequest, OfferCatalog};
use crate::ports::{AIProvider, BatchStore, BatchStoreError};

/// Command to run a batch.
#[derive(Debug, Clone)]
pub struct RunBatchCommand {
    pub requests: Vec<CancellationRequest>,
}

/// Processes rows one at a time, in input order, and stores the batch.
pub struct RunBatchHandler {
    processor: ProcessCancellationHandler,
    batch_store: Arc<dyn BatchStore>,
}

impl RunBatchHandler {
    pub fn new(
        ai_provider: Arc<dyn AIProvider>,
        catalog: Arc<OfferCatalog>,
        batch_store: Arc<dyn BatchStore>,
    ) -> Self {
        Self {
            processor: ProcessCancellationHandler::new(ai_provider, catalog),
            batch_store,
        }
    }

    /// Row failures stay on their rows; only a storage failure aborts.
    pub async fn handle(&self, cmd: RunBatchCommand) -> Result<Batch, BatchStoreError> {
        let total = cmd.requests.len();
        let mut rows = Vec::with_capacity(total);

        for (idx, request) in cmd.requests.into_iter().enumerate() {
            let row = idx + 1;
            let result = self
                .processor
                .handle(ProcessCancellationCommand { row, request })
                .await;
            tracing::debug!(row, total, stage = %result.stage(), "Processed batch row");
            rows.push(result);
        }

        let batch = Batch::new(rows);
        self.batch_store.save(&batch).await?;

        let summary = batch.summary();
        tracing::info!(
            batch_id = %batch.id(),
            total = summary.total,
            matched = summary.matched,
            no_match = summary.no_match,
            failed = summary.failed,
            "Batch processed"
        );

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::storage::InMemoryBatchStore;
    use crate::domain::retention::{BatchSummary, ClassificationError};

    #[tokio::test]
    async fn rows_keep_input_order_and_are_stored() {
        let provider = Arc::new(
            MockAIProvider::new()
                .with_response(
                    r#"{"offer_code":"PRICE_DISC_20","offer_name":"","match_reasoning":"price"}"#,
                )
                .with_response(r#"{"subject":"Stay","body":"Hey A,"}"#)
                .with_response(
                    r#"{"offer_code":"NO_MATCH","offer_name":"None","match_reasoning":"moving"}"#,
                ),
        );
        let store = Arc::new(InMemoryBatchStore::new());
        let handler = RunBatchHandler::new(
            provider,
            Arc::new(OfferCatalog::builtin()),
            store.clone(),
        );

        let batch = handler
            .handle(RunBatchCommand {
                requests: vec![
                    CancellationRequest::new("a@x.com", "too expensive"),
                    CancellationRequest::new("b@x.com", ""),
                    CancellationRequest::new("c@x.com", "moving abroad"),
                ],
            })
            .await
            .unwrap();

        let emails: Vec<_> = batch.rows().iter().map(|r| r.request.email()).collect();
        assert_eq!(emails, vec!["a@x.com", "b@x.com", "c@x.com"]);
        let rows: Vec<_> = batch.rows().iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![1, 2, 3]);

        assert!(batch.rows()[0].is_match());
        assert_eq!(
            batch.rows()[1].classification,
            Err(ClassificationError::EmptyReason)
        );
        assert!(batch.rows()[2].needs_manual_review());

        assert_eq!(
            batch.summary(),
            BatchSummary {
                total: 3,
                matched: 1,
                no_match: 1,
                failed: 1,
                sent: 0
            }
        );
        assert_eq!(store.load(batch.id()).await.unwrap(), batch);
    }

    #[tokio::test]
    async fn empty_batch_is_stored() {
        let store = Arc::new(InMemoryBatchStore::new());
        let handler = RunBatchHandler::new(
            Arc::new(MockAIProvider::new()),
            Arc::new(OfferCatalog::builtin()),
            store.clone(),
        );

        let batch = handler
            .handle(RunBatchCommand { requests: vec![] })
            .await
            .unwrap();

        assert!(batch.is_empty());
        assert_eq!(store.batch_count().await, 1);
    }
}
