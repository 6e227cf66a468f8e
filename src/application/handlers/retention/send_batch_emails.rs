//! SendBatchEmailsHandler - sends every drafted, not-yet-sent row of a batch.

use std::sync::Arc;

use super::BatchLocks;
use crate::domain::foundation::BatchId;
use crate::domain::retention::{Batch, SendStatus};
use crate::ports::{BatchStore, BatchStoreError, Mailer, OutgoingEmail};

/// Command to send a batch's drafts.
#[derive(Debug, Clone)]
pub struct SendBatchEmailsCommand {
    pub batch_id: BatchId,
}

/// Outcome of a send-all pass.
#[derive(Debug, Clone)]
pub struct SendBatchEmailsResult {
    pub sent: usize,
    pub failed: usize,
    pub batch: Batch,
}

pub struct SendBatchEmailsHandler {
    mailer: Arc<dyn Mailer>,
    batch_store: Arc<dyn BatchStore>,
    locks: BatchLocks,
}

impl SendBatchEmailsHandler {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        batch_store: Arc<dyn BatchStore>,
        locks: BatchLocks,
    ) -> Self {
        Self {
            mailer,
            batch_store,
            locks,
        }
    }

    /// Rows already marked sent are skipped, so a second pass only retries failures.
    ///
    /// Passes over the same batch run one at a time; a pass that waited sees
    /// the statuses the previous one saved.
    pub async fn handle(
        &self,
        cmd: SendBatchEmailsCommand,
    ) -> Result<SendBatchEmailsResult, BatchStoreError> {
        let _guard = self.locks.acquire(cmd.batch_id).await;
        let mut batch = self.batch_store.load(cmd.batch_id).await?;
        let (mut sent, mut failed) = (0, 0);

        for row in batch.rows_mut() {
            if row.send_status.is_sent() {
                continue;
            }
            let Some(draft) = row.draft() else {
                continue;
            };

            let email = OutgoingEmail::from_draft(row.request.email(), draft);
            let status = SendStatus::from(self.mailer.send(&email).await);
            if status.is_sent() {
                sent += 1;
            } else {
                failed += 1;
            }
            row.send_status = status;
        }

        self.batch_store.save(&batch).await?;
        tracing::info!(batch_id = %cmd.batch_id, sent, failed, "Batch emails sent");

        Ok(SendBatchEmailsResult {
            sent,
            failed,
            batch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    use crate::adapters::email::StubMailer;
    use crate::adapters::storage::InMemoryBatchStore;
    use crate::domain::retention::{
        BatchRowResult, CancellationRequest, ClassificationError, EmailDraft, MatchResult,
        SendError,
    };

    /// Delivers through a stub after a delay, leaving time for a second pass to interleave.
    struct SlowMailer {
        inner: Arc<StubMailer>,
        delay: Duration,
    }

    #[async_trait]
    impl Mailer for SlowMailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), SendError> {
            tokio::time::sleep(self.delay).await;
            self.inner.send(email).await
        }
    }

    fn matched_row(row: usize, email: &str) -> BatchRowResult {
        BatchRowResult::classified(
            row,
            CancellationRequest::new(email, "price"),
            MatchResult {
                request_ref: email.to_string(),
                offer_id: "PRICE_DISC_20".into(),
                offer_name: "20% off".into(),
                rationale: "price".into(),
            },
            Ok(EmailDraft::new("Stay", format!("Hey {},", email)).unwrap()),
        )
    }

    async fn stored_batch(store: &InMemoryBatchStore) -> Batch {
        let batch = Batch::new(vec![
            matched_row(1, "a@x.com"),
            BatchRowResult::unclassified(
                2,
                CancellationRequest::new("b@x.com", "moving"),
                ClassificationError::NoMatch {
                    rationale: "none".into(),
                },
            ),
            matched_row(3, "bad-address"),
        ]);
        store.save(&batch).await.unwrap();
        batch
    }

    #[tokio::test]
    async fn sends_only_drafted_rows_and_records_status() {
        let store = Arc::new(InMemoryBatchStore::new());
        let batch = stored_batch(&store).await;
        let mailer = Arc::new(StubMailer::new());
        let handler = SendBatchEmailsHandler::new(mailer.clone(), store.clone(), BatchLocks::new());

        let result = handler
            .handle(SendBatchEmailsCommand {
                batch_id: batch.id(),
            })
            .await
            .unwrap();

        assert_eq!(result.sent, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(mailer.sent_count(), 1);

        let saved = store.load(batch.id()).await.unwrap();
        assert!(saved.rows()[0].send_status.is_sent());
        assert_eq!(saved.rows()[1].send_status, SendStatus::NotSent);
        assert!(matches!(
            saved.rows()[2].send_status,
            SendStatus::Failed { .. }
        ));
        assert_eq!(saved.summary().sent, 1);
    }

    #[tokio::test]
    async fn second_pass_skips_sent_rows() {
        let store = Arc::new(InMemoryBatchStore::new());
        let batch = stored_batch(&store).await;
        let mailer = Arc::new(StubMailer::new());
        let handler = SendBatchEmailsHandler::new(mailer.clone(), store, BatchLocks::new());
        let cmd = SendBatchEmailsCommand {
            batch_id: batch.id(),
        };

        handler.handle(cmd.clone()).await.unwrap();
        let second = handler.handle(cmd).await.unwrap();

        assert_eq!(second.sent, 0);
        assert_eq!(second.failed, 1);
        assert_eq!(mailer.sent_count(), 1);
    }

    #[tokio::test]
    async fn mail_failures_do_not_abort_the_pass() {
        let store = Arc::new(InMemoryBatchStore::new());
        let batch = stored_batch(&store).await;
        let mailer = Arc::new(StubMailer::failing(SendError::Authentication("535".into())));
        let handler = SendBatchEmailsHandler::new(mailer, store, BatchLocks::new());

        let result = handler
            .handle(SendBatchEmailsCommand {
                batch_id: batch.id(),
            })
            .await
            .unwrap();

        assert_eq!(result.sent, 0);
        assert_eq!(result.failed, 2);
    }

    #[tokio::test]
    async fn unknown_batch_is_not_found() {
        let handler = SendBatchEmailsHandler::new(
            Arc::new(StubMailer::new()),
            Arc::new(InMemoryBatchStore::new()),
            BatchLocks::new(),
        );

        let result = handler
            .handle(SendBatchEmailsCommand {
                batch_id: BatchId::new(),
            })
            .await;

        assert!(matches!(result, Err(BatchStoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn concurrent_passes_deliver_each_draft_once() {
        let store = Arc::new(InMemoryBatchStore::new());
        let batch = Batch::new(vec![matched_row(1, "a@x.com")]);
        store.save(&batch).await.unwrap();
        let stub = Arc::new(StubMailer::new());
        let mailer = Arc::new(SlowMailer {
            inner: stub.clone(),
            delay: Duration::from_millis(50),
        });
        let locks = BatchLocks::new();
        let first = SendBatchEmailsHandler::new(mailer.clone(), store.clone(), locks.clone());
        let second = SendBatchEmailsHandler::new(mailer, store.clone(), locks);
        let cmd = SendBatchEmailsCommand {
            batch_id: batch.id(),
        };

        let (a, b) = tokio::join!(first.handle(cmd.clone()), second.handle(cmd));

        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(a.sent + b.sent, 1);
        assert_eq!(a.failed + b.failed, 0);
        assert_eq!(stub.sent_count(), 1);
        assert_eq!(store.load(batch.id()).await.unwrap().summary().sent, 1);
    }
}
