//! Manual-review notifications for cancellations no offer could address.

use std::sync::Arc;

use crate::domain::foundation::BatchId;
use crate::domain::retention::prompts::{manual_review_body, MANUAL_REVIEW_SUBJECT};
use crate::domain::retention::{CancellationRequest, SendError};
use crate::ports::{BatchStore, BatchStoreError, Mailer, OutgoingEmail};

/// Command to flag one cancellation for manual review.
#[derive(Debug, Clone)]
pub struct NotifyTeamCommand {
    pub request: CancellationRequest,
}

/// Emails the team address about a single unmatched cancellation.
pub struct NotifyTeamHandler {
    mailer: Arc<dyn Mailer>,
    team_address: Option<String>,
}

impl NotifyTeamHandler {
    pub fn new(mailer: Arc<dyn Mailer>, team_address: Option<String>) -> Self {
        Self {
            mailer,
            team_address,
        }
    }

    pub async fn handle(&self, cmd: NotifyTeamCommand) -> Result<(), SendError> {
        let to = self.team_address.as_deref().ok_or_else(|| {
            SendError::Configuration("no team address configured for manual review".to_string())
        })?;

        let request = &cmd.request;
        let body = manual_review_body(
            request.customer_id(),
            request.email(),
            request.date_cancelled(),
        );

        self.mailer
            .send(&OutgoingEmail::new(to, MANUAL_REVIEW_SUBJECT, body))
            .await?;

        tracing::info!(reference = %request.reference(), "Manual review requested");
        Ok(())
    }
}

/// Command to flag every no-match row of a batch.
#[derive(Debug, Clone)]
pub struct NotifyBatchReviewsCommand {
    pub batch_id: BatchId,
}

/// Outcome of a batch notification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyBatchReviewsResult {
    pub notified: usize,
    pub failed: usize,
    /// First failure, for display.
    pub first_error: Option<SendError>,
}

pub struct NotifyBatchReviewsHandler {
    notifier: NotifyTeamHandler,
    batch_store: Arc<dyn BatchStore>,
}

impl NotifyBatchReviewsHandler {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        team_address: Option<String>,
        batch_store: Arc<dyn BatchStore>,
    ) -> Self {
        Self {
            notifier: NotifyTeamHandler::new(mailer, team_address),
            batch_store,
        }
    }

    pub async fn handle(
        &self,
        cmd: NotifyBatchReviewsCommand,
    ) -> Result<NotifyBatchReviewsResult, BatchStoreError> {
        let batch = self.batch_store.load(cmd.batch_id).await?;
        let mut result = NotifyBatchReviewsResult::default();

        for row in batch.review_rows() {
            let outcome = self
                .notifier
                .handle(NotifyTeamCommand {
                    request: row.request.clone(),
                })
                .await;
            match outcome {
                Ok(()) => result.notified += 1,
                Err(err) => {
                    tracing::warn!(batch_id = %cmd.batch_id, row = row.row, "Review notification failed: {}", err);
                    result.failed += 1;
                    result.first_error.get_or_insert(err);
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::email::StubMailer;
    use crate::adapters::storage::InMemoryBatchStore;
    use crate::domain::retention::{Batch, BatchRowResult, ClassificationError};
    use chrono::NaiveDate;

    fn no_match(row: usize, email: &str) -> BatchRowResult {
        BatchRowResult::unclassified(
            row,
            CancellationRequest::new(email, "moving abroad")
                .with_customer_id(format!("CUST-{:03}", row)),
            ClassificationError::NoMatch {
                rationale: "no offer fits".into(),
            },
        )
    }

    #[tokio::test]
    async fn notification_lists_customer_details() {
        let mailer = Arc::new(StubMailer::new());
        let handler = NotifyTeamHandler::new(mailer.clone(), Some("team@x.com".to_string()));
        let request = CancellationRequest::new("a@x.com", "moving")
            .with_customer_id("CUST-042")
            .with_date_cancelled(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        handler.handle(NotifyTeamCommand { request }).await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent[0].to, "team@x.com");
        assert_eq!(sent[0].subject, MANUAL_REVIEW_SUBJECT);
        assert!(sent[0].body.contains("Customer ID: CUST-042"));
        assert!(sent[0].body.contains("Email: a@x.com"));
        assert!(sent[0].body.contains("Date Cancelled: 2024-03-01"));
    }

    #[tokio::test]
    async fn missing_team_address_is_configuration_error() {
        let mailer = Arc::new(StubMailer::new());
        let handler = NotifyTeamHandler::new(mailer.clone(), None);

        let result = handler
            .handle(NotifyTeamCommand {
                request: CancellationRequest::new("a@x.com", "moving"),
            })
            .await;

        assert!(matches!(result, Err(SendError::Configuration(_))));
        assert_eq!(mailer.sent_count(), 0);
    }

    #[tokio::test]
    async fn batch_pass_notifies_only_review_rows() {
        let store = Arc::new(InMemoryBatchStore::new());
        let batch = Batch::new(vec![
            no_match(1, "a@x.com"),
            BatchRowResult::unclassified(
                2,
                CancellationRequest::new("b@x.com", ""),
                ClassificationError::EmptyReason,
            ),
            no_match(3, "c@x.com"),
        ]);
        store.save(&batch).await.unwrap();
        let mailer = Arc::new(StubMailer::new());
        let handler =
            NotifyBatchReviewsHandler::new(mailer.clone(), Some("team@x.com".into()), store);

        let result = handler
            .handle(NotifyBatchReviewsCommand {
                batch_id: batch.id(),
            })
            .await
            .unwrap();

        assert_eq!(result.notified, 2);
        assert_eq!(result.failed, 0);
        let bodies: Vec<_> = mailer.sent().into_iter().map(|m| m.body).collect();
        assert!(bodies[0].contains("CUST-001"));
        assert!(bodies[1].contains("CUST-003"));
    }

    #[tokio::test]
    async fn batch_pass_counts_failures() {
        let store = Arc::new(InMemoryBatchStore::new());
        let batch = Batch::new(vec![no_match(1, "a@x.com")]);
        store.save(&batch).await.unwrap();
        let handler = NotifyBatchReviewsHandler::new(
            Arc::new(StubMailer::failing(SendError::Connection("refused".into()))),
            Some("team@x.com".into()),
            store,
        );

        let result = handler
            .handle(NotifyBatchReviewsCommand {
                batch_id: batch.id(),
            })
            .await
            .unwrap();

        assert_eq!(result.notified, 0);
        assert_eq!(result.failed, 1);
        assert_eq!(
            result.first_error,
            Some(SendError::Connection("refused".into()))
        );
    }
}
