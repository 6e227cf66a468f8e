//! Retention pipeline command and query handlers.

mod batch_locks;
mod classify_reason;
mod compose_email;
mod get_batch;
mod notify_team;
mod process_cancellation;
mod run_batch;
mod send_batch_emails;
mod send_retention_email;

pub use batch_locks::BatchLocks;
pub use classify_reason::{ClassifyReasonCommand, ClassifyReasonHandler};
pub use compose_email::{ComposeEmailCommand, ComposeEmailHandler};
pub use get_batch::{GetBatchHandler, GetBatchQuery};
pub use notify_team::{
    NotifyBatchReviewsCommand, NotifyBatchReviewsHandler, NotifyBatchReviewsResult,
    NotifyTeamCommand, NotifyTeamHandler,
};
pub use process_cancellation::{ProcessCancellationCommand, ProcessCancellationHandler};
pub use run_batch::{RunBatchCommand, RunBatchHandler};
pub use send_batch_emails::{
    SendBatchEmailsCommand, SendBatchEmailsHandler, SendBatchEmailsResult,
};
pub use send_retention_email::{SendRetentionEmailCommand, SendRetentionEmailHandler};
