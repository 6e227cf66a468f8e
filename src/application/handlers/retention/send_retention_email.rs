//! SendRetentionEmailHandler - delivers one reviewed draft.

use std::sync::Arc;

use crate::domain::retention::{EmailDraft, SendError};
use crate::ports::{Mailer, OutgoingEmail};

/// Command to send a draft to a customer.
#[derive(Debug, Clone)]
pub struct SendRetentionEmailCommand {
    pub to: String,
    pub draft: EmailDraft,
}

pub struct SendRetentionEmailHandler {
    mailer: Arc<dyn Mailer>,
}

impl SendRetentionEmailHandler {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    pub async fn handle(&self, cmd: SendRetentionEmailCommand) -> Result<(), SendError> {
        let email = OutgoingEmail::from_draft(cmd.to, &cmd.draft);
        self.mailer.send(&email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::email::StubMailer;

    #[tokio::test]
    async fn well_formed_draft_is_sent() {
        let mailer = Arc::new(StubMailer::new());
        let handler = SendRetentionEmailHandler::new(mailer.clone());

        let result = handler
            .handle(SendRetentionEmailCommand {
                to: "a@x.com".to_string(),
                draft: EmailDraft::new("Stay", "Hey A,").unwrap(),
            })
            .await;

        assert_eq!(result, Ok(()));
        assert_eq!(mailer.sent()[0].to, "a@x.com");
        assert_eq!(mailer.sent()[0].body, "Hey A,");
    }

    #[tokio::test]
    async fn mailer_error_is_returned() {
        let mailer = Arc::new(StubMailer::failing(SendError::Connection("refused".into())));
        let handler = SendRetentionEmailHandler::new(mailer);

        let result = handler
            .handle(SendRetentionEmailCommand {
                to: "a@x.com".to_string(),
                draft: EmailDraft::new("Stay", "Hey A,").unwrap(),
            })
            .await;

        assert_eq!(result, Err(SendError::Connection("refused".into())));
    }
}
