//! In-process Mailer implementations that never touch the network.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domain::retention::SendError;
use crate::ports::{Mailer, OutgoingEmail};

/// Records every accepted message. Optionally fails every send.
#[derive(Debug, Clone, Default)]
pub struct StubMailer {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    failure: Option<SendError>,
}

impl StubMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send returns `error`.
    pub fn failing(error: SendError) -> Self {
        Self {
            sent: Arc::default(),
            failure: Some(error),
        }
    }

    /// Messages accepted so far, in send order.
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for StubMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), SendError> {
        if !email.to.contains('@') {
            return Err(SendError::InvalidAddress(email.to.clone()));
        }
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Stands in for SMTP when no sender is configured.
#[derive(Debug, Clone)]
pub struct UnconfiguredMailer {
    reason: String,
}

impl UnconfiguredMailer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Mailer for UnconfiguredMailer {
    async fn send(&self, _email: &OutgoingEmail) -> Result<(), SendError> {
        Err(SendError::Configuration(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::retention::EmailDraft;

    #[tokio::test]
    async fn stub_records_sent_mail() {
        let mailer = StubMailer::new();
        let draft = EmailDraft::new("Stay", "Hey Jane,").unwrap();

        mailer
            .send(&OutgoingEmail::from_draft("jane@x.com", &draft))
            .await
            .unwrap();

        assert_eq!(mailer.sent_count(), 1);
        assert_eq!(mailer.sent()[0].to, "jane@x.com");
        assert_eq!(mailer.sent()[0].subject, "Stay");
    }

    #[tokio::test]
    async fn stub_rejects_address_without_at_sign() {
        let mailer = StubMailer::new();
        let result = mailer.send(&OutgoingEmail::new("jane", "s", "b")).await;
        assert_eq!(result, Err(SendError::InvalidAddress("jane".to_string())));
        assert_eq!(mailer.sent_count(), 0);
    }

    #[tokio::test]
    async fn failing_stub_returns_its_error() {
        let mailer = StubMailer::failing(SendError::Authentication("535".to_string()));
        let result = mailer.send(&OutgoingEmail::new("a@x.com", "s", "b")).await;
        assert!(matches!(result, Err(SendError::Authentication(_))));
        assert_eq!(mailer.sent_count(), 0);
    }

    #[tokio::test]
    async fn unconfigured_mailer_always_refuses() {
        let mailer = UnconfiguredMailer::new("set RETENTION__SMTP__SENDER_EMAIL");
        let result = mailer.send(&OutgoingEmail::new("a@x.com", "s", "b")).await;
        assert_eq!(
            result,
            Err(SendError::Configuration(
                "set RETENTION__SMTP__SENDER_EMAIL".to_string()
            ))
        );
    }
}
