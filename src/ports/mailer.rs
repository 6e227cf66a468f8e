//! Mailer Port - Interface for outbound email delivery.

use async_trait::async_trait;

use crate::domain::retention::{EmailDraft, SendError};

/// A single plain-text email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingEmail {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into().trim().to_string(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Addresses a generated draft to a customer.
    pub fn from_draft(to: impl Into<String>, draft: &EmailDraft) -> Self {
        Self::new(to, draft.subject(), draft.body())
    }
}

/// Port for sending email.
///
/// Implementations send exactly one message per call and never retry.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), SendError>;
}
