//! Record-level failures for the retention pipeline.
//!
//! None of these abort a batch. They are stored on the row they belong to
//! and surfaced in the UI and the exported CSV.

use thiserror::Error;

/// The classifier could not produce a usable catalog offer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    #[error("cancellation reason is empty")]
    EmptyReason,

    #[error("no retention offer fits this reason: {rationale}")]
    NoMatch { rationale: String },

    #[error("model selected offer '{offer_id}', which is not in the catalog")]
    UnknownOffer { offer_id: String },

    #[error("classifier response could not be parsed: {0}")]
    Malformed(String),

    #[error("AI provider error: {0}")]
    Provider(String),
}

impl ClassificationError {
    pub fn code(&self) -> &'static str {
        match self {
            ClassificationError::EmptyReason => "EMPTY_REASON",
            ClassificationError::NoMatch { .. } => "NO_MATCH",
            ClassificationError::UnknownOffer { .. } => "UNKNOWN_OFFER",
            ClassificationError::Malformed(_) => "MALFORMED_CLASSIFICATION",
            ClassificationError::Provider(_) => "AI_PROVIDER_ERROR",
        }
    }

    /// NO_MATCH is a verdict rather than a fault; it routes the record to manual review.
    pub fn is_no_match(&self) -> bool {
        matches!(self, ClassificationError::NoMatch { .. })
    }
}

/// The composer could not produce a usable email draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    #[error("model declined to write an email for this offer")]
    Declined,

    #[error("generated email body is empty")]
    EmptyBody,

    #[error("composer response could not be parsed: {0}")]
    Malformed(String),

    #[error("AI provider error: {0}")]
    Provider(String),
}

impl CompositionError {
    pub fn code(&self) -> &'static str {
        match self {
            CompositionError::Declined => "COMPOSITION_DECLINED",
            CompositionError::EmptyBody => "EMPTY_BODY",
            CompositionError::Malformed(_) => "MALFORMED_COMPOSITION",
            CompositionError::Provider(_) => "AI_PROVIDER_ERROR",
        }
    }
}

/// An email could not be handed to the SMTP relay.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("mail is not configured: {0}")]
    Configuration(String),

    #[error("SMTP authentication failed: {0}")]
    Authentication(String),

    #[error("could not reach SMTP server: {0}")]
    Connection(String),

    #[error("SMTP server rejected the message: {0}")]
    Rejected(String),
}

impl SendError {
    pub fn code(&self) -> &'static str {
        match self {
            SendError::InvalidAddress(_) => "INVALID_ADDRESS",
            SendError::Configuration(_) => "MAIL_NOT_CONFIGURED",
            SendError::Authentication(_) => "SMTP_AUTH_FAILED",
            SendError::Connection(_) => "SMTP_UNREACHABLE",
            SendError::Rejected(_) => "SMTP_REJECTED",
        }
    }
}
