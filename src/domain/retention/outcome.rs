//! Per-record pipeline results.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::{ClassificationError, CompositionError, SendError};
use super::request::CancellationRequest;
use crate::domain::foundation::ValidationError;

/// Offer code reported for records that went to manual review.
pub const NO_MATCH: &str = "NO_MATCH";

/// The classifier's verdict for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Customer id or email of the request this verdict belongs to.
    pub request_ref: String,
    /// Catalog id of the selected offer. Always present in the catalog.
    pub offer_id: String,
    pub offer_name: String,
    pub rationale: String,
}

/// A generated retention email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    subject: String,
    body: String,
}

impl EmailDraft {
    /// Creates a draft; subject and body must both contain text.
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Result<Self, ValidationError> {
        let subject = subject.into().trim().to_string();
        let body = body.into().trim().to_string();

        if subject.is_empty() {
            return Err(ValidationError::empty_field("subject"));
        }
        if body.is_empty() {
            return Err(ValidationError::empty_field("body"));
        }

        Ok(Self { subject, body })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Delivery state of a record's email.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SendStatus {
    #[default]
    NotSent,
    Sent,
    Failed { reason: String },
}

impl SendStatus {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendStatus::Sent)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SendStatus::NotSent => "not_sent",
            SendStatus::Sent => "sent",
            SendStatus::Failed { .. } => "failed",
        }
    }
}

impl From<Result<(), SendError>> for SendStatus {
    fn from(result: Result<(), SendError>) -> Self {
        match result {
            Ok(()) => SendStatus::Sent,
            Err(err) => SendStatus::Failed {
                reason: err.to_string(),
            },
        }
    }
}

/// Furthest point a record reached in `pending → classified → composed → sent/failed`.
///
/// A NO_MATCH verdict stops at `ManualReview` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStage {
    Pending,
    Classified,
    ManualReview,
    Composed,
    Sent,
    Failed,
}

impl fmt::Display for RecordStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordStage::Pending => "pending",
            RecordStage::Classified => "classified",
            RecordStage::ManualReview => "manual_review",
            RecordStage::Composed => "composed",
            RecordStage::Sent => "sent",
            RecordStage::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Everything the pipeline learned about one record.
///
/// Each stage that ran holds exactly one of its result or its error.
/// `composition` is `None` when classification failed and composing was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRowResult {
    /// One-based position in the input.
    pub row: usize,
    pub request: CancellationRequest,
    pub classification: Result<MatchResult, ClassificationError>,
    pub composition: Option<Result<EmailDraft, CompositionError>>,
    pub send_status: SendStatus,
}

impl BatchRowResult {
    /// A row whose classification failed; composition never ran.
    pub fn unclassified(row: usize, request: CancellationRequest, error: ClassificationError) -> Self {
        Self {
            row,
            request,
            classification: Err(error),
            composition: None,
            send_status: SendStatus::NotSent,
        }
    }

    /// A row that reached the composer, successfully or not.
    pub fn classified(
        row: usize,
        request: CancellationRequest,
        matched: MatchResult,
        composition: Result<EmailDraft, CompositionError>,
    ) -> Self {
        Self {
            row,
            request,
            classification: Ok(matched),
            composition: Some(composition),
            send_status: SendStatus::NotSent,
        }
    }

    pub fn match_result(&self) -> Option<&MatchResult> {
        self.classification.as_ref().ok()
    }

    pub fn draft(&self) -> Option<&EmailDraft> {
        match &self.composition {
            Some(Ok(draft)) => Some(draft),
            _ => None,
        }
    }

    /// True when an offer was selected and an email was drafted for it.
    pub fn is_match(&self) -> bool {
        self.draft().is_some()
    }

    /// True when the classifier explicitly found no fitting offer.
    pub fn needs_manual_review(&self) -> bool {
        matches!(&self.classification, Err(err) if err.is_no_match())
    }

    /// Offer code for display: the catalog id, `NO_MATCH`, or empty on other failures.
    pub fn offer_code(&self) -> &str {
        match &self.classification {
            Ok(matched) => &matched.offer_id,
            Err(err) if err.is_no_match() => NO_MATCH,
            Err(_) => "",
        }
    }

    pub fn offer_name(&self) -> &str {
        self.match_result()
            .map(|m| m.offer_name.as_str())
            .unwrap_or("")
    }

    /// Human-readable failure for the first stage that failed, if any.
    ///
    /// A no-match verdict is not reported as an error.
    pub fn error_message(&self) -> Option<String> {
        if let Err(err) = &self.classification {
            return (!err.is_no_match()).then(|| err.to_string());
        }
        if let Some(Err(err)) = &self.composition {
            return Some(err.to_string());
        }
        if let SendStatus::Failed { reason } = &self.send_status {
            return Some(reason.clone());
        }
        None
    }

    pub fn stage(&self) -> RecordStage {
        if let SendStatus::Failed { .. } = self.send_status {
            return RecordStage::Failed;
        }
        if self.send_status.is_sent() {
            return RecordStage::Sent;
        }
        match (&self.classification, &self.composition) {
            (Err(err), _) if err.is_no_match() => RecordStage::ManualReview,
            (Err(_), _) | (Ok(_), Some(Err(_))) => RecordStage::Failed,
            (Ok(_), Some(Ok(_))) => RecordStage::Composed,
            (Ok(_), None) => RecordStage::Classified,
        }
    }
}
