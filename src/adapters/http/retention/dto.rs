//! Request and response DTOs for retention endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::retention::{BatchRowResult, BatchSummary, CancellationRequest, Offer, RecordStage};

// ════════════════════════════════════════════════════════════════════════════════
// JSON requests
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/cancellations body.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessCancellationRequest {
    pub email: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub date_cancelled: Option<NaiveDate>,
}

impl From<ProcessCancellationRequest> for CancellationRequest {
    fn from(req: ProcessCancellationRequest) -> Self {
        let mut request = CancellationRequest::new(req.email, req.reason);
        if let Some(id) = req.customer_id {
            request = request.with_customer_id(id);
        }
        if let Some(date) = req.date_cancelled {
            request = request.with_date_cancelled(date);
        }
        request
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// HTML form bodies
// ════════════════════════════════════════════════════════════════════════════════

/// Single-record form. Browsers send empty strings for untouched inputs.
#[derive(Debug, Clone, Deserialize)]
pub struct CancellationForm {
    pub email: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub date_cancelled: String,
}

impl CancellationForm {
    pub fn into_request(self) -> CancellationRequest {
        let request =
            CancellationRequest::new(self.email, self.reason).with_customer_id(self.customer_id);
        match parse_form_date(&self.date_cancelled) {
            Some(date) => request.with_date_cancelled(date),
            None => request,
        }
    }
}

/// Reviewed draft posted back for sending.
#[derive(Debug, Clone, Deserialize)]
pub struct SendDraftForm {
    pub email: String,
    pub subject: String,
    pub body: String,
}

/// Manual-review request for one record.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyForm {
    pub email: String,
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub date_cancelled: String,
}

impl NotifyForm {
    pub fn into_request(self) -> CancellationRequest {
        let request = CancellationRequest::new(self.email, "").with_customer_id(self.customer_id);
        match parse_form_date(&self.date_cancelled) {
            Some(date) => request.with_date_cancelled(date),
            None => request,
        }
    }
}

/// Outcome counts carried on the redirect back to a batch page.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct BatchNotice {
    pub sent: Option<usize>,
    pub send_failed: Option<usize>,
    pub notified: Option<usize>,
    pub notify_failed: Option<usize>,
    pub error: Option<String>,
}

fn parse_form_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

// ════════════════════════════════════════════════════════════════════════════════
// JSON responses
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct OfferResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub target_reasons: Vec<String>,
}

impl From<&Offer> for OfferResponse {
    fn from(offer: &Offer) -> Self {
        Self {
            id: offer.id.clone(),
            name: offer.name.clone(),
            description: offer.description.clone(),
            target_reasons: offer.target_reasons.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OffersResponse {
    pub offers: Vec<OfferResponse>,
}

/// One processed record.
#[derive(Debug, Clone, Serialize)]
pub struct CancellationResultResponse {
    pub customer_id: Option<String>,
    pub email: String,
    pub date_cancelled: Option<NaiveDate>,
    pub stage: RecordStage,
    pub match_found: bool,
    pub needs_manual_review: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_reasoning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl From<&BatchRowResult> for CancellationResultResponse {
    fn from(row: &BatchRowResult) -> Self {
        let request = &row.request;
        let matched = row.match_result();
        let draft = row.draft();

        let match_reasoning = match &row.classification {
            Ok(m) => Some(m.rationale.clone()),
            Err(crate::domain::retention::ClassificationError::NoMatch { rationale }) => {
                Some(rationale.clone())
            }
            Err(_) => None,
        };

        let error = match (&row.classification, &row.composition) {
            (Err(err), _) if !err.is_no_match() => {
                Some(ErrorResponse::new(err.code(), err.to_string()))
            }
            (Ok(_), Some(Err(err))) => Some(ErrorResponse::new(err.code(), err.to_string())),
            _ => None,
        };

        Self {
            customer_id: request.customer_id().map(String::from),
            email: request.email().to_string(),
            date_cancelled: request.date_cancelled(),
            stage: row.stage(),
            match_found: row.is_match(),
            needs_manual_review: row.needs_manual_review(),
            offer_code: (!row.offer_code().is_empty()).then(|| row.offer_code().to_string()),
            offer_name: matched.map(|m| m.offer_name.clone()),
            match_reasoning,
            email_subject: draft.map(|d| d.subject().to_string()),
            email_body: draft.map(|d| d.body().to_string()),
            error,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub batch_id: String,
    pub summary: BatchSummary,
    pub rows: Vec<CancellationResultResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub provider: String,
    pub model: String,
    pub offers: usize,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
