//! Shared state and JSON API handlers for retention endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::retention::{
    BatchLocks, GetBatchHandler, GetBatchQuery, NotifyBatchReviewsHandler, NotifyTeamHandler,
    ProcessCancellationCommand, ProcessCancellationHandler, RunBatchHandler,
    SendBatchEmailsHandler, SendRetentionEmailHandler,
};
use crate::domain::foundation::BatchId;
use crate::domain::retention::OfferCatalog;
use crate::ports::{AIProvider, BatchStore, BatchStoreError, Mailer};

use super::dto::{
    BatchResponse, CancellationResultResponse, ErrorResponse, HealthResponse, OfferResponse,
    OffersResponse, ProcessCancellationRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct RetentionAppState {
    pub ai_provider: Arc<dyn AIProvider>,
    pub mailer: Arc<dyn Mailer>,
    pub batch_store: Arc<dyn BatchStore>,
    /// Serializes send-all passes per batch.
    pub batch_locks: BatchLocks,
    pub catalog: Arc<OfferCatalog>,
    /// Recipient of manual-review notifications.
    pub team_address: Option<String>,
}

impl RetentionAppState {
    /// Create handlers on demand from the shared state.
    pub fn process_cancellation_handler(&self) -> ProcessCancellationHandler {
        ProcessCancellationHandler::new(self.ai_provider.clone(), self.catalog.clone())
    }

    pub fn run_batch_handler(&self) -> RunBatchHandler {
        RunBatchHandler::new(
            self.ai_provider.clone(),
            self.catalog.clone(),
            self.batch_store.clone(),
        )
    }

    pub fn get_batch_handler(&self) -> GetBatchHandler {
        GetBatchHandler::new(self.batch_store.clone())
    }

    pub fn send_retention_email_handler(&self) -> SendRetentionEmailHandler {
        SendRetentionEmailHandler::new(self.mailer.clone())
    }

    pub fn send_batch_emails_handler(&self) -> SendBatchEmailsHandler {
        SendBatchEmailsHandler::new(
            self.mailer.clone(),
            self.batch_store.clone(),
            self.batch_locks.clone(),
        )
    }

    pub fn notify_team_handler(&self) -> NotifyTeamHandler {
        NotifyTeamHandler::new(self.mailer.clone(), self.team_address.clone())
    }

    pub fn notify_batch_reviews_handler(&self) -> NotifyBatchReviewsHandler {
        NotifyBatchReviewsHandler::new(
            self.mailer.clone(),
            self.team_address.clone(),
            self.batch_store.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /health
pub async fn health(State(state): State<RetentionAppState>) -> impl IntoResponse {
    let info = state.ai_provider.provider_info();
    Json(HealthResponse {
        status: "ok",
        provider: info.name,
        model: info.model,
        offers: state.catalog.len(),
    })
}

/// GET /api/offers - List the offer catalog
pub async fn list_offers(State(state): State<RetentionAppState>) -> impl IntoResponse {
    Json(OffersResponse {
        offers: state.catalog.offers().iter().map(OfferResponse::from).collect(),
    })
}

/// GET /api/batches/:id - Processed batch as JSON
pub async fn get_batch_json(
    State(state): State<RetentionAppState>,
    Path(batch_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let batch_id = parse_batch_id(&batch_id)?;
    let batch = state
        .get_batch_handler()
        .handle(GetBatchQuery { batch_id })
        .await?;

    Ok(Json(BatchResponse {
        batch_id: batch.id().to_string(),
        summary: batch.summary(),
        rows: batch
            .rows()
            .iter()
            .map(CancellationResultResponse::from)
            .collect(),
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/cancellations - Classify and draft for one record
///
/// Record-level failures are reported inside the 200 body; only a
/// malformed request is rejected.
pub async fn process_cancellation(
    State(state): State<RetentionAppState>,
    Json(request): Json<ProcessCancellationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.email.trim().is_empty() {
        return Err(ApiError::Validation("email is required".to_string()));
    }

    let result = state
        .process_cancellation_handler()
        .handle(ProcessCancellationCommand {
            row: 1,
            request: request.into(),
        })
        .await;

    Ok(Json(CancellationResultResponse::from(&result)))
}

pub(super) fn parse_batch_id(raw: &str) -> Result<BatchId, ApiError> {
    raw.parse::<BatchId>()
        .map_err(|_| ApiError::Validation("Invalid batch ID".to_string()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Store(BatchStoreError),
}

impl From<BatchStoreError> for ApiError {
    fn from(err: BatchStoreError) -> Self {
        Self::Store(err)
    }
}

impl ApiError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            ApiError::Store(BatchStoreError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "BATCH_NOT_FOUND")
            }
            ApiError::Store(BatchStoreError::Unavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_UNAVAILABLE")
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::Store(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(code, "Request failed: {}", self.message());
        }
        (status, Json(ErrorResponse::new(code, self.message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::from(BatchStoreError::NotFound(BatchId::new()));
        assert_eq!(err.status_and_code(), (StatusCode::NOT_FOUND, "BATCH_NOT_FOUND"));
    }

    #[test]
    fn invalid_batch_id_is_validation_error() {
        let err = parse_batch_id("not-a-uuid").unwrap_err();
        assert_eq!(err.status_and_code().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn error_response_has_code_and_message() {
        let response = ApiError::Validation("email is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
