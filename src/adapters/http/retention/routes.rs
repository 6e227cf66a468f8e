//! Axum router configuration for retention endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_batch_json, health, list_offers, process_cancellation, RetentionAppState};
use super::ui::{
    export_batch, index, notify_batch, notify_review, send_batch, send_draft, show_batch,
    submit_cancellation, upload_batch,
};

/// Create the JSON API router.
///
/// # Routes
/// - `GET /offers` - List the offer catalog
/// - `POST /cancellations` - Classify and draft for one record
/// - `GET /batches/:id` - Processed batch as JSON
pub fn api_routes() -> Router<RetentionAppState> {
    Router::new()
        .route("/offers", get(list_offers))
        .route("/cancellations", post(process_cancellation))
        .route("/batches/:id", get(get_batch_json))
}

/// Create the browser UI router.
///
/// # Routes
/// - `GET /` - Single-record form, batch upload, offer catalog
/// - `POST /cancellations` - Process one record, show the editable draft
/// - `POST /cancellations/send` - Send a reviewed draft
/// - `POST /cancellations/notify` - Ask the team to review one record
/// - `POST /batches` - Upload and process a CSV
/// - `GET /batches/:id` - Batch results
/// - `POST /batches/:id/send` - Send all unsent drafts
/// - `POST /batches/:id/notify` - Notify the team about no-match rows
/// - `GET /batches/:id/export.csv` - Download results
pub fn ui_routes() -> Router<RetentionAppState> {
    Router::new()
        .route("/", get(index))
        .route("/cancellations", post(submit_cancellation))
        .route("/cancellations/send", post(send_draft))
        .route("/cancellations/notify", post(notify_review))
        .route("/batches", post(upload_batch))
        .route("/batches/:id", get(show_batch))
        .route("/batches/:id/send", post(send_batch))
        .route("/batches/:id/notify", post(notify_batch))
        .route("/batches/:id/export.csv", get(export_batch))
}

/// Create the complete retention router: UI at the root, JSON under `/api`.
pub fn retention_router() -> Router<RetentionAppState> {
    Router::new()
        .route("/health", get(health))
        .merge(ui_routes())
        .nest("/api", api_routes())
}
