//! HTTP adapter for the retention desk.
//!
//! Serves the browser UI and a small JSON API:
//! - `GET /` - Single-record form, batch upload and offer catalog
//! - `POST /batches` - Upload a cancellations CSV
//! - `GET /batches/:id` - Batch results with send, notify and export actions
//! - `POST /api/cancellations` - Process one record as JSON
//! - `GET /health` - Liveness and provider info

pub mod dto;
pub mod handlers;
pub mod pages;
pub mod routes;
pub mod ui;

pub use dto::*;
pub use handlers::{ApiError, RetentionAppState};
pub use routes::retention_router;
