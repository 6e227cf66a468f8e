//! HTTP adapters - browser UI and REST API.
//!
//! [`app_router`] assembles the retention routes with the cross-cutting
//! layers every request passes through.

pub mod retention;

use std::time::Duration;

use axum::{extract::DefaultBodyLimit, Router};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

// Re-export key types for convenience
pub use retention::retention_router;
pub use retention::RetentionAppState;

/// Build the complete application with state and middleware attached.
///
/// Batch processing calls the model twice per row, so `request_timeout`
/// has to cover the largest batch the desk is expected to handle.
pub fn app_router(
    state: RetentionAppState,
    request_timeout: Duration,
    max_upload_bytes: usize,
) -> Router {
    retention_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state)
}
