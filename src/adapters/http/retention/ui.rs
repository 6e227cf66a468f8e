//! Browser-facing handlers: HTML forms, batch upload and CSV download.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use crate::adapters::csv::{parse_cancellations, write_results, CsvError};
use crate::application::handlers::retention::{
    GetBatchQuery, NotifyBatchReviewsCommand, NotifyTeamCommand, ProcessCancellationCommand,
    RunBatchCommand, SendBatchEmailsCommand, SendRetentionEmailCommand,
};
use crate::domain::retention::EmailDraft;
use crate::ports::BatchStoreError;

use super::dto::{BatchNotice, CancellationForm, NotifyForm, SendDraftForm};
use super::handlers::{parse_batch_id, ApiError, RetentionAppState};
use super::pages;

/// Name of the multipart field carrying the uploaded CSV.
pub const UPLOAD_FIELD: &str = "file";

// ════════════════════════════════════════════════════════════════════════════════
// Single record
// ════════════════════════════════════════════════════════════════════════════════

/// GET /
pub async fn index(State(state): State<RetentionAppState>) -> Html<String> {
    Html(pages::index_page(&state.catalog))
}

/// POST /cancellations
pub async fn submit_cancellation(
    State(state): State<RetentionAppState>,
    Form(form): Form<CancellationForm>,
) -> Result<Html<String>, PageError> {
    if form.email.trim().is_empty() {
        return Err(PageError::bad_request("Customer email is required."));
    }

    let result = state
        .process_cancellation_handler()
        .handle(ProcessCancellationCommand {
            row: 1,
            request: form.into_request(),
        })
        .await;

    Ok(Html(pages::cancellation_result_page(&result)))
}

/// POST /cancellations/send - send the (possibly edited) draft
pub async fn send_draft(
    State(state): State<RetentionAppState>,
    Form(form): Form<SendDraftForm>,
) -> Result<Html<String>, PageError> {
    let draft = EmailDraft::new(form.subject, form.body)
        .map_err(|err| PageError::bad_request(err.to_string()))?;

    let outcome = state
        .send_retention_email_handler()
        .handle(SendRetentionEmailCommand {
            to: form.email.clone(),
            draft,
        })
        .await;

    Ok(Html(pages::delivery_page(
        "Retention email",
        &form.email,
        &outcome,
    )))
}

/// POST /cancellations/notify - ask the team to review one record
pub async fn notify_review(
    State(state): State<RetentionAppState>,
    Form(form): Form<NotifyForm>,
) -> Html<String> {
    let recipient = state
        .team_address
        .clone()
        .unwrap_or_else(|| "the retention team".to_string());

    let outcome = state
        .notify_team_handler()
        .handle(NotifyTeamCommand {
            request: form.into_request(),
        })
        .await;

    Html(pages::delivery_page("Manual review", &recipient, &outcome))
}

// ════════════════════════════════════════════════════════════════════════════════
// Batches
// ════════════════════════════════════════════════════════════════════════════════

/// POST /batches - multipart CSV upload
///
/// Redirects to the batch page so a refresh does not reprocess the file.
pub async fn upload_batch(
    State(state): State<RetentionAppState>,
    mut multipart: Multipart,
) -> Result<Redirect, PageError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| PageError::bad_request(format!("Could not read upload: {}", err)))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|err| PageError::bad_request(format!("Could not read upload: {}", err)))?;
            upload = Some(bytes);
            break;
        }
    }

    let bytes = upload.ok_or_else(|| PageError::bad_request("No CSV file was uploaded."))?;
    let requests = parse_cancellations(&bytes).map_err(PageError::from)?;
    if requests.is_empty() {
        return Err(PageError::bad_request("The uploaded CSV has no data rows."));
    }

    tracing::info!(rows = requests.len(), "Processing uploaded batch");

    let batch = state
        .run_batch_handler()
        .handle(RunBatchCommand { requests })
        .await
        .map_err(PageError::from)?;

    Ok(Redirect::to(&format!("/batches/{}", batch.id())))
}

/// GET /batches/:id
pub async fn show_batch(
    State(state): State<RetentionAppState>,
    Path(batch_id): Path<String>,
    Query(notice): Query<BatchNotice>,
) -> Result<Html<String>, PageError> {
    let batch_id = parse_batch_id(&batch_id)?;
    let batch = state
        .get_batch_handler()
        .handle(GetBatchQuery { batch_id })
        .await?;

    Ok(Html(pages::batch_page(&batch, &notice)))
}

/// POST /batches/:id/send - send every unsent draft
pub async fn send_batch(
    State(state): State<RetentionAppState>,
    Path(batch_id): Path<String>,
) -> Result<Redirect, PageError> {
    let batch_id = parse_batch_id(&batch_id)?;
    let result = state
        .send_batch_emails_handler()
        .handle(SendBatchEmailsCommand { batch_id })
        .await?;

    Ok(Redirect::to(&format!(
        "/batches/{}?sent={}&send_failed={}",
        batch_id, result.sent, result.failed
    )))
}

/// POST /batches/:id/notify - one manual-review email per no-match row
pub async fn notify_batch(
    State(state): State<RetentionAppState>,
    Path(batch_id): Path<String>,
) -> Result<Redirect, PageError> {
    let batch_id = parse_batch_id(&batch_id)?;
    let result = state
        .notify_batch_reviews_handler()
        .handle(NotifyBatchReviewsCommand { batch_id })
        .await?;

    let mut location = format!(
        "/batches/{}?notified={}&notify_failed={}",
        batch_id, result.notified, result.failed
    );
    if let Some(err) = &result.first_error {
        location.push_str("&error=");
        location.push_str(err.code());
    }

    Ok(Redirect::to(&location))
}

/// GET /batches/:id/export.csv
pub async fn export_batch(
    State(state): State<RetentionAppState>,
    Path(batch_id): Path<String>,
) -> Result<Response, PageError> {
    let batch_id = parse_batch_id(&batch_id)?;
    let batch = state
        .get_batch_handler()
        .handle(GetBatchQuery { batch_id })
        .await?;

    let csv = write_results(batch.rows())?;
    let disposition = format!("attachment; filename=\"{}\"", batch.export_filename());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Failure rendered as an HTML error page.
#[derive(Debug)]
pub struct PageError {
    status: StatusCode,
    message: String,
}

impl PageError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ApiError> for PageError {
    fn from(err: ApiError) -> Self {
        let (status, _) = err.status_and_code();
        Self::new(status, err.message())
    }
}

impl From<BatchStoreError> for PageError {
    fn from(err: BatchStoreError) -> Self {
        ApiError::from(err).into()
    }
}

impl From<CsvError> for PageError {
    fn from(err: CsvError) -> Self {
        match err {
            CsvError::MissingColumns(columns) => Self::bad_request(format!(
                "The CSV is missing required column(s): {}",
                columns.join(", ")
            )),
            CsvError::Malformed(err) => Self::bad_request(format!("Could not parse the CSV: {}", err)),
            CsvError::Write(msg) => {
                tracing::error!("Failed to render CSV export: {}", msg);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Could not build the CSV export.")
            }
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let title = if self.status.is_client_error() {
            "Request problem"
        } else {
            "Something went wrong"
        };
        (self.status, Html(pages::error_page(title, &self.message))).into_response()
    }
}
