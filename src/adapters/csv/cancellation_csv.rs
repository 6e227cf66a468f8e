//! Cancellation CSV codec.
//!
//! Input columns are matched by exact (trimmed) header name:
//! `Email` and `Cancellation Reason` are required, `Customer ID` and
//! `Date Cancelled` are optional. Output has one line per batch row, in
//! batch order.

use chrono::NaiveDate;

use crate::domain::retention::{BatchRowResult, CancellationRequest};

pub const COL_EMAIL: &str = "Email";
pub const COL_REASON: &str = "Cancellation Reason";
pub const COL_CUSTOMER_ID: &str = "Customer ID";
pub const COL_DATE_CANCELLED: &str = "Date Cancelled";

pub const REQUIRED_COLUMNS: [&str; 2] = [COL_EMAIL, COL_REASON];

pub const OUTPUT_COLUMNS: [&str; 11] = [
    COL_CUSTOMER_ID,
    COL_EMAIL,
    COL_DATE_CANCELLED,
    COL_REASON,
    "Offer Code",
    "Offer Name",
    "Match Found",
    "Email Subject",
    "Email Body",
    "Send Status",
    "Error",
];

/// Errors reading or writing cancellation CSV files
#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("CSV is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Malformed CSV: {0}")]
    Malformed(#[from] csv::Error),

    #[error("Failed to write CSV: {0}")]
    Write(String),
}

/// Parses an uploaded CSV into cancellation requests, preserving row order.
///
/// Blank customer ids become `CUST-NNN` (1-based row number). Dates that are
/// not `YYYY-MM-DD` are dropped.
pub fn parse_cancellations(bytes: &[u8]) -> Result<Vec<CancellationRequest>, CsvError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|&name| column(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(CsvError::MissingColumns(missing));
    }

    let email_idx = column(COL_EMAIL);
    let reason_idx = column(COL_REASON);
    let customer_idx = column(COL_CUSTOMER_ID);
    let date_idx = column(COL_DATE_CANCELLED);

    let mut requests = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let field = |i: Option<usize>| i.and_then(|i| record.get(i)).unwrap_or("");

        let customer_id = match field(customer_idx) {
            "" => format!("CUST-{:03}", idx + 1),
            id => id.to_string(),
        };

        let mut request = CancellationRequest::new(field(email_idx), field(reason_idx))
            .with_customer_id(customer_id);

        let raw_date = field(date_idx);
        if !raw_date.is_empty() {
            match NaiveDate::parse_from_str(raw_date, "%Y-%m-%d") {
                Ok(date) => request = request.with_date_cancelled(date),
                Err(_) => tracing::debug!(row = idx + 1, raw_date, "Ignoring unparseable cancellation date"),
            }
        }

        requests.push(request);
    }

    Ok(requests)
}

/// Writes batch results with the export column layout.
pub fn write_results(rows: &[BatchRowResult]) -> Result<String, CsvError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(OUTPUT_COLUMNS)?;

    for row in rows {
        let request = &row.request;
        let date = request
            .date_cancelled()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let (subject, body) = row
            .draft()
            .map(|draft| (draft.subject(), draft.body()))
            .unwrap_or(("", ""));

        writer.write_record([
            request.customer_id().unwrap_or(""),
            request.email(),
            date.as_str(),
            request.reason(),
            row.offer_code(),
            row.offer_name(),
            if row.is_match() { "Yes" } else { "No" },
            subject,
            body,
            row.send_status.label(),
            row.error_message().as_deref().unwrap_or(""),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CsvError::Write(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CsvError::Write(e.to_string()))
}
