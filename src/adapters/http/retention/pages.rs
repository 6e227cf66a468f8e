//! Server-rendered HTML for the retention desk UI.
//!
//! Pages are plain `format!` templates. Every value that originates from a
//! user, a CSV file or the model goes through [`html_escape`].

use std::fmt::Write as _;

use crate::domain::retention::{
    Batch, BatchRowResult, BatchSummary, ClassificationError, OfferCatalog, SendError, NO_MATCH,
};

use super::dto::BatchNotice;

/// Escape special HTML characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const CSS: &str = r#"
:root {
    --primary-color: #2563eb;
    --text-color: #1f2937;
    --muted-color: #6b7280;
    --border-color: #e5e7eb;
    --ok-color: #15803d;
    --warn-color: #b45309;
    --err-color: #b91c1c;
}
body { font-family: system-ui, sans-serif; color: var(--text-color); max-width: 72rem; margin: 2rem auto; padding: 0 1rem; }
h1 { font-size: 1.6rem; }
h2 { font-size: 1.2rem; margin-top: 2rem; }
table { border-collapse: collapse; width: 100%; font-size: 0.9rem; }
th, td { border: 1px solid var(--border-color); padding: 0.4rem 0.6rem; text-align: left; vertical-align: top; }
th { background: #f9fafb; }
form { margin: 1rem 0; }
label { display: block; margin-top: 0.6rem; font-weight: 600; }
input[type=text], input[type=email], input[type=date], textarea { width: 100%; padding: 0.4rem; box-sizing: border-box; }
textarea { min-height: 12rem; font-family: inherit; }
button { margin-top: 0.8rem; padding: 0.5rem 1rem; background: var(--primary-color); color: #fff; border: 0; border-radius: 4px; cursor: pointer; }
.muted { color: var(--muted-color); }
.ok { color: var(--ok-color); }
.warn { color: var(--warn-color); }
.err { color: var(--err-color); }
.metrics { display: flex; gap: 1.5rem; }
.metric strong { display: block; font-size: 1.4rem; }
.actions { display: flex; gap: 1rem; align-items: center; }
pre { white-space: pre-wrap; }
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} - Retention Desk</title>\n<style>{CSS}</style>\n</head>\n\
         <body>\n<p><a href=\"/\">Retention Desk</a></p>\n<h1>{title}</h1>\n{body}\n</body>\n</html>",
        title = html_escape(title),
        body = body,
    )
}

/// GET / - forms plus the catalog.
pub fn index_page(catalog: &OfferCatalog) -> String {
    let mut offers = String::new();
    for offer in catalog.offers() {
        let _ = write!(
            offers,
            "<tr><td><code>{}</code></td><td>{}</td><td>{}</td><td class=\"muted\">{}</td></tr>",
            html_escape(&offer.id),
            html_escape(&offer.name),
            html_escape(&offer.description),
            html_escape(&offer.eligibility_notes()),
        );
    }

    let body = format!(
        r#"<h2>Single cancellation</h2>
<form method="post" action="/cancellations">
<label for="email">Customer email</label>
<input type="email" id="email" name="email" required>
<label for="reason">Cancellation reason</label>
<textarea id="reason" name="reason" style="min-height:5rem"></textarea>
<label for="customer_id">Customer ID</label>
<input type="text" id="customer_id" name="customer_id" value="CUST-001">
<label for="date_cancelled">Date cancelled</label>
<input type="date" id="date_cancelled" name="date_cancelled">
<button type="submit">Find offer</button>
</form>
<h2>Batch upload</h2>
<p class="muted">CSV with columns <code>Email</code> and <code>Cancellation Reason</code>; optional <code>Customer ID</code> and <code>Date Cancelled</code> (YYYY-MM-DD).</p>
<form method="post" action="/batches" enctype="multipart/form-data">
<input type="file" name="file" accept=".csv,text/csv" required>
<button type="submit">Process batch</button>
</form>
<h2>Available offers</h2>
<table><thead><tr><th>Code</th><th>Name</th><th>Description</th><th>Targets</th></tr></thead>
<tbody>{offers}</tbody></table>"#
    );

    layout("Cancellation triage", &body)
}

fn hidden(name: &str, value: &str) -> String {
    format!(
        "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
        name,
        html_escape(value)
    )
}

fn review_form(row: &BatchRowResult) -> String {
    let request = &row.request;
    let date = request
        .date_cancelled()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    format!(
        "<form method=\"post\" action=\"/cancellations/notify\">{}{}{}\
         <button type=\"submit\">Notify team for manual review</button></form>",
        hidden("email", request.email()),
        hidden("customer_id", request.customer_id().unwrap_or("")),
        hidden("date_cancelled", &date),
    )
}

/// POST /cancellations - match, rationale and an editable draft.
pub fn cancellation_result_page(row: &BatchRowResult) -> String {
    let request = &row.request;
    let mut body = format!(
        "<p><strong>Customer:</strong> {} &lt;{}&gt;</p><p><strong>Reason:</strong> {}</p>",
        html_escape(request.customer_id().unwrap_or("-")),
        html_escape(request.email()),
        html_escape(request.reason()),
    );

    match (&row.classification, row.draft()) {
        (Ok(matched), Some(draft)) => {
            let _ = write!(
                body,
                "<p class=\"ok\"><strong>Matched offer:</strong> {} <code>{}</code></p>\
                 <p class=\"muted\">{}</p>\
                 <h2>Email draft</h2>\
                 <form method=\"post\" action=\"/cancellations/send\">{}\
                 <label for=\"subject\">Subject</label>\
                 <input type=\"text\" id=\"subject\" name=\"subject\" value=\"{}\">\
                 <label for=\"body\">Body</label>\
                 <textarea id=\"body\" name=\"body\">{}</textarea>\
                 <button type=\"submit\">Send email</button></form>",
                html_escape(&matched.offer_name),
                html_escape(&matched.offer_id),
                html_escape(&matched.rationale),
                hidden("email", request.email()),
                html_escape(draft.subject()),
                html_escape(draft.body()),
            );
        }
        (Ok(matched), _) => {
            let _ = write!(
                body,
                "<p><strong>Matched offer:</strong> {} <code>{}</code></p>\
                 <p class=\"err\">Could not draft an email: {}</p>",
                html_escape(&matched.offer_name),
                html_escape(&matched.offer_id),
                html_escape(&row.error_message().unwrap_or_default()),
            );
        }
        (Err(ClassificationError::NoMatch { rationale }), _) => {
            let _ = write!(
                body,
                "<p class=\"warn\"><strong>{}</strong>: no retention offer fits this reason.</p>\
                 <p class=\"muted\">{}</p>{}",
                NO_MATCH,
                html_escape(rationale),
                review_form(row),
            );
        }
        (Err(err), _) => {
            let _ = write!(
                body,
                "<p class=\"err\"><strong>Classification failed</strong> ({}): {}</p>",
                err.code(),
                html_escape(&err.to_string()),
            );
        }
    }

    body.push_str("<p><a href=\"/\">Process another</a></p>");
    layout("Cancellation result", &body)
}

/// Outcome of a single send or notify action.
pub fn delivery_page(title: &str, recipient: &str, outcome: &Result<(), SendError>) -> String {
    let body = match outcome {
        Ok(()) => format!(
            "<p class=\"ok\">Sent to {}.</p>",
            html_escape(recipient)
        ),
        Err(err) => format!(
            "<p class=\"err\">Could not send to {} ({}): {}</p>",
            html_escape(recipient),
            err.code(),
            html_escape(&err.to_string())
        ),
    };
    layout(title, &format!("{}<p><a href=\"/\">Back</a></p>", body))
}

fn summary_block(summary: &BatchSummary) -> String {
    let metric = |label: &str, value: usize| {
        format!("<div class=\"metric\"><strong>{}</strong>{}</div>", value, label)
    };
    format!(
        "<div class=\"metrics\">{}{}{}{}{}</div>",
        metric("processed", summary.total),
        metric("matched", summary.matched),
        metric("manual review", summary.no_match),
        metric("failed", summary.failed),
        metric("emails sent", summary.sent),
    )
}

fn notice_block(notice: &BatchNotice) -> String {
    let mut out = String::new();
    if let Some(sent) = notice.sent {
        let _ = write!(
            out,
            "<p class=\"ok\">Sent {} email(s); {} failed.</p>",
            sent,
            notice.send_failed.unwrap_or(0)
        );
    }
    if let Some(notified) = notice.notified {
        let _ = write!(
            out,
            "<p class=\"ok\">Sent {} manual-review notification(s); {} failed.</p>",
            notified,
            notice.notify_failed.unwrap_or(0)
        );
    }
    if let Some(error) = &notice.error {
        let _ = write!(out, "<p class=\"err\">Delivery error: {}</p>", html_escape(error));
    }
    out
}

/// GET /batches/:id - summary, actions and per-row results.
pub fn batch_page(batch: &Batch, notice: &BatchNotice) -> String {
    let id = batch.id();
    let summary = batch.summary();

    let mut rows = String::new();
    for row in batch.rows() {
        let status = match row.error_message() {
            Some(err) => format!("<span class=\"err\">{}</span>", html_escape(&err)),
            None if row.needs_manual_review() => "<span class=\"warn\">manual review</span>".to_string(),
            None => format!("<span class=\"ok\">{}</span>", row.stage()),
        };
        let draft = row
            .draft()
            .map(|d| {
                format!(
                    "<details><summary>{}</summary><pre>{}</pre></details>",
                    html_escape(d.subject()),
                    html_escape(d.body())
                )
            })
            .unwrap_or_default();
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td><code>{}</code></td><td>{}</td><td>{}</td><td>{}</td></tr>",
            row.row,
            html_escape(row.request.customer_id().unwrap_or("")),
            html_escape(row.request.email()),
            html_escape(row.offer_code()),
            draft,
            row.send_status.label(),
            status,
        );
    }

    let body = format!(
        r#"<p class="muted">Batch {id} &middot; processed {created}</p>
{summary}
{notice}
<div class="actions">
<form method="post" action="/batches/{id}/send"><button type="submit">Send all unsent emails</button></form>
<form method="post" action="/batches/{id}/notify"><button type="submit">Notify team about no-match rows</button></form>
<a href="/batches/{id}/export.csv">Download results CSV</a>
</div>
<table><thead><tr><th>Row</th><th>Customer ID</th><th>Email</th><th>Offer</th><th>Draft</th><th>Send status</th><th>Status</th></tr></thead>
<tbody>{rows}</tbody></table>"#,
        id = id,
        created = batch.created_at().format("%Y-%m-%d %H:%M:%S UTC"),
        summary = summary_block(&summary),
        notice = notice_block(notice),
        rows = rows,
    );

    layout("Batch results", &body)
}

/// Error page for requests the UI cannot serve.
pub fn error_page(title: &str, message: &str) -> String {
    layout(
        title,
        &format!(
            "<p class=\"err\">{}</p><p><a href=\"/\">Back</a></p>",
            html_escape(message)
        ),
    )
}
