//! A processed CSV upload and its aggregate counts.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::outcome::BatchRowResult;
use crate::domain::foundation::BatchId;

/// Results of one batch run, kept in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    id: BatchId,
    created_at: DateTime<Utc>,
    rows: Vec<BatchRowResult>,
}

impl Batch {
    pub fn new(rows: Vec<BatchRowResult>) -> Self {
        Self {
            id: BatchId::new(),
            created_at: Utc::now(),
            rows,
        }
    }

    pub fn id(&self) -> BatchId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn rows(&self) -> &[BatchRowResult] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [BatchRowResult] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows with a draft that has not been delivered yet.
    pub fn unsent_drafts(&self) -> impl Iterator<Item = &BatchRowResult> {
        self.rows
            .iter()
            .filter(|row| row.is_match() && !row.send_status.is_sent())
    }

    /// Rows the classifier routed to manual review.
    pub fn review_rows(&self) -> impl Iterator<Item = &BatchRowResult> {
        self.rows.iter().filter(|row| row.needs_manual_review())
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_rows(&self.rows)
    }

    /// Download name, e.g. `retention_results_20240301_142500.csv`.
    pub fn export_filename(&self) -> String {
        format!(
            "retention_results_{}.csv",
            self.created_at.format("%Y%m%d_%H%M%S")
        )
    }
}

/// Counts shown above the batch results table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub matched: usize,
    pub no_match: usize,
    pub failed: usize,
    pub sent: usize,
}

impl BatchSummary {
    pub fn from_rows(rows: &[BatchRowResult]) -> Self {
        rows.iter().fold(Self::default(), |mut summary, row| {
            summary.total += 1;
            if row.is_match() {
                summary.matched += 1;
            } else if row.needs_manual_review() {
                summary.no_match += 1;
            } else {
                summary.failed += 1;
            }
            if row.send_status.is_sent() {
                summary.sent += 1;
            }
            summary
        })
    }
}
