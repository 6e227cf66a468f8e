//! Cancellation request value object.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single customer cancellation, from the web form or one CSV row.
///
/// Fields are private; once built the request is never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationRequest {
    email: String,
    reason: String,
    customer_id: Option<String>,
    date_cancelled: Option<NaiveDate>,
}

impl CancellationRequest {
    /// Creates a request from an email address and free-text reason.
    ///
    /// Both values are trimmed. An empty reason is accepted here; the
    /// classifier is the component that rejects it.
    pub fn new(email: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            reason: reason.into().trim().to_string(),
            customer_id: None,
            date_cancelled: None,
        }
    }

    /// Sets the customer identifier. Blank identifiers are ignored.
    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        let customer_id = customer_id.into().trim().to_string();
        self.customer_id = (!customer_id.is_empty()).then_some(customer_id);
        self
    }

    /// Sets the date the customer cancelled.
    pub fn with_date_cancelled(mut self, date: NaiveDate) -> Self {
        self.date_cancelled = Some(date);
        self
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    pub fn date_cancelled(&self) -> Option<NaiveDate> {
        self.date_cancelled
    }

    /// Returns the customer id if known, otherwise the email address.
    pub fn reference(&self) -> &str {
        self.customer_id.as_deref().unwrap_or(&self.email)
    }

    /// Guesses a greeting name from the email local part.
    ///
    /// `jane.doe+billing@example.com` becomes `Jane Doe`. Falls back to
    /// `there` so greetings read "Hey there".
    pub fn customer_name(&self) -> String {
        let local = self.email.split('@').next().unwrap_or_default();
        let local = local.split('+').next().unwrap_or_default();

        let words: Vec<String> = local
            .split(['.', '_', '-'])
            .map(|part| part.trim_matches(|c: char| c.is_ascii_digit()))
            .filter(|part| !part.is_empty())
            .map(capitalize)
            .collect();

        if words.is_empty() {
            "there".to_string()
        } else {
            words.join(" ")
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_email_and_reason() {
        let request = CancellationRequest::new("  a@x.com ", "\ttoo expensive\n");
        assert_eq!(request.email(), "a@x.com");
        assert_eq!(request.reason(), "too expensive");
    }

    #[test]
    fn blank_customer_id_is_dropped() {
        let request = CancellationRequest::new("a@x.com", "price").with_customer_id("   ");
        assert_eq!(request.customer_id(), None);
        assert_eq!(request.reference(), "a@x.com");
    }

    #[test]
    fn reference_prefers_customer_id() {
        let request = CancellationRequest::new("a@x.com", "price").with_customer_id("CUST-007");
        assert_eq!(request.reference(), "CUST-007");
    }

    #[test]
    fn customer_name_from_dotted_local_part() {
        let request = CancellationRequest::new("jane.doe@example.com", "price");
        assert_eq!(request.customer_name(), "Jane Doe");
    }

    #[test]
    fn customer_name_ignores_plus_tag_and_digits() {
        let request = CancellationRequest::new("BOB_smith42+billing@example.com", "price");
        assert_eq!(request.customer_name(), "Bob Smith");
    }

    #[test]
    fn customer_name_falls_back_when_unusable() {
        let request = CancellationRequest::new("1234@example.com", "price");
        assert_eq!(request.customer_name(), "there");
    }

    #[test]
    fn date_cancelled_is_kept() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let request = CancellationRequest::new("a@x.com", "price").with_date_cancelled(date);
        assert_eq!(request.date_cancelled(), Some(date));
    }
}
