//! Retention offers and the catalog the classifier chooses from.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Write as _;

use crate::domain::foundation::ValidationError;

/// A predefined incentive offered to a cancelling customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    /// Stable offer code, e.g. `PRICE_DISC_20`.
    pub id: String,
    /// Short human-readable title.
    pub name: String,
    /// What the customer actually receives.
    pub description: String,
    /// Cancellation themes this offer is meant to address.
    #[serde(default)]
    pub target_reasons: Vec<String>,
}

impl Offer {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        target_reasons: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            target_reasons: target_reasons.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Eligibility notes as a single comma-separated line.
    pub fn eligibility_notes(&self) -> String {
        self.target_reasons.join(", ")
    }
}

/// On-disk catalog layout.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    offers: Vec<Offer>,
}

/// Errors raised while building a catalog from external data.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(#[from] ValidationError),
}

/// Non-empty, id-unique list of offers. Loaded once and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferCatalog {
    offers: Vec<Offer>,
}

static BUILTIN: Lazy<OfferCatalog> = Lazy::new(|| OfferCatalog {
    offers: vec![
        Offer::new(
            "PRICE_DISC_20",
            "20% Discount for 6 Months",
            "20% discount on subscription for the next 6 months",
            &["too expensive", "price", "cost", "budget", "affordability"],
        ),
        Offer::new(
            "PRICE_DISC_30",
            "30% Discount for 3 Months",
            "30% discount on subscription for the next 3 months",
            &["too expensive", "price", "cost", "budget", "affordability", "expensive"],
        ),
        Offer::new(
            "FEATURE_UPGRADE",
            "Free Feature Upgrade",
            "Upgrade to premium tier with additional features at no extra cost",
            &["missing features", "need more features", "limited functionality", "features"],
        ),
        Offer::new(
            "TRIAL_EXTEND",
            "Extended Free Trial",
            "Additional 30 days free trial to explore the platform",
            &["not sure", "need more time", "trial", "testing", "evaluating"],
        ),
        Offer::new(
            "SUPPORT_PRIORITY",
            "Priority Support Access",
            "Dedicated support team and faster response times",
            &["support", "customer service", "help", "assistance", "response time"],
        ),
        Offer::new(
            "CUSTOM_SOLUTION",
            "Custom Solution Consultation",
            "Free consultation to create a customized solution for your needs",
            &["doesn't fit", "not suitable", "custom", "specific needs", "requirements"],
        ),
    ],
});

impl OfferCatalog {
    /// Builds a catalog, rejecting empty lists, blank ids and duplicate ids.
    pub fn new(offers: Vec<Offer>) -> Result<Self, ValidationError> {
        if offers.is_empty() {
            return Err(ValidationError::empty_field("offers"));
        }

        let mut seen = HashSet::new();
        for offer in &offers {
            if offer.id.trim().is_empty() {
                return Err(ValidationError::empty_field("offer id"));
            }
            if !seen.insert(offer.id.as_str()) {
                return Err(ValidationError::duplicate("offer id", offer.id.clone()));
            }
        }

        Ok(Self { offers })
    }

    /// The six offers the service ships with.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Parses a YAML document of the form `offers: [{id, name, description, target_reasons}]`.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Ok(Self::new(file.offers)?)
    }

    /// Looks up an offer by exact id.
    pub fn get(&self, id: &str) -> Option<&Offer> {
        self.offers.iter().find(|offer| offer.id == id)
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// Renders the catalog as the plain-text block embedded in classifier prompts.
    pub fn render_for_prompt(&self) -> String {
        let mut text = String::from("AVAILABLE RETENTION OFFERS:\n\n");
        for offer in &self.offers {
            let _ = writeln!(text, "OFFER_CODE: {}", offer.id);
            let _ = writeln!(text, "OFFER_NAME: {}", offer.name);
            let _ = writeln!(text, "DESCRIPTION: {}", offer.description);
            let _ = writeln!(text, "TARGET_REASONS: {}", offer.eligibility_notes());
            text.push_str("\n---\n\n");
        }
        text
    }
}
