//! Turning raw model replies into domain results.
//!
//! Models are asked for JSON but occasionally wrap it in a markdown fence
//! or add a sentence around it, so both parsers first isolate the outermost
//! JSON object before deserializing.

use serde::Deserialize;

use super::errors::{ClassificationError, CompositionError};
use super::offer::OfferCatalog;
use super::outcome::{EmailDraft, MatchResult, NO_MATCH};

#[derive(Debug, Deserialize)]
struct ClassifierReply {
    #[serde(alias = "OFFER_CODE")]
    offer_code: String,
    #[serde(default, alias = "MATCH_REASONING")]
    match_reasoning: String,
}

#[derive(Debug, Deserialize)]
struct ComposerReply {
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

/// Returns the slice from the first `{` to the last `}`, if both exist.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

/// Parses a classifier reply and checks the chosen offer against the catalog.
pub fn parse_match(
    raw: &str,
    request_ref: &str,
    catalog: &OfferCatalog,
) -> Result<MatchResult, ClassificationError> {
    let json = extract_json_object(raw)
        .ok_or_else(|| ClassificationError::Malformed("no JSON object in reply".to_string()))?;

    let reply: ClassifierReply = serde_json::from_str(json)
        .map_err(|e| ClassificationError::Malformed(e.to_string()))?;

    let offer_id = reply.offer_code.trim();
    let rationale = reply.match_reasoning.trim().to_string();

    if offer_id.is_empty() {
        return Err(ClassificationError::Malformed("offer_code is empty".to_string()));
    }
    if offer_id.eq_ignore_ascii_case(NO_MATCH) {
        return Err(ClassificationError::NoMatch { rationale });
    }

    let offer = catalog
        .get(offer_id)
        .ok_or_else(|| ClassificationError::UnknownOffer {
            offer_id: offer_id.to_string(),
        })?;

    Ok(MatchResult {
        request_ref: request_ref.to_string(),
        offer_id: offer.id.clone(),
        offer_name: offer.name.clone(),
        rationale,
    })
}

/// Parses a composer reply, filling in `default_subject` when the model left it out.
pub fn parse_draft(raw: &str, default_subject: &str) -> Result<EmailDraft, CompositionError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case(NO_MATCH) {
        return Err(CompositionError::Declined);
    }

    let json = extract_json_object(trimmed)
        .ok_or_else(|| CompositionError::Malformed("no JSON object in reply".to_string()))?;

    let reply: ComposerReply =
        serde_json::from_str(json).map_err(|e| CompositionError::Malformed(e.to_string()))?;

    let body = reply.body.unwrap_or_default();
    if body.trim().is_empty() {
        return Err(CompositionError::EmptyBody);
    }
    if body.trim().eq_ignore_ascii_case(NO_MATCH) {
        return Err(CompositionError::Declined);
    }

    let subject = reply
        .subject
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default_subject.to_string());

    EmailDraft::new(subject, body).map_err(|e| CompositionError::Malformed(e.to_string()))
}
