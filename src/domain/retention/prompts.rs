//! Prompt templates for the classifier and composer, plus the manual-review notice.

use chrono::NaiveDate;

use super::offer::{Offer, OfferCatalog};
use super::request::CancellationRequest;

pub const CLASSIFIER_SYSTEM_PROMPT: &str = r#"You match customer cancellation reasons to retention offers.

You receive one cancellation reason and the list of offers we can make.
Pick the single offer that most directly resolves the customer's stated problem.

Reply with exactly this JSON object and nothing else:
{
    "offer_code": "<an OFFER_CODE from the list, or NO_MATCH>",
    "offer_name": "<the matching OFFER_NAME, or None>",
    "match_reasoning": "<one or two sentences on why the offer fits, or why nothing does>"
}

Rules:
- Recommend one offer at most.
- Only use offer codes that appear in the list. Never invent or alter a code.
- If the reason is vague or no offer addresses it (for example the customer is
  moving somewhere we do not operate), answer NO_MATCH instead of guessing."#;

pub const COMPOSER_SYSTEM_PROMPT: &str = r#"You write short retention emails for customers who are cancelling.

You receive the customer's name, their cancellation reason and the offer we
selected for them. Write a warm, professional email of 100 to 150 words:
1. Greet them with "Hey <name>,".
2. Acknowledge their reason in one sentence.
3. Explain in two or three sentences how the offer solves that problem.
4. Give one clear next step.
5. Sign off with "Best regards,\nThe Customer Team".
Do not be pushy.

Reply with exactly this JSON object and nothing else:
{
    "subject": "<a short subject line>",
    "body": "<the full email text>"
}"#;

/// Used when the composer reply carries a body but no subject.
pub const DEFAULT_SUBJECT: &str = "We'd Love to Keep You - Special Retention Offer";

pub const MANUAL_REVIEW_SUBJECT: &str = "Manual Review Required - Customer Cancellation";

/// Temperature for offer selection; kept low so identical reasons pick the same offer.
pub const CLASSIFIER_TEMPERATURE: f32 = 0.3;

pub const COMPOSER_TEMPERATURE: f32 = 0.7;

pub fn classifier_user_prompt(reason: &str, catalog: &OfferCatalog) -> String {
    format!(
        "Find the best retention offer for this customer.\n\n\
         CANCELLATION REASON: {}\n\n\
         {}\n\
         Return your recommendation in the JSON format described.",
        reason,
        catalog.render_for_prompt()
    )
}

pub fn composer_user_prompt(request: &CancellationRequest, offer: &Offer) -> String {
    format!(
        "Write a retention email.\n\n\
         Customer name: {}\n\
         Customer email: {}\n\
         Cancellation reason: {}\n\
         Matched offer: {} - {}\n\
         Offer details: {}",
        request.customer_name(),
        request.email(),
        request.reason(),
        offer.id,
        offer.name,
        offer.description
    )
}

/// Body of the email sent to the team when no offer fits a cancellation.
pub fn manual_review_body(
    customer_id: Option<&str>,
    email: &str,
    date_cancelled: Option<NaiveDate>,
) -> String {
    let date = date_cancelled
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        "A customer cancellation was detected but no retention offer matched it.\n\n\
         Please review manually:\n\n\
         Customer ID: {}\n\n\
         Email: {}\n\n\
         Date Cancelled: {}\n\n\n\
         Thank you,\n",
        customer_id.unwrap_or("unknown"),
        email,
        date
    )
}
