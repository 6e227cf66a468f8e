//! ClassifyReasonHandler - picks the catalog offer for one cancellation reason.

use std::sync::Arc;

use crate::domain::retention::prompts::{
    classifier_user_prompt, CLASSIFIER_SYSTEM_PROMPT, CLASSIFIER_TEMPERATURE,
};
use crate::domain::retention::{
    parse_match, CancellationRequest, ClassificationError, MatchResult, OfferCatalog,
};
use crate::ports::{AIProvider, CompletionRequest, MessageRole, RequestMetadata, ResponseFormat};

/// Command to classify a cancellation reason.
#[derive(Debug, Clone)]
pub struct ClassifyReasonCommand {
    pub request: CancellationRequest,
}

/// Handler for offer classification.
pub struct ClassifyReasonHandler {
    ai_provider: Arc<dyn AIProvider>,
    catalog: Arc<OfferCatalog>,
}

impl ClassifyReasonHandler {
    pub fn new(ai_provider: Arc<dyn AIProvider>, catalog: Arc<OfferCatalog>) -> Self {
        Self {
            ai_provider,
            catalog,
        }
    }

    /// Returns the matched offer, or why none was chosen.
    ///
    /// An empty reason fails without calling the provider.
    pub async fn handle(
        &self,
        cmd: ClassifyReasonCommand,
    ) -> Result<MatchResult, ClassificationError> {
        let request = cmd.request;
        if request.reason().is_empty() {
            return Err(ClassificationError::EmptyReason);
        }

        let completion = CompletionRequest::new(RequestMetadata::new("classify", request.reference()))
            .with_system_prompt(CLASSIFIER_SYSTEM_PROMPT)
            .with_message(
                MessageRole::User,
                classifier_user_prompt(request.reason(), &self.catalog),
            )
            .with_temperature(CLASSIFIER_TEMPERATURE)
            .with_response_format(ResponseFormat::JsonObject);

        let response = self.ai_provider.complete(completion).await.map_err(|e| {
            tracing::error!(reference = %request.reference(), "Classification call failed: {}", e);
            ClassificationError::Provider(e.to_string())
        })?;

        let result = parse_match(&response.content, request.reference(), &self.catalog);
        match &result {
            Ok(matched) => tracing::debug!(
                reference = %request.reference(),
                offer_id = %matched.offer_id,
                "Offer matched"
            ),
            Err(err) => tracing::debug!(
                reference = %request.reference(),
                code = err.code(),
                "No usable offer: {}",
                err
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::retention::Offer;

    fn catalog() -> Arc<OfferCatalog> {
        Arc::new(
            OfferCatalog::new(vec![
                Offer::new("discount20", "20% off", "20% off for 6 months", &["price"]),
                Offer::new("pause", "Pause Billing", "Pause for 3 months", &["busy"]),
            ])
            .unwrap(),
        )
    }

    fn command(email: &str, reason: &str) -> ClassifyReasonCommand {
        ClassifyReasonCommand {
            request: CancellationRequest::new(email, reason),
        }
    }

    #[tokio::test]
    async fn returns_catalog_offer_chosen_by_model() {
        let provider = Arc::new(MockAIProvider::new().with_response(
            r#"{"offer_code":"discount20","offer_name":"20% off","match_reasoning":"Price concern"}"#,
        ));
        let handler = ClassifyReasonHandler::new(provider.clone(), catalog());

        let matched = handler.handle(command("a@x.com", "too expensive")).await.unwrap();

        assert_eq!(matched.offer_id, "discount20");
        assert_eq!(matched.offer_name, "20% off");
        assert_eq!(matched.request_ref, "a@x.com");
        assert_eq!(matched.rationale, "Price concern");
    }

    #[tokio::test]
    async fn sends_reason_and_catalog_in_json_mode() {
        let provider = Arc::new(MockAIProvider::new().with_response(
            r#"{"offer_code":"pause","offer_name":"Pause Billing","match_reasoning":"busy"}"#,
        ));
        let handler = ClassifyReasonHandler::new(provider.clone(), catalog());

        handler.handle(command("a@x.com", "no time")).await.unwrap();

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].response_format, ResponseFormat::JsonObject);
        assert_eq!(calls[0].temperature, Some(CLASSIFIER_TEMPERATURE));
        assert_eq!(calls[0].metadata.operation, "classify");
        let prompt = calls[0].last_user_message().unwrap();
        assert!(prompt.contains("CANCELLATION REASON: no time"));
        assert!(prompt.contains("OFFER_CODE: discount20"));
    }

    #[tokio::test]
    async fn empty_reason_fails_without_calling_provider() {
        let provider = Arc::new(MockAIProvider::new());
        let handler = ClassifyReasonHandler::new(provider.clone(), catalog());

        let result = handler.handle(command("a@x.com", "   ")).await;

        assert_eq!(result, Err(ClassificationError::EmptyReason));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_offer_is_rejected() {
        let provider = Arc::new(MockAIProvider::new().with_response(
            r#"{"offer_code":"FREE_PONY","offer_name":"Pony","match_reasoning":"?"}"#,
        ));
        let handler = ClassifyReasonHandler::new(provider, catalog());

        let result = handler.handle(command("a@x.com", "price")).await;

        assert_eq!(
            result,
            Err(ClassificationError::UnknownOffer {
                offer_id: "FREE_PONY".to_string()
            })
        );
    }

    #[tokio::test]
    async fn no_match_verdict_is_reported() {
        let provider = Arc::new(MockAIProvider::new().with_response(
            r#"{"offer_code":"NO_MATCH","offer_name":"None","match_reasoning":"Moving abroad"}"#,
        ));
        let handler = ClassifyReasonHandler::new(provider, catalog());

        let err = handler.handle(command("a@x.com", "moving")).await.unwrap_err();

        assert!(err.is_no_match());
    }

    #[tokio::test]
    async fn provider_failure_becomes_provider_error() {
        let provider = Arc::new(MockAIProvider::new().with_error(MockError::AuthenticationFailed));
        let handler = ClassifyReasonHandler::new(provider, catalog());

        let result = handler.handle(command("a@x.com", "price")).await;

        assert_eq!(
            result,
            Err(ClassificationError::Provider("authentication failed".to_string()))
        );
    }
}
