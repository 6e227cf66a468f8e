//! ComposeEmailHandler - drafts the retention email for a matched offer.

use std::sync::Arc;

use crate::domain::retention::prompts::{
    composer_user_prompt, COMPOSER_SYSTEM_PROMPT, COMPOSER_TEMPERATURE, DEFAULT_SUBJECT,
};
use crate::domain::retention::{parse_draft, CancellationRequest, CompositionError, EmailDraft, Offer};
use crate::ports::{AIProvider, CompletionRequest, MessageRole, RequestMetadata, ResponseFormat};

/// Command to draft an email presenting `offer` to the customer.
#[derive(Debug, Clone)]
pub struct ComposeEmailCommand {
    pub request: CancellationRequest,
    pub offer: Offer,
}

/// Handler for email composition.
pub struct ComposeEmailHandler {
    ai_provider: Arc<dyn AIProvider>,
}

impl ComposeEmailHandler {
    pub fn new(ai_provider: Arc<dyn AIProvider>) -> Self {
        Self { ai_provider }
    }

    pub async fn handle(&self, cmd: ComposeEmailCommand) -> Result<EmailDraft, CompositionError> {
        let ComposeEmailCommand { request, offer } = cmd;

        let completion = CompletionRequest::new(RequestMetadata::new("compose", request.reference()))
            .with_system_prompt(COMPOSER_SYSTEM_PROMPT)
            .with_message(MessageRole::User, composer_user_prompt(&request, &offer))
            .with_temperature(COMPOSER_TEMPERATURE)
            .with_response_format(ResponseFormat::JsonObject);

        let response = self.ai_provider.complete(completion).await.map_err(|e| {
            tracing::error!(reference = %request.reference(), "Composition call failed: {}", e);
            CompositionError::Provider(e.to_string())
        })?;

        parse_draft(&response.content, DEFAULT_SUBJECT).map_err(|err| {
            tracing::warn!(
                reference = %request.reference(),
                offer_id = %offer.id,
                code = err.code(),
                "Unusable draft: {}",
                err
            );
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};

    fn command() -> ComposeEmailCommand {
        ComposeEmailCommand {
            request: CancellationRequest::new("jane.doe@x.com", "too expensive"),
            offer: Offer::new("discount20", "20% off", "20% off for 6 months", &["price"]),
        }
    }

    #[tokio::test]
    async fn returns_draft_from_model_reply() {
        let provider = Arc::new(MockAIProvider::new().with_response(
            r#"{"subject":"A gift before you go","body":"Hey Jane Doe,\n\nHere is 20% off."}"#,
        ));
        let handler = ComposeEmailHandler::new(provider.clone());

        let draft = handler.handle(command()).await.unwrap();

        assert_eq!(draft.subject(), "A gift before you go");
        assert!(draft.body().starts_with("Hey Jane Doe,"));

        let calls = provider.get_calls();
        assert_eq!(calls[0].temperature, Some(COMPOSER_TEMPERATURE));
        assert_eq!(calls[0].metadata.operation, "compose");
        assert!(calls[0]
            .last_user_message()
            .unwrap()
            .contains("Matched offer: discount20 - 20% off"));
    }

    #[tokio::test]
    async fn missing_subject_uses_default() {
        let provider = Arc::new(MockAIProvider::new().with_response(r#"{"body":"Hey Jane,"}"#));
        let handler = ComposeEmailHandler::new(provider);

        let draft = handler.handle(command()).await.unwrap();

        assert_eq!(draft.subject(), DEFAULT_SUBJECT);
    }

    #[tokio::test]
    async fn empty_body_is_rejected() {
        let provider =
            Arc::new(MockAIProvider::new().with_response(r#"{"subject":"Hi","body":"  "}"#));
        let handler = ComposeEmailHandler::new(provider);

        assert_eq!(handler.handle(command()).await, Err(CompositionError::EmptyBody));
    }

    #[tokio::test]
    async fn provider_failure_becomes_provider_error() {
        let provider = Arc::new(MockAIProvider::new().with_error(MockError::Network {
            message: "reset".to_string(),
        }));
        let handler = ComposeEmailHandler::new(provider);

        let result = handler.handle(command()).await;

        assert!(matches!(result, Err(CompositionError::Provider(_))));
    }
}
