//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - LLM completions used by the classifier and composer
//! - `Mailer` - Outbound email delivery
//! - `BatchStore` - Processed batch results kept between requests

mod ai_provider;
mod batch_store;
mod mailer;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, ResponseFormat, TokenUsage,
};
pub use batch_store::{BatchStore, BatchStoreError};
pub use mailer::{Mailer, OutgoingEmail};
