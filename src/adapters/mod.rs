//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - OpenAI chat completions and a scriptable mock
//! - `csv` - Cancellation upload parsing and results export
//! - `email` - SMTP delivery, plus stand-ins for tests and unconfigured deployments
//! - `http` - Axum UI and JSON API
//! - `storage` - In-memory batch store

pub mod ai;
pub mod csv;
pub mod email;
pub mod http;
pub mod storage;

pub use ai::{MockAIProvider, OpenAIConfig, OpenAIProvider};
pub use email::{SmtpMailer, SmtpMailerConfig, StubMailer, UnconfiguredMailer};
pub use storage::InMemoryBatchStore;
