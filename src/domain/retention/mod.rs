//! Retention domain - cancellation requests, offers and pipeline results.
//!
//! Everything here is pure: no I/O, no provider calls. The application
//! layer feeds model replies through [`parse_match`] and [`parse_draft`].

mod batch;
mod errors;
mod offer;
mod outcome;
mod parsing;
pub mod prompts;
mod request;

pub use batch::{Batch, BatchSummary};
pub use errors::{ClassificationError, CompositionError, SendError};
pub use offer::{CatalogError, Offer, OfferCatalog};
pub use outcome::{BatchRowResult, EmailDraft, MatchResult, RecordStage, SendStatus, NO_MATCH};
pub use parsing::{extract_json_object, parse_draft, parse_match};
pub use request::CancellationRequest;
