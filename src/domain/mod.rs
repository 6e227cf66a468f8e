//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, validation errors)
//! - `retention` - Cancellation requests, offer catalog, match and draft results

pub mod foundation;
pub mod retention;
