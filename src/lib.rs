//! Retention Desk - cancellation triage with AI-matched retention offers
//!
//! Each cancellation reason is matched to one offer from a fixed catalog,
//! a personalised email is drafted for it, and the desk sends the drafts
//! or hands no-match customers to the team for manual review.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
