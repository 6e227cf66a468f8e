//! Email adapters - Implementations of the Mailer port.
//!
//! - `SmtpMailer` - STARTTLS relay via lettre
//! - `StubMailer` - Records messages in memory (tests, dry runs)
//! - `UnconfiguredMailer` - Refuses every send when SMTP is not set up

mod smtp_mailer;
mod stub_mailer;

pub use smtp_mailer::{SmtpMailer, SmtpMailerConfig};
pub use stub_mailer::{StubMailer, UnconfiguredMailer};
