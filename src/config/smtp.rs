//! SMTP configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Outbound mail configuration. Every field is optional; without a sender
/// the service still classifies and drafts but cannot send.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    /// Address retention emails are sent from; also the SMTP username
    pub sender_email: Option<String>,

    /// SMTP password (app password for Gmail/Outlook/Yahoo)
    pub sender_password: Option<Secret<String>>,

    /// SMTP relay host. Derived from the sender domain when unset.
    pub server: Option<String>,

    /// SMTP port (STARTTLS)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Recipient of manual-review notifications. Defaults to the sender.
    pub team_email: Option<String>,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl SmtpConfig {
    /// Sender address and password are both present
    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }

    /// Sender address and password, when both are non-blank
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((non_blank(&self.sender_email)?, non_blank_secret(&self.sender_password)?))
    }

    /// Explicit server, or the well-known relay for the sender's provider
    pub fn resolved_server(&self) -> Option<String> {
        if let Some(server) = non_blank(&self.server) {
            return Some(server.to_string());
        }
        non_blank(&self.sender_email)
            .and_then(detect_smtp_server)
            .map(str::to_string)
    }

    /// Where manual-review notifications go
    pub fn team_address(&self) -> Option<&str> {
        non_blank(&self.team_email).or_else(|| non_blank(&self.sender_email))
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate SMTP configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(sender) = non_blank(&self.sender_email) {
            if !looks_like_address(sender) {
                return Err(ValidationError::InvalidSenderEmail);
            }
        } else if non_blank_secret(&self.sender_password).is_some() {
            return Err(ValidationError::MissingRequired("SMTP__SENDER_EMAIL"));
        }
        if let Some(team) = non_blank(&self.team_email) {
            if !looks_like_address(team) {
                return Err(ValidationError::InvalidTeamEmail);
            }
        }
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            sender_email: None,
            sender_password: None,
            server: None,
            port: default_port(),
            team_email: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// Relay host for the common consumer mail providers.
pub fn detect_smtp_server(email: &str) -> Option<&'static str> {
    let domain = email.rsplit_once('@')?.1.trim().to_ascii_lowercase();
    match domain.as_str() {
        "gmail.com" | "googlemail.com" => Some("smtp.gmail.com"),
        "outlook.com" | "hotmail.com" | "live.com" => Some("smtp-mail.outlook.com"),
        "yahoo.com" => Some("smtp.mail.yahoo.com"),
        _ => None,
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn non_blank_secret(value: &Option<Secret<String>>) -> Option<&str> {
    value
        .as_ref()
        .map(|secret| secret.expose_secret().trim())
        .filter(|s| !s.is_empty())
}

fn looks_like_address(value: &str) -> bool {
    matches!(value.split_once('@'), Some((local, domain)) if !local.is_empty() && domain.contains('.'))
}

fn default_port() -> u16 {
    587
}

fn default_timeout() -> u64 {
    30
}
