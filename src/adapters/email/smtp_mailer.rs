//! SMTP Mailer - lettre-backed implementation of the Mailer port.
//!
//! Connects with STARTTLS, authenticates with the sender's credentials and
//! sends one plain-text message per call. Failures are classified into
//! `SendError` variants so the UI can tell a bad password from a bad address.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

use crate::domain::retention::SendError;
use crate::ports::{Mailer, OutgoingEmail};

/// Connection settings for the SMTP relay.
#[derive(Debug)]
pub struct SmtpMailerConfig {
    /// Relay host, e.g. `smtp.gmail.com`.
    pub host: String,
    /// STARTTLS port.
    pub port: u16,
    /// Sender address, also used as the SMTP username.
    pub sender: String,
    password: Secret<String>,
    /// Connection and command timeout.
    pub timeout: Duration,
}

impl SmtpMailerConfig {
    pub fn new(
        host: impl Into<String>,
        sender: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: 587,
            sender: sender.into(),
            password: Secret::new(password.into()),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Sends mail through an authenticated STARTTLS relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Builds the transport. No connection is opened until the first send.
    pub fn new(config: SmtpMailerConfig) -> Result<Self, SendError> {
        let from = config
            .sender
            .parse::<Mailbox>()
            .map_err(|e| SendError::Configuration(format!("invalid sender address: {}", e)))?;

        let creds = Credentials::new(
            config.sender.clone(),
            config.password.expose_secret().to_string(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| SendError::Configuration(format!("invalid SMTP host: {}", e)))?
            .port(config.port)
            .credentials(creds)
            .authentication(vec![Mechanism::Plain, Mechanism::Login])
            .timeout(Some(config.timeout))
            .build();

        tracing::info!(host = %config.host, port = config.port, "SMTP mailer configured");

        Ok(Self { transport, from })
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, SendError> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| SendError::InvalidAddress(format!("{}: {}", email.to, e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| SendError::InvalidAddress(e.to_string()))
    }
}

/// Sorts a transport failure into the error the operator can act on.
fn classify_smtp_error(err: lettre::transport::smtp::Error) -> SendError {
    let status = err.status().map(|code| code.to_string());

    // 530/534/535: authentication required or rejected
    if status.as_deref().is_some_and(|code| code.starts_with("53")) {
        return SendError::Authentication(err.to_string());
    }
    if err.is_permanent() || err.is_transient() {
        return SendError::Rejected(err.to_string());
    }
    SendError::Connection(err.to_string())
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), SendError> {
        let message = self.build_message(email)?;

        self.transport.send(message).await.map_err(|e| {
            let err = classify_smtp_error(e);
            tracing::warn!(to = %email.to, code = err.code(), "Email delivery failed: {}", err);
            err
        })?;

        tracing::info!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer() -> SmtpMailer {
        SmtpMailer::new(SmtpMailerConfig::new(
            "smtp.gmail.com",
            "ops@gmail.com",
            "app-password",
        ))
        .unwrap()
    }

    #[test]
    fn config_builder_works() {
        let config = SmtpMailerConfig::new("smtp.mail.yahoo.com", "a@yahoo.com", "pw")
            .with_port(465)
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.port, 465);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!format!("{:?}", config).contains("\"pw\""));
    }

    #[test]
    fn invalid_sender_is_configuration_error() {
        let result = SmtpMailer::new(SmtpMailerConfig::new("smtp.gmail.com", "not an address", "pw"));
        assert!(matches!(result, Err(SendError::Configuration(_))));
    }

    #[test]
    fn builds_plain_text_message() {
        let email = OutgoingEmail::new("jane@example.com", "Stay with us", "Hey Jane,");
        let message = mailer().build_message(&email).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("To: jane@example.com"));
        assert!(raw.contains("Subject: Stay with us"));
        assert!(raw.contains("Content-Type: text/plain"));
    }

    #[tokio::test]
    async fn invalid_recipient_fails_before_connecting() {
        let email = OutgoingEmail::new("not-an-address", "Subject", "Body");

        let result = mailer().send(&email).await;

        assert!(matches!(result, Err(SendError::InvalidAddress(_))));
    }
}
