//! Retention Desk server entry point.

use std::sync::Arc;

use anyhow::{Context, Result};
use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use retention_desk::adapters::http::{app_router, RetentionAppState};
use retention_desk::adapters::{
    InMemoryBatchStore, OpenAIConfig, OpenAIProvider, SmtpMailer, SmtpMailerConfig,
    UnconfiguredMailer,
};
use retention_desk::application::handlers::retention::BatchLocks;
use retention_desk::config::{AiConfig, AppConfig, SmtpConfig};
use retention_desk::ports::{AIProvider, Mailer};

fn setup_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn build_ai_provider(config: &AiConfig) -> Result<Arc<dyn AIProvider>> {
    let api_key = config
        .openai_api_key
        .as_ref()
        .context("RETENTION__AI__OPENAI_API_KEY is not set")?;

    let provider = OpenAIProvider::new(
        OpenAIConfig::new(api_key.expose_secret().as_str())
            .with_model(&config.model)
            .with_base_url(&config.base_url)
            .with_timeout(config.timeout())
            .with_max_retries(config.max_retries),
    )?;

    Ok(Arc::new(provider))
}

/// Falls back to a mailer that reports every send as a configuration error,
/// so the desk still classifies and drafts without SMTP credentials.
fn build_mailer(config: &SmtpConfig) -> Arc<dyn Mailer> {
    let Some((sender, password)) = config.credentials() else {
        tracing::warn!("SMTP credentials not configured; emails will not be sent");
        return Arc::new(UnconfiguredMailer::new(
            "set RETENTION__SMTP__SENDER_EMAIL and RETENTION__SMTP__SENDER_PASSWORD",
        ));
    };

    let Some(host) = config.resolved_server() else {
        tracing::warn!(sender = %sender, "No SMTP server known for sender domain");
        return Arc::new(UnconfiguredMailer::new(
            "set RETENTION__SMTP__SERVER for this sender domain",
        ));
    };

    let mailer_config = SmtpMailerConfig::new(host.clone(), sender, password)
        .with_port(config.port)
        .with_timeout(config.timeout());

    match SmtpMailer::new(mailer_config) {
        Ok(mailer) => {
            tracing::info!(host = %host, port = config.port, "SMTP mailer ready");
            Arc::new(mailer)
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to set up SMTP transport");
            Arc::new(UnconfiguredMailer::new(err.to_string()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    setup_logging(&config);
    config.validate().context("Invalid configuration")?;

    let catalog = config
        .catalog
        .load()
        .context("Failed to load offer catalog")?;
    tracing::info!(offers = catalog.len(), "Offer catalog loaded");

    let ai_provider = build_ai_provider(&config.ai)?;
    let mailer = build_mailer(&config.smtp);

    let state = RetentionAppState {
        ai_provider,
        mailer,
        batch_store: Arc::new(InMemoryBatchStore::with_max_batches(
            config.server.max_stored_batches,
        )),
        batch_locks: BatchLocks::new(),
        catalog: Arc::new(catalog),
        team_address: config.smtp.team_address().map(str::to_string),
    };

    let app = app_router(
        state,
        config.server.request_timeout(),
        config.server.max_upload_bytes,
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, environment = ?config.server.environment, "Retention desk listening");

    axum::serve(listener, app).await?;
    Ok(())
}
