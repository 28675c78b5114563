//! Email delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport to send the
//! plain-text reminder and report messages. Configuration is loaded from
//! environment variables; if `SMTP_HOST` is not set, [`EmailConfig::from_env`]
//! returns `None` and the jobs fall back to [`crate::LogNotifier`].

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::notifier::{EmailMessage, Notifier};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@parkwise.local";

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    /// Defaults to 587.
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set.
    ///
    /// | Variable        | Required | Default                   |
    /// |-----------------|----------|---------------------------|
    /// | `SMTP_HOST`     | yes      | -                         |
    /// | `SMTP_PORT`     | no       | `587`                     |
    /// | `SMTP_FROM`     | no       | `noreply@parkwise.local`  |
    /// | `SMTP_USER`     | no       | -                         |
    /// | `SMTP_PASSWORD` | no       | -                         |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends notification emails via SMTP.
///
/// The transport is built once and reused; lettre pools connections
/// internally.
pub struct EmailDelivery {
    from_address: String,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailDelivery {
    /// Build the SMTP transport for `config`.
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (config.smtp_user, config.smtp_password) {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        Ok(Self {
            from_address: config.from_address,
            mailer: builder.build(),
        })
    }

    fn build_message(&self, message: &EmailMessage) -> Result<Message, EmailError> {
        Message::builder()
            .from(self.from_address.parse()?)
            .to(message.to.parse()?)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| EmailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Notifier for EmailDelivery {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        let email = self.build_message(message)?;
        self.mailer.send(email).await?;

        tracing::info!(to = %message.to, subject = %message.subject, "Notification email sent");
        Ok(())
    }

    fn channel(&self) -> &'static str {
        "smtp"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
