//! The notification seam used by the scheduled jobs.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::delivery::email::EmailError;

/// A rendered plain-text message addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivers rendered messages.
///
/// Implementations must not touch the booking ledger; they only receive
/// data the jobs have already read.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message.
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError>;

    /// Short name for logs (`"smtp"`, `"log"`, ...).
    fn channel(&self) -> &'static str;
}

/// Writes messages to the log instead of sending them. Used when SMTP is
/// not configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "SMTP not configured, notification logged only"
        );
        Ok(())
    }

    fn channel(&self) -> &'static str {
        "log"
    }
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<EmailMessage>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all messages sent so far, in send order.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message.clone());
        Ok(())
    }

    fn channel(&self) -> &'static str {
        "memory"
    }
}
