//! Parkwise outbound notifications.
//!
//! - [`Notifier`] is the seam between the scheduled jobs and whatever
//!   actually delivers a message.
//! - [`EmailDelivery`] sends over SMTP via `lettre`.
//! - [`LogNotifier`] and [`MemoryNotifier`] stand in when SMTP is not
//!   configured and in tests.
//! - [`templates`] renders the reminder and report messages.

pub mod delivery;
pub mod notifier;
pub mod templates;

pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use notifier::{EmailMessage, LogNotifier, MemoryNotifier, Notifier};
