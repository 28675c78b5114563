//! Background tasks and scheduled jobs.
//!
//! Each submodule provides a long-running `run` function intended to be
//! spawned via `tokio::spawn`, plus the single-pass function it calls on
//! every tick (also used by the admin job triggers). All loops accept a
//! [`CancellationToken`](tokio_util::sync::CancellationToken) for graceful
//! shutdown.
//!
//! The jobs read the ledger and hand rendered messages to the
//! [`Notifier`](parkwise_events::Notifier); only the expiry sweep writes,
//! and only through the conditional `Parked -> Expired` update.

pub mod activity_report;
pub mod expiry_sweep;
pub mod reminders;

/// Name used to greet a user: full name when set, else the username.
pub(crate) fn display_name<'a>(fullname: Option<&'a str>, username: &'a str) -> &'a str {
    fullname
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(username)
}
