//! Daily reminder emails: long-parked vehicles and inactive users.

use std::sync::Arc;

use chrono::Utc;
use parkwise_core::types::Timestamp;
use parkwise_db::repositories::{HistoryRepo, UserRepo};
use parkwise_events::{templates, EmailMessage, Notifier};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::background::display_name;
use crate::config::JobsConfig;

/// Remind owners of vehicles parked for more than `threshold_hours`.
///
/// Returns the number of messages delivered. Delivery failures are logged
/// and skipped.
pub async fn send_long_parking_reminders(
    pool: &PgPool,
    notifier: &dyn Notifier,
    threshold_hours: i64,
    now: Timestamp,
) -> Result<usize, sqlx::Error> {
    let cutoff = now - chrono::Duration::hours(threshold_hours);
    let parked = HistoryRepo::list_parked_before(pool, cutoff).await?;

    let mut sent = 0;
    for booking in &parked {
        let message = templates::long_parking_reminder(
            &booking.username,
            display_name(booking.fullname.as_deref(), &booking.username),
            &booking.vehicle_no,
            &booking.lot_name,
            booking.spot_id,
            (now - booking.created_at).num_hours(),
        );
        if deliver(notifier, &message).await {
            sent += 1;
        }
    }

    tracing::info!(candidates = parked.len(), sent, "Long parking reminders sent");
    Ok(sent)
}

/// Remind users with no booking in the last `inactive_days` days and no
/// vehicle currently parked.
pub async fn send_inactivity_reminders(
    pool: &PgPool,
    notifier: &dyn Notifier,
    inactive_days: i64,
    now: Timestamp,
) -> Result<usize, sqlx::Error> {
    let cutoff = now - chrono::Duration::days(inactive_days);
    let users = UserRepo::list_inactive_since(pool, cutoff).await?;

    let mut sent = 0;
    for user in &users {
        let message = templates::inactivity_reminder(
            &user.username,
            display_name(user.fullname.as_deref(), &user.username),
            inactive_days,
        );
        if deliver(notifier, &message).await {
            sent += 1;
        }
    }

    tracing::info!(candidates = users.len(), sent, "Inactivity reminders sent");
    Ok(sent)
}

/// Send one message, logging failures. Returns whether it was delivered.
pub(crate) async fn deliver(notifier: &dyn Notifier, message: &EmailMessage) -> bool {
    match notifier.send(message).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                channel = notifier.channel(),
                to = %message.to,
                error = %e,
                "Notification delivery failed"
            );
            false
        }
    }
}

/// Run both reminder passes every `reminder_interval` until `cancel` is
/// triggered.
pub async fn run(
    pool: PgPool,
    notifier: Arc<dyn Notifier>,
    config: JobsConfig,
    cancel: CancellationToken,
) {
    tracing::info!(
        channel = notifier.channel(),
        long_parking_hours = config.long_parking_hours,
        inactivity_days = config.inactivity_days,
        interval_secs = config.reminder_interval.as_secs(),
        "Reminder job started"
    );

    let mut interval = tokio::time::interval(config.reminder_interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reminder job stopping");
                break;
            }
            _ = interval.tick() => {
                let now = Utc::now();
                if let Err(e) = send_long_parking_reminders(
                    &pool,
                    notifier.as_ref(),
                    config.long_parking_hours,
                    now,
                )
                .await
                {
                    tracing::error!(error = %e, "Long parking reminders failed");
                }
                if let Err(e) = send_inactivity_reminders(
                    &pool,
                    notifier.as_ref(),
                    config.inactivity_days,
                    now,
                )
                .await
                {
                    tracing::error!(error = %e, "Inactivity reminders failed");
                }
            }
        }
    }
}
