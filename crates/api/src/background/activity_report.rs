//! Monthly activity report for the previous calendar month.
//!
//! The loop wakes every `reminder_interval` and sends the report on the
//! first day of a month, at most once per month per process.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use parkwise_core::activity_report::{previous_month_window, summarize, ReportBooking};
use parkwise_core::types::Timestamp;
use parkwise_db::repositories::{HistoryRepo, UserRepo};
use parkwise_events::{templates, Notifier};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::background::display_name;
use crate::background::reminders::deliver;
use crate::config::JobsConfig;

/// Calendar month as `(year, month)`.
type MonthKey = (i32, u32);

/// Email every user who booked during the month before `now` a summary of
/// that month. Returns the number of messages delivered.
pub async fn send_monthly_reports(
    pool: &PgPool,
    notifier: &dyn Notifier,
    now: Timestamp,
) -> Result<usize, sqlx::Error> {
    let window = previous_month_window(now);
    let users = UserRepo::list_active_between(pool, window.start, window.end).await?;

    let mut sent = 0;
    for user in &users {
        let bookings: Vec<ReportBooking> =
            HistoryRepo::list_for_user_between(pool, user.id, window.start, window.end)
                .await?
                .into_iter()
                .map(|detail| ReportBooking {
                    lot_name: detail.lot_name,
                    price_per_hour: detail.price_per_hour,
                    vehicle_no: detail.vehicle_no,
                    booked_at: detail.created_at,
                })
                .collect();

        let summary = summarize(&bookings);
        let message = templates::monthly_report(
            &user.username,
            display_name(user.fullname.as_deref(), &user.username),
            &window.label,
            &summary,
            &bookings,
        );
        if deliver(notifier, &message).await {
            sent += 1;
        }
    }

    tracing::info!(period = %window.label, candidates = users.len(), sent, "Monthly reports sent");
    Ok(sent)
}

/// Whether the report for the month containing `now` is still due.
fn report_due(now: Timestamp, last_sent: Option<MonthKey>) -> bool {
    now.day() == 1 && last_sent != Some((now.year(), now.month()))
}

/// Run the monthly report loop until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    notifier: Arc<dyn Notifier>,
    config: JobsConfig,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = config.reminder_interval.as_secs(),
        "Monthly report job started"
    );

    let mut interval = tokio::time::interval(config.reminder_interval);
    let mut last_sent: Option<MonthKey> = None;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Monthly report job stopping");
                break;
            }
            _ = interval.tick() => {
                let now = Utc::now();
                if !report_due(now, last_sent) {
                    continue;
                }
                match send_monthly_reports(&pool, notifier.as_ref(), now).await {
                    Ok(_) => last_sent = Some((now.year(), now.month())),
                    Err(e) => tracing::error!(error = %e, "Monthly report failed"),
                }
            }
        }
    }
}
