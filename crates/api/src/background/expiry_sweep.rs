//! Periodic expiry of stale bookings.
//!
//! `Parked` entries older than `booking_expiry_hours` move to `Expired`,
//! which frees their spot for the occupancy projector.

use chrono::Utc;
use parkwise_core::types::Timestamp;
use parkwise_db::models::history::ParkingHistory;
use parkwise_db::repositories::HistoryRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::config::JobsConfig;

/// Expire every `Parked` entry created more than `expiry_hours` before `now`.
pub async fn sweep_once(
    pool: &PgPool,
    expiry_hours: i64,
    now: Timestamp,
) -> Result<Vec<ParkingHistory>, sqlx::Error> {
    let cutoff = now - chrono::Duration::hours(expiry_hours);
    let expired = HistoryRepo::expire_older_than(pool, cutoff).await?;

    for entry in &expired {
        tracing::info!(
            booking_id = entry.id,
            lot_id = entry.lot_id,
            spot_id = entry.spot_id,
            vehicle_no = %entry.vehicle_no,
            "Booking expired"
        );
    }

    Ok(expired)
}

/// Run the expiry loop until `cancel` is triggered.
pub async fn run(pool: PgPool, config: JobsConfig, cancel: CancellationToken) {
    tracing::info!(
        expiry_hours = config.booking_expiry_hours,
        interval_secs = config.expiry_sweep_interval.as_secs(),
        "Expiry sweep started"
    );

    let mut interval = tokio::time::interval(config.expiry_sweep_interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Expiry sweep stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep_once(&pool, config.booking_expiry_hours, Utc::now()).await {
                    Ok(expired) if !expired.is_empty() => {
                        tracing::info!(expired = expired.len(), "Expiry sweep: bookings expired");
                    }
                    Ok(_) => tracing::debug!("Expiry sweep: nothing to expire"),
                    Err(e) => tracing::error!(error = %e, "Expiry sweep failed"),
                }
            }
        }
    }
}
