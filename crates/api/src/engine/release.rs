//! Booking release.

use parkwise_core::billing::{compute_charge, ParkingCharge};
use parkwise_core::booking::state_machine::validate_transition;
use parkwise_core::booking::STATUS_COMPLETED;
use parkwise_core::error::CoreError;
use parkwise_core::types::DbId;
use parkwise_db::models::history::ParkingHistory;
use parkwise_db::repositories::HistoryRepo;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;

/// Outcome of a successful release.
#[derive(Debug, Clone, Serialize)]
pub struct Release {
    pub entry: ParkingHistory,
    pub lot_name: String,
    /// Informational only; never stored.
    pub charge: ParkingCharge,
}

/// Close a user's `Parked` booking as `Completed`.
///
/// Unknown ids, bookings of other users and bookings that are no longer
/// `Parked` all yield `NotFound`, so a repeated release fails the same way
/// as a release of a booking that never existed.
pub async fn release(pool: &PgPool, booking_id: DbId, user_id: DbId) -> AppResult<Release> {
    let not_found = || CoreError::NotFound {
        entity: "Booking",
        id: booking_id,
    };

    let current = HistoryRepo::find_by_id(pool, booking_id)
        .await?
        .filter(|entry| entry.user_id == user_id)
        .ok_or_else(not_found)?;

    if let Err(reason) = validate_transition(current.status_id, STATUS_COMPLETED) {
        tracing::debug!(booking_id, user_id, %reason, "Release rejected");
        return Err(not_found().into());
    }

    // The update re-checks `Parked`; losing a race with another release or
    // the expiry sweep returns no row.
    let entry = HistoryRepo::complete(pool, booking_id, user_id)
        .await?
        .ok_or_else(not_found)?;

    let detail = HistoryRepo::find_detail(pool, booking_id)
        .await?
        .ok_or_else(not_found)?;

    let charge = compute_charge(entry.created_at, entry.updated_at, detail.price_per_hour);

    tracing::info!(
        booking_id,
        user_id,
        lot_id = entry.lot_id,
        spot_id = entry.spot_id,
        duration_hours = charge.duration_hours,
        total_cost = charge.total_cost,
        "Booking released"
    );

    Ok(Release {
        entry,
        lot_name: detail.lot_name,
        charge,
    })
}
