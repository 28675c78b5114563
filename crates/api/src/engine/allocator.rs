//! Spot allocation.
//!
//! One allocation is a single READ COMMITTED transaction:
//!
//! 1. lock the lot row (`FOR UPDATE`), which serializes allocations,
//!    capacity changes and deletion of the same lot, then normalize the
//!    vehicle number;
//! 2. reject the vehicle if it already has a `Parked` entry anywhere;
//! 3. project occupancy and pick the lowest free spot;
//! 4. append the `Parked` entry and commit.
//!
//! Allocations in different lots do not share a lock, so the same vehicle
//! can race itself across two lots. The partial unique indexes catch that:
//! the loser sees a unique violation and the whole allocation is re-run, at
//! which point step 2 reports the conflict properly.

use parkwise_core::error::CoreError;
use parkwise_core::types::DbId;
use parkwise_core::vehicle::normalize_vehicle_no;
use parkwise_db::models::history::{AppendEntry, ParkingHistory};
use parkwise_db::repositories::{HistoryRepo, LotRepo};
use sqlx::PgPool;

use crate::engine::occupancy;
use crate::error::{AppError, AppResult};

/// Upper bound on allocation attempts after unique-constraint races.
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 5;

/// Assign the lowest free spot of `lot_id` to `raw_vehicle_no`.
///
/// Errors, in the order they are checked: `NotFound` (lot), `Validation`
/// (vehicle number), `Conflict` (vehicle already parked, or races
/// exhausted), `Capacity` (lot full). A failed allocation leaves no ledger
/// row.
pub async fn allocate(
    pool: &PgPool,
    lot_id: DbId,
    raw_vehicle_no: &str,
    user_id: DbId,
) -> AppResult<ParkingHistory> {
    for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
        match try_allocate(pool, lot_id, raw_vehicle_no, user_id).await {
            Ok(entry) => {
                tracing::info!(
                    booking_id = entry.id,
                    lot_id,
                    spot_id = entry.spot_id,
                    vehicle_no = %entry.vehicle_no,
                    user_id,
                    attempt,
                    "Spot allocated"
                );
                return Ok(entry);
            }
            Err(AppError::Database(err)) if parkwise_db::unique_violation(&err).is_some() => {
                tracing::warn!(
                    lot_id,
                    vehicle_no = raw_vehicle_no,
                    attempt,
                    constraint = parkwise_db::unique_violation(&err).unwrap_or_default(),
                    "Allocation lost a race, retrying"
                );
            }
            Err(e) => return Err(e),
        }
    }

    tracing::warn!(lot_id, vehicle_no = raw_vehicle_no, "Allocation attempts exhausted");
    Err(CoreError::Conflict("lost allocation race".into()).into())
}

async fn try_allocate(
    pool: &PgPool,
    lot_id: DbId,
    raw_vehicle_no: &str,
    user_id: DbId,
) -> AppResult<ParkingHistory> {
    // Dropping `tx` on any early return rolls it back.
    let mut tx = pool.begin().await?;

    let lot = LotRepo::lock_for_update(&mut *tx, lot_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ParkingLot",
            id: lot_id,
        })?;

    let vehicle_no = normalize_vehicle_no(raw_vehicle_no)?;

    if HistoryRepo::find_active_by_vehicle(&mut *tx, &vehicle_no)
        .await?
        .is_some()
    {
        return Err(CoreError::Conflict("vehicle already parked".into()).into());
    }

    let snapshot = occupancy::snapshot(&mut *tx, &lot).await?;
    let spot_id = snapshot
        .first_free_spot()
        .ok_or_else(|| CoreError::Capacity("no spots available".into()))?;

    let entry = HistoryRepo::append(
        &mut *tx,
        &AppendEntry {
            user_id,
            lot_id,
            spot_id,
            vehicle_no,
        },
    )
    .await?;

    tx.commit().await?;
    Ok(entry)
}
