//! Parking lot registry: validated create, update and delete.
//!
//! Update and delete take the same row lock as the allocator, so a capacity
//! check or an active-booking count cannot be invalidated by a concurrent
//! allocation in the same lot.

use parkwise_core::error::CoreError;
use parkwise_core::lot::{
    ensure_deletable, require_non_blank, validate_capacity_change, validate_price_per_hour,
};
use parkwise_core::types::DbId;
use parkwise_db::models::lot::{CreateParkingLot, ParkingLot, UpdateParkingLot};
use parkwise_db::repositories::{HistoryRepo, LotRepo};
use sqlx::PgPool;
use validator::Validate;

use crate::error::AppResult;

fn lot_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "ParkingLot",
        id,
    }
}

/// Validate and insert a new lot.
pub async fn create_lot(
    pool: &PgPool,
    input: &CreateParkingLot,
    created_by: Option<DbId>,
) -> AppResult<ParkingLot> {
    input.validate()?;
    require_non_blank("name", &input.name)?;
    require_non_blank("address", &input.address)?;
    require_non_blank("pincode", &input.pincode)?;
    validate_price_per_hour(input.price_per_hour)?;
    if input.max_spots < 1 {
        return Err(CoreError::Validation("max_spots must be at least 1".into()).into());
    }

    let lot = LotRepo::create(pool, input, created_by).await?;
    tracing::info!(lot_id = lot.id, name = %lot.name, max_spots = lot.max_spots, "Parking lot created");
    Ok(lot)
}

/// Apply a partial update to a lot.
///
/// Shrinking `max_spots` below the highest occupied spot is a `Conflict`.
pub async fn update_lot(pool: &PgPool, id: DbId, input: &UpdateParkingLot) -> AppResult<ParkingLot> {
    input.validate()?;
    for (field, value) in [
        ("name", &input.name),
        ("address", &input.address),
        ("pincode", &input.pincode),
    ] {
        if let Some(value) = value {
            require_non_blank(field, value)?;
        }
    }
    if let Some(price) = input.price_per_hour {
        validate_price_per_hour(price)?;
    }

    let mut tx = pool.begin().await?;

    let current = LotRepo::lock_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| lot_not_found(id))?;

    if let Some(max_spots) = input.max_spots {
        if max_spots < current.max_spots {
            let highest = HistoryRepo::max_active_spot(&mut *tx, id).await?;
            validate_capacity_change(max_spots, highest)?;
        } else {
            validate_capacity_change(max_spots, None)?;
        }
    }

    let lot = LotRepo::update(&mut *tx, id, input)
        .await?
        .ok_or_else(|| lot_not_found(id))?;
    tx.commit().await?;

    tracing::info!(lot_id = id, max_spots = lot.max_spots, "Parking lot updated");
    Ok(lot)
}

/// Soft-delete a lot. Refused while any booking in it is `Parked`.
pub async fn delete_lot(pool: &PgPool, id: DbId) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    LotRepo::lock_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| lot_not_found(id))?;

    let active = HistoryRepo::count_active_for_lot(&mut *tx, id).await?;
    ensure_deletable(active)?;

    if !LotRepo::soft_delete(&mut *tx, id).await? {
        return Err(lot_not_found(id).into());
    }
    tx.commit().await?;

    tracing::info!(lot_id = id, "Parking lot deleted");
    Ok(())
}
