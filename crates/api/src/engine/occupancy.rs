//! Occupancy projection backed by the ledger's latest-entry-per-spot query.

use std::collections::{BTreeSet, HashMap};

use parkwise_core::error::CoreError;
use parkwise_core::occupancy::{OccupancySnapshot, SpotObservation};
use parkwise_core::types::{DbId, SpotNumber};
use parkwise_db::models::lot::ParkingLot;
use parkwise_db::repositories::{HistoryRepo, LotRepo};
use sqlx::{PgExecutor, PgPool};

use crate::error::AppResult;

/// Project the current snapshot of an already-loaded lot.
///
/// Takes any executor so the allocator can run it inside its transaction.
pub async fn snapshot<'e, E>(executor: E, lot: &ParkingLot) -> Result<OccupancySnapshot, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let latest = HistoryRepo::latest_per_spot(executor, lot.id, lot.max_spots).await?;
    Ok(OccupancySnapshot::project(
        lot.max_spots,
        latest.into_iter().map(SpotObservation::from),
    ))
}

/// Load a live lot and its snapshot. `NotFound` for unknown or deleted lots.
pub async fn lot_snapshot(pool: &PgPool, lot_id: DbId) -> AppResult<(ParkingLot, OccupancySnapshot)> {
    let lot = LotRepo::find_by_id(pool, lot_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ParkingLot",
            id: lot_id,
        })?;
    let snapshot = snapshot(pool, &lot).await?;
    Ok((lot, snapshot))
}

/// Spot numbers currently occupied in a lot.
pub async fn occupied_spots(pool: &PgPool, lot_id: DbId) -> AppResult<BTreeSet<SpotNumber>> {
    let (_, snapshot) = lot_snapshot(pool, lot_id).await?;
    Ok(snapshot.occupied)
}

/// Snapshots for many lots with a single ledger query.
///
/// Every lot in `lots` has an entry in the result, empty lots included.
pub async fn snapshots_for(
    pool: &PgPool,
    lots: &[ParkingLot],
) -> Result<HashMap<DbId, OccupancySnapshot>, sqlx::Error> {
    let ids: Vec<DbId> = lots.iter().map(|lot| lot.id).collect();
    let rows = HistoryRepo::latest_per_spot_many(pool, &ids).await?;

    let mut by_lot: HashMap<DbId, Vec<SpotObservation>> = HashMap::with_capacity(lots.len());
    for row in rows {
        by_lot.entry(row.lot_id).or_default().push(row.into());
    }

    Ok(lots
        .iter()
        .map(|lot| {
            let observations = by_lot.remove(&lot.id).unwrap_or_default();
            (lot.id, OccupancySnapshot::project(lot.max_spots, observations))
        })
        .collect())
}
