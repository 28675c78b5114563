//! Handlers for browsing parking lots (any authenticated user).

use axum::extract::{Path, Query, State};
use axum::Json;
use parkwise_core::occupancy::{OccupancySnapshot, SpotState};
use parkwise_core::types::DbId;
use parkwise_db::models::lot::ParkingLot;
use parkwise_db::repositories::LotRepo;
use serde::{Deserialize, Serialize};

use crate::engine::occupancy;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query parameters for `GET /lots`.
#[derive(Debug, Default, Deserialize)]
pub struct LotSearchParams {
    /// Case-insensitive substring of name, address or pincode.
    pub search: Option<String>,
}

/// A lot together with its live availability.
#[derive(Debug, Serialize)]
pub struct LotAvailability {
    #[serde(flatten)]
    pub lot: ParkingLot,
    pub occupied_spots: i32,
    pub available_spots: i32,
    pub occupancy_rate: f64,
}

impl LotAvailability {
    pub fn new(lot: ParkingLot, snapshot: &OccupancySnapshot) -> Self {
        Self {
            lot,
            occupied_spots: snapshot.occupied_count(),
            available_spots: snapshot.available_count(),
            occupancy_rate: snapshot.occupancy_rate(),
        }
    }
}

/// Per-spot map of one lot.
#[derive(Debug, Serialize)]
pub struct SpotMap {
    pub lot_id: DbId,
    pub max_spots: i32,
    pub available_spots: i32,
    pub spots: Vec<SpotState>,
}

/// GET /api/v1/lots?search=
pub async fn list_lots(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<LotSearchParams>,
) -> AppResult<Json<Vec<LotAvailability>>> {
    let lots = LotRepo::list(&state.pool, params.search.as_deref()).await?;
    let mut snapshots = occupancy::snapshots_for(&state.pool, &lots).await?;

    let items = lots
        .into_iter()
        .map(|lot| {
            let snapshot = snapshots
                .remove(&lot.id)
                .unwrap_or_else(|| OccupancySnapshot::project(lot.max_spots, Vec::new()));
            LotAvailability::new(lot, &snapshot)
        })
        .collect();

    Ok(Json(items))
}

/// GET /api/v1/lots/{id}
pub async fn get_lot(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<LotAvailability>> {
    let (lot, snapshot) = occupancy::lot_snapshot(&state.pool, id).await?;
    Ok(Json(LotAvailability::new(lot, &snapshot)))
}

/// GET /api/v1/lots/{id}/spots
pub async fn spot_map(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<SpotMap>> {
    let (lot, snapshot) = occupancy::lot_snapshot(&state.pool, id).await?;
    Ok(Json(SpotMap {
        lot_id: lot.id,
        max_spots: lot.max_spots,
        available_spots: snapshot.available_count(),
        spots: snapshot.spot_states(),
    }))
}
