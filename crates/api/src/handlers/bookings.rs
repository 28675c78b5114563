//! Handlers for the `/bookings` resource: book, release and list.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use parkwise_core::billing::ParkingCharge;
use parkwise_core::types::DbId;
use parkwise_db::models::history::{BookingDetail, ParkingHistory};
use parkwise_db::repositories::HistoryRepo;
use serde::{Deserialize, Serialize};

use crate::engine::{allocator, release};
use crate::error::AppResult;
use crate::handlers::LimitParams;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /bookings`.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub lot_id: DbId,
    pub vehicle_no: String,
}

/// A ledger entry with its status name.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    #[serde(flatten)]
    pub entry: ParkingHistory,
    pub status: &'static str,
}

impl From<ParkingHistory> for BookingResponse {
    fn from(entry: ParkingHistory) -> Self {
        let status = entry.status();
        Self { entry, status }
    }
}

/// A ledger entry joined with lot and owner, with its status name.
#[derive(Debug, Serialize)]
pub struct BookingDetailResponse {
    #[serde(flatten)]
    pub detail: BookingDetail,
    pub status: &'static str,
}

impl From<BookingDetail> for BookingDetailResponse {
    fn from(detail: BookingDetail) -> Self {
        let status = detail.status();
        Self { detail, status }
    }
}

/// Response for `POST /bookings/{id}/release`.
#[derive(Debug, Serialize)]
pub struct ReleaseResponse {
    pub booking: BookingResponse,
    pub lot_name: String,
    pub charge: ParkingCharge,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/bookings
///
/// Allocate the lowest free spot in the lot. Returns 201 with the entry.
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingResponse>)> {
    let entry = allocator::allocate(&state.pool, input.lot_id, &input.vehicle_no, auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// POST /api/v1/bookings/{id}/release
pub async fn release_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ReleaseResponse>> {
    let released = release::release(&state.pool, id, auth.user_id).await?;
    Ok(Json(ReleaseResponse {
        booking: released.entry.into(),
        lot_name: released.lot_name,
        charge: released.charge,
    }))
}

/// GET /api/v1/bookings?limit=
///
/// The caller's bookings, newest first.
pub async fn list_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<Vec<BookingDetailResponse>>> {
    let bookings = HistoryRepo::list_for_user(&state.pool, auth.user_id, params.resolve()).await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}
