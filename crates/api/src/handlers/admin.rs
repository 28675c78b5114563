//! Admin-only handlers: lot management, users, occupancy reports, vehicle
//! search and manual job triggers.
//!
//! Every handler takes [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use parkwise_core::billing::round_cents;
use parkwise_core::error::CoreError;
use parkwise_core::roles::ROLE_USER;
use parkwise_core::types::DbId;
use parkwise_db::models::lot::{CreateParkingLot, ParkingLot, UpdateParkingLot};
use parkwise_db::models::user::UserResponse;
use parkwise_db::repositories::{HistoryRepo, LotRepo, RoleRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::background::{activity_report, expiry_sweep, reminders};
use crate::engine::{lot_registry, occupancy};
use crate::error::{AppError, AppResult};
use crate::handlers::bookings::BookingDetailResponse;
use crate::handlers::LimitParams;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Maximum number of vehicle search results.
const VEHICLE_SEARCH_LIMIT: i64 = 10;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Occupancy and revenue of one lot.
#[derive(Debug, Serialize)]
pub struct LotOccupancy {
    pub lot_id: DbId,
    pub name: String,
    pub price_per_hour: f64,
    pub max_spots: i32,
    pub occupied_spots: i32,
    pub available_spots: i32,
    pub occupancy_rate: f64,
    /// `occupied_spots * price_per_hour`.
    pub hourly_revenue: f64,
}

/// Response for `GET /admin/summary`.
#[derive(Debug, Serialize)]
pub struct AdminSummary {
    pub total_lots: usize,
    pub total_spots: i64,
    pub occupied_spots: i64,
    pub available_spots: i64,
    pub total_users: i64,
    pub hourly_revenue: f64,
    pub lots: Vec<LotOccupancy>,
}

/// Response for `GET /admin/users/{id}`.
#[derive(Debug, Serialize)]
pub struct AdminUserDetail {
    pub user: UserResponse,
    pub bookings: Vec<BookingDetailResponse>,
}

/// Query parameters for `GET /admin/search/vehicles`.
#[derive(Debug, Deserialize)]
pub struct VehicleSearchParams {
    pub q: Option<String>,
}

/// Response for `POST /admin/jobs/expire`.
#[derive(Debug, Serialize)]
pub struct ExpiryResult {
    pub expired: usize,
}

/// Response for `POST /admin/jobs/reminders`.
#[derive(Debug, Serialize)]
pub struct ReminderResult {
    pub long_parking: usize,
    pub inactivity: usize,
}

/// Response for `POST /admin/jobs/monthly-report`.
#[derive(Debug, Serialize)]
pub struct ReportResult {
    pub sent: usize,
}

// ---------------------------------------------------------------------------
// Lots
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/lots
pub async fn create_lot(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateParkingLot>,
) -> AppResult<(StatusCode, Json<ParkingLot>)> {
    let lot = lot_registry::create_lot(&state.pool, &input, Some(admin.user_id)).await?;
    Ok((StatusCode::CREATED, Json(lot)))
}

/// PUT /api/v1/admin/lots/{id}
pub async fn update_lot(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateParkingLot>,
) -> AppResult<Json<ParkingLot>> {
    let lot = lot_registry::update_lot(&state.pool, id, &input).await?;
    Ok(Json(lot))
}

/// DELETE /api/v1/admin/lots/{id}
pub async fn delete_lot(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    lot_registry::delete_lot(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list_customers(&state.pool).await?;
    Ok(Json(
        users
            .into_iter()
            .map(|u| UserResponse::from_user(u, ROLE_USER))
            .collect(),
    ))
}

/// GET /api/v1/admin/users/{id}?limit=
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<AdminUserDetail>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    let bookings = HistoryRepo::list_for_user(&state.pool, id, params.resolve()).await?;

    Ok(Json(AdminUserDetail {
        user: UserResponse::from_user(user, role),
        bookings: bookings.into_iter().map(Into::into).collect(),
    }))
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/summary
///
/// Occupancy per lot and the revenue currently accruing per hour.
pub async fn summary(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<AdminSummary>> {
    let lots = LotRepo::list(&state.pool, None).await?;
    let snapshots = occupancy::snapshots_for(&state.pool, &lots).await?;
    let total_users = UserRepo::count_customers(&state.pool).await?;

    let per_lot: Vec<LotOccupancy> = lots
        .iter()
        .filter_map(|lot| {
            let snapshot = snapshots.get(&lot.id)?;
            Some(LotOccupancy {
                lot_id: lot.id,
                name: lot.name.clone(),
                price_per_hour: lot.price_per_hour,
                max_spots: lot.max_spots,
                occupied_spots: snapshot.occupied_count(),
                available_spots: snapshot.available_count(),
                occupancy_rate: snapshot.occupancy_rate(),
                hourly_revenue: round_cents(
                    f64::from(snapshot.occupied_count()) * lot.price_per_hour,
                ),
            })
        })
        .collect();

    let total_spots = per_lot.iter().map(|l| i64::from(l.max_spots)).sum();
    let occupied_spots = per_lot.iter().map(|l| i64::from(l.occupied_spots)).sum();
    let available_spots = per_lot.iter().map(|l| i64::from(l.available_spots)).sum();
    let hourly_revenue = round_cents(per_lot.iter().map(|l| l.hourly_revenue).sum());

    Ok(Json(AdminSummary {
        total_lots: per_lot.len(),
        total_spots,
        occupied_spots,
        available_spots,
        total_users,
        hourly_revenue,
        lots: per_lot,
    }))
}

/// GET /api/v1/admin/search/vehicles?q=
///
/// Partial, case-insensitive match on vehicle number, newest first.
pub async fn search_vehicles(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<VehicleSearchParams>,
) -> AppResult<Json<Vec<BookingDetailResponse>>> {
    let term = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::BadRequest("Query parameter 'q' is required".into()))?;

    let results = HistoryRepo::search_by_vehicle(&state.pool, term, VEHICLE_SEARCH_LIMIT).await?;
    Ok(Json(results.into_iter().map(Into::into).collect()))
}

// ---------------------------------------------------------------------------
// Job triggers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/jobs/expire
pub async fn run_expiry(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<ExpiryResult>> {
    tracing::info!(admin_id = admin.user_id, "Manual expiry sweep triggered");
    let expired =
        expiry_sweep::sweep_once(&state.pool, state.config.jobs.booking_expiry_hours, Utc::now())
            .await?;
    Ok(Json(ExpiryResult {
        expired: expired.len(),
    }))
}

/// POST /api/v1/admin/jobs/reminders
pub async fn run_reminders(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<ReminderResult>> {
    tracing::info!(admin_id = admin.user_id, "Manual reminder run triggered");
    let now = Utc::now();
    let jobs = &state.config.jobs;

    let long_parking = reminders::send_long_parking_reminders(
        &state.pool,
        state.notifier.as_ref(),
        jobs.long_parking_hours,
        now,
    )
    .await?;
    let inactivity = reminders::send_inactivity_reminders(
        &state.pool,
        state.notifier.as_ref(),
        jobs.inactivity_days,
        now,
    )
    .await?;

    Ok(Json(ReminderResult {
        long_parking,
        inactivity,
    }))
}

/// POST /api/v1/admin/jobs/monthly-report
///
/// Sends the previous month's report immediately, regardless of the date.
pub async fn run_monthly_report(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<ReportResult>> {
    tracing::info!(admin_id = admin.user_id, "Manual monthly report triggered");
    let sent =
        activity_report::send_monthly_reports(&state.pool, state.notifier.as_ref(), Utc::now())
            .await?;
    Ok(Json(ReportResult { sent }))
}
