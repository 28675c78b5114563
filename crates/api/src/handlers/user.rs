//! Handlers for the `/user` resource: personal summary and profile.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use parkwise_core::billing::{compute_charge, ParkingCharge};
use parkwise_core::booking::holds_spot;
use parkwise_core::error::CoreError;
use parkwise_core::types::Timestamp;
use parkwise_db::models::history::BookingDetail;
use parkwise_db::models::status::BookingStatus;
use parkwise_db::models::user::{UpdateProfile, UserResponse};
use parkwise_db::repositories::{HistoryRepo, RoleRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::handlers::bookings::BookingDetailResponse;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Number of bookings listed under `recent_bookings`.
const SUMMARY_RECENT_BOOKINGS: i64 = 10;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// A booking with its (estimated, for active bookings) charge.
#[derive(Debug, Serialize)]
pub struct ChargedBooking {
    #[serde(flatten)]
    pub booking: BookingDetailResponse,
    pub charge: ParkingCharge,
}

impl ChargedBooking {
    /// Active bookings are charged up to `now`; closed ones up to their
    /// last status change.
    fn new(detail: BookingDetail, now: Timestamp) -> Self {
        let ended_at = if holds_spot(detail.status_id) {
            now
        } else {
            detail.updated_at
        };
        let charge = compute_charge(detail.created_at, ended_at, detail.price_per_hour);
        Self {
            booking: detail.into(),
            charge,
        }
    }
}

/// Response for `GET /user/summary`.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub total_bookings: i64,
    pub active_bookings: i64,
    pub completed_bookings: i64,
    pub expired_bookings: i64,
    pub current_parking: Vec<ChargedBooking>,
    pub recent_bookings: Vec<ChargedBooking>,
}

/// Request body for `PUT /user/password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/user/summary
pub async fn summary(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<UserSummary>> {
    let now = Utc::now();

    let counts = HistoryRepo::status_counts_for_user(&state.pool, auth.user_id).await?;
    let count_of = |status: BookingStatus| {
        counts
            .iter()
            .find(|c| c.status_id == status.id())
            .map_or(0, |c| c.count)
    };

    let active = HistoryRepo::list_active_for_user(&state.pool, auth.user_id).await?;
    let recent =
        HistoryRepo::list_for_user(&state.pool, auth.user_id, SUMMARY_RECENT_BOOKINGS).await?;

    Ok(Json(UserSummary {
        total_bookings: counts.iter().map(|c| c.count).sum(),
        active_bookings: count_of(BookingStatus::Parked),
        completed_bookings: count_of(BookingStatus::Completed),
        expired_bookings: count_of(BookingStatus::Expired),
        current_parking: active.into_iter().map(|d| ChargedBooking::new(d, now)).collect(),
        recent_bookings: recent.into_iter().map(|d| ChargedBooking::new(d, now)).collect(),
    }))
}

/// GET /api/v1/user/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(Json(UserResponse::from_user(user, role)))
}

/// PUT /api/v1/user/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<UserResponse>> {
    input.validate()?;
    let user = UserRepo::update_profile(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;
    tracing::info!(user_id = user.id, "Profile updated");
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(Json(UserResponse::from_user(user, role)))
}

/// PUT /api/v1/user/password
///
/// Returns 204 No Content on success.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    if input.new_password != input.confirm_password {
        return Err(AppError::Core(CoreError::Validation(
            "New password and confirmation do not match".into(),
        )));
    }
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;

    let current_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }

    let new_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &new_hash).await?;

    tracing::info!(user_id = user.id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}
