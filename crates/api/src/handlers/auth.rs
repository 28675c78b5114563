//! Handlers for the `/auth` resource (register, login, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use parkwise_core::error::CoreError;
use parkwise_core::roles::ROLE_USER;
use parkwise_db::models::status::Role;
use parkwise_db::models::user::{CreateUser, UserResponse};
use parkwise_db::repositories::{RoleRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// The login name is the user's email address.
    #[validate(email)]
    pub username: String,
    pub password: String,
    #[validate(length(max = 100))]
    pub fullname: Option<String>,
    #[validate(length(max = 200))]
    pub address: Option<String>,
    #[validate(length(max = 10))]
    pub pincode: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a regular user account. Returns 201 with the new user.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input.validate()?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let username = input.username.trim().to_lowercase();
    if UserRepo::find_by_username(&state.pool, &username)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Username already registered".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username,
            password_hash,
            role_id: Role::User.id(),
            fullname: non_blank(input.fullname),
            address: non_blank(input.address),
            pincode: non_blank(input.pincode),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse::from_user(user, ROLE_USER)),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Returns a Bearer access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid username or password".into()));

    let user = UserRepo::find_by_username(&state.pool, &input.username.trim().to_lowercase())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::debug!(user_id = user.id, "Login rejected: wrong password");
        return Err(invalid());
    }

    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    let access_token = generate_access_token(user.id, &role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, role = %role, "User logged in");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.config.jwt.expires_in_secs(),
        user: UserResponse::from_user(user, role),
    }))
}

/// GET /api/v1/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(Json(UserResponse::from_user(user, role)))
}

/// Trim an optional text field, dropping it when blank.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
