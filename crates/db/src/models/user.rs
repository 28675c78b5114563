//! User entity model and DTOs.

use parkwise_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::status::StatusId;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    /// Login name; also the user's email address.
    pub username: String,
    pub password_hash: String,
    pub role_id: StatusId,
    pub fullname: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    /// Resolved role name (e.g. `"admin"`, `"user"`).
    pub role: String,
    pub fullname: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<String>,
    pub created_at: Timestamp,
}

impl UserResponse {
    pub fn from_user(user: User, role: impl Into<String>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: role.into(),
            fullname: user.fullname,
            address: user.address,
            pincode: user.pincode,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
    pub role_id: StatusId,
    pub fullname: Option<String>,
    pub address: Option<String>,
    pub pincode: Option<String>,
}

/// DTO for a user editing their own profile. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfile {
    #[validate(length(max = 100))]
    pub fullname: Option<String>,
    #[validate(length(max = 200))]
    pub address: Option<String>,
    #[validate(length(max = 10))]
    pub pincode: Option<String>,
}
