//! Startup provisioning of the initial administrator.

use parkwise_db::models::status::Role;
use parkwise_db::models::user::{CreateUser, User};
use parkwise_db::repositories::UserRepo;
use sqlx::PgPool;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};

/// Credentials for the administrator created on first start.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
}

impl AdminSeed {
    /// Read `ADMIN_USERNAME` and `ADMIN_PASSWORD`. Returns `None` unless
    /// both are set and non-empty.
    pub fn from_env() -> Option<Self> {
        let username = std::env::var("ADMIN_USERNAME").ok()?.trim().to_lowercase();
        let password = std::env::var("ADMIN_PASSWORD").ok()?;
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { username, password })
    }
}

/// Create the administrator unless a user with that username already
/// exists. Returns the user either way. An existing account is left as is,
/// including its role and password.
pub async fn ensure_admin(pool: &PgPool, seed: &AdminSeed) -> AppResult<User> {
    if let Some(existing) = UserRepo::find_by_username(pool, &seed.username).await? {
        tracing::debug!(user_id = existing.id, "Admin account already present");
        return Ok(existing);
    }

    let password_hash = hash_password(&seed.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let admin = UserRepo::create(
        pool,
        &CreateUser {
            username: seed.username.clone(),
            password_hash,
            role_id: Role::Admin.id(),
            fullname: Some("Administrator".to_string()),
            address: None,
            pincode: None,
        },
    )
    .await?;

    tracing::info!(user_id = admin.id, username = %admin.username, "Admin account created");
    Ok(admin)
}
