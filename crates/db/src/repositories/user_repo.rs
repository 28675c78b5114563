//! Repository for the `users` table.

use parkwise_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::status::{BookingStatus, Role};
use crate::models::user::{CreateUser, UpdateProfile, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, password_hash, role_id, fullname, address, pincode, \
                       created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, password_hash, role_id, fullname, address, pincode)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .bind(&input.fullname)
            .bind(&input.address)
            .bind(&input.pincode)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Update profile fields. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                fullname = COALESCE($2, fullname),
                address = COALESCE($3, address),
                pincode = COALESCE($4, pincode)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(input.fullname.as_deref().map(str::trim))
            .bind(input.address.as_deref().map(str::trim))
            .bind(input.pincode.as_deref().map(str::trim))
            .fetch_optional(pool)
            .await
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all regular (non-admin) users, most recently created first.
    pub async fn list_customers(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE role_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(Role::User.id())
            .fetch_all(pool)
            .await
    }

    /// Count regular (non-admin) users.
    pub async fn count_customers(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role_id = $1")
            .bind(Role::User.id())
            .fetch_one(pool)
            .await
    }

    /// Regular users with no booking since `cutoff` and no booking currently
    /// `Parked`.
    pub async fn list_inactive_since(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users u \
             WHERE u.role_id = $1 \
               AND NOT EXISTS ( \
                   SELECT 1 FROM parking_history h \
                   WHERE h.user_id = u.id AND (h.created_at >= $2 OR h.status_id = $3) \
               ) \
             ORDER BY u.id"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(Role::User.id())
            .bind(cutoff)
            .bind(BookingStatus::Parked.id())
            .fetch_all(pool)
            .await
    }

    /// Regular users who booked at least once in `[start, end)`.
    pub async fn list_active_between(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users u \
             WHERE u.role_id = $1 \
               AND EXISTS ( \
                   SELECT 1 FROM parking_history h \
                   WHERE h.user_id = u.id AND h.created_at >= $2 AND h.created_at < $3 \
               ) \
             ORDER BY u.id"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(Role::User.id())
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }
}
