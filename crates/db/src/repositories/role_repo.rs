//! Repository for the `roles` lookup table.

use sqlx::PgPool;

use crate::models::status::StatusId;

/// Provides read operations for roles.
pub struct RoleRepo;

impl RoleRepo {
    /// Find a role's name by its ID.
    pub async fn find_name(pool: &PgPool, id: StatusId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT name FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a role's ID by its name (case-sensitive).
    pub async fn find_id_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<StatusId>, sqlx::Error> {
        sqlx::query_scalar::<_, StatusId>("SELECT id FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a role ID to its name, returning `"unknown"` if the ID is missing.
    pub async fn resolve_name(pool: &PgPool, role_id: StatusId) -> Result<String, sqlx::Error> {
        Ok(Self::find_name(pool, role_id)
            .await?
            .unwrap_or_else(|| "unknown".to_string()))
    }
}
