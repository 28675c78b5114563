//! Repository for the `parking_lots` table.
//!
//! Deleted lots keep their row (the ledger references them) and are hidden
//! from every query here via `deleted_at IS NULL`.

use parkwise_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::lot::{CreateParkingLot, ParkingLot, UpdateParkingLot};
use crate::repositories::contains_pattern;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, address, pincode, price_per_hour, max_spots, created_by, \
                       created_at, updated_at";

/// Provides CRUD operations and row locks for parking lots.
pub struct LotRepo;

impl LotRepo {
    /// Insert a new lot, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateParkingLot,
        created_by: Option<DbId>,
    ) -> Result<ParkingLot, sqlx::Error> {
        let query = format!(
            "INSERT INTO parking_lots (name, address, pincode, price_per_hour, max_spots, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParkingLot>(&query)
            .bind(input.name.trim())
            .bind(input.address.trim())
            .bind(input.pincode.trim())
            .bind(input.price_per_hour)
            .bind(input.max_spots)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a live lot by ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<ParkingLot>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM parking_lots WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, ParkingLot>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Read a live lot and hold an exclusive row lock on it until the
    /// enclosing transaction ends.
    ///
    /// Allocation, capacity changes and deletion all take this lock, so
    /// they are serialized per lot.
    pub async fn lock_for_update<'e, E>(
        executor: E,
        id: DbId,
    ) -> Result<Option<ParkingLot>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM parking_lots WHERE id = $1 AND deleted_at IS NULL FOR UPDATE"
        );
        sqlx::query_as::<_, ParkingLot>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List live lots in creation order, optionally filtered by a
    /// case-insensitive substring of name, address or pincode.
    pub async fn list(pool: &PgPool, search: Option<&str>) -> Result<Vec<ParkingLot>, sqlx::Error> {
        match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM parking_lots \
                     WHERE deleted_at IS NULL \
                       AND (name ILIKE $1 OR address ILIKE $1 OR pincode ILIKE $1) \
                     ORDER BY id"
                );
                sqlx::query_as::<_, ParkingLot>(&query)
                    .bind(contains_pattern(term))
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query =
                    format!("SELECT {COLUMNS} FROM parking_lots WHERE deleted_at IS NULL ORDER BY id");
                sqlx::query_as::<_, ParkingLot>(&query).fetch_all(pool).await
            }
        }
    }

    /// Apply a partial update. Only non-`None` fields are written.
    ///
    /// Returns `None` if the lot does not exist or is deleted.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &UpdateParkingLot,
    ) -> Result<Option<ParkingLot>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE parking_lots SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                pincode = COALESCE($4, pincode),
                price_per_hour = COALESCE($5, price_per_hour),
                max_spots = COALESCE($6, max_spots)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParkingLot>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.address.as_deref().map(str::trim))
            .bind(input.pincode.as_deref().map(str::trim))
            .bind(input.price_per_hour)
            .bind(input.max_spots)
            .fetch_optional(executor)
            .await
    }

    /// Mark a lot deleted. Returns `true` if a live row was updated.
    pub async fn soft_delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE parking_lots SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
