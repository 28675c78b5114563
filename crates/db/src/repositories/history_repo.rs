//! Repository for the `parking_history` booking ledger.
//!
//! The ledger is append-only: rows are inserted as `Parked` and the only
//! update ever issued is a conditional `Parked -> Completed | Expired`
//! transition. Both uniqueness invariants (one `Parked` entry per spot, one
//! per vehicle) are partial unique indexes, so a concurrent writer that
//! slips past an application-level check still fails with SQLSTATE 23505.

use parkwise_core::types::{DbId, SpotNumber, Timestamp};
use sqlx::{PgExecutor, PgPool};

use crate::models::history::{AppendEntry, BookingDetail, ParkingHistory, SpotLatest, StatusCount};
use crate::models::status::BookingStatus;
use crate::repositories::contains_pattern;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, lot_id, spot_id, vehicle_no, status_id, created_at, updated_at";

/// Joined columns for [`BookingDetail`]; `h` = history, `l` = lot, `u` = user.
const DETAIL_COLUMNS: &str = "h.id, h.user_id, u.username, u.fullname, h.lot_id, \
                              l.name AS lot_name, l.address AS lot_address, l.price_per_hour, \
                              h.spot_id, h.vehicle_no, h.status_id, h.created_at, h.updated_at";

const DETAIL_FROM: &str = "parking_history h \
                           JOIN parking_lots l ON l.id = h.lot_id \
                           JOIN users u ON u.id = h.user_id";

/// Provides append, projection and status transitions over the ledger.
pub struct HistoryRepo;

impl HistoryRepo {
    // -- Ledger core ---------------------------------------------------------

    /// Append a new `Parked` entry, returning the created row.
    ///
    /// Fails with a unique violation on `uq_parking_history_active_spot` or
    /// `uq_parking_history_active_vehicle` if the spot or vehicle is already
    /// held.
    pub async fn append<'e, E>(executor: E, entry: &AppendEntry) -> Result<ParkingHistory, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO parking_history (user_id, lot_id, spot_id, vehicle_no, status_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParkingHistory>(&query)
            .bind(entry.user_id)
            .bind(entry.lot_id)
            .bind(entry.spot_id)
            .bind(&entry.vehicle_no)
            .bind(BookingStatus::Parked.id())
            .fetch_one(executor)
            .await
    }

    /// The latest entry of every spot in `1..=capacity` that has any history.
    ///
    /// Latest means greatest `created_at`, ties broken by greatest `id`.
    pub async fn latest_per_spot<'e, E>(
        executor: E,
        lot_id: DbId,
        capacity: i32,
    ) -> Result<Vec<SpotLatest>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, SpotLatest>(
            "SELECT DISTINCT ON (spot_id) lot_id, id, spot_id, status_id, created_at \
             FROM parking_history \
             WHERE lot_id = $1 AND spot_id BETWEEN 1 AND $2 \
             ORDER BY spot_id, created_at DESC, id DESC",
        )
        .bind(lot_id)
        .bind(capacity)
        .fetch_all(executor)
        .await
    }

    /// [`Self::latest_per_spot`] for several lots in one round trip.
    ///
    /// Capacity bounds are not applied here; the projector discards spots
    /// outside each lot's range.
    pub async fn latest_per_spot_many(
        pool: &PgPool,
        lot_ids: &[DbId],
    ) -> Result<Vec<SpotLatest>, sqlx::Error> {
        sqlx::query_as::<_, SpotLatest>(
            "SELECT DISTINCT ON (lot_id, spot_id) lot_id, id, spot_id, status_id, created_at \
             FROM parking_history \
             WHERE lot_id = ANY($1) \
             ORDER BY lot_id, spot_id, created_at DESC, id DESC",
        )
        .bind(lot_ids)
        .fetch_all(pool)
        .await
    }

    /// The `Parked` entry for a (normalized) vehicle number, in any lot.
    pub async fn find_active_by_vehicle<'e, E>(
        executor: E,
        vehicle_no: &str,
    ) -> Result<Option<ParkingHistory>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM parking_history WHERE vehicle_no = $1 AND status_id = $2"
        );
        sqlx::query_as::<_, ParkingHistory>(&query)
            .bind(vehicle_no)
            .bind(BookingStatus::Parked.id())
            .fetch_optional(executor)
            .await
    }

    /// Find an entry by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ParkingHistory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parking_history WHERE id = $1");
        sqlx::query_as::<_, ParkingHistory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Number of `Parked` entries in a lot.
    pub async fn count_active_for_lot<'e, E>(executor: E, lot_id: DbId) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM parking_history WHERE lot_id = $1 AND status_id = $2",
        )
        .bind(lot_id)
        .bind(BookingStatus::Parked.id())
        .fetch_one(executor)
        .await
    }

    /// Highest spot number currently `Parked` in a lot, if any.
    pub async fn max_active_spot<'e, E>(
        executor: E,
        lot_id: DbId,
    ) -> Result<Option<SpotNumber>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, Option<SpotNumber>>(
            "SELECT MAX(spot_id) FROM parking_history WHERE lot_id = $1 AND status_id = $2",
        )
        .bind(lot_id)
        .bind(BookingStatus::Parked.id())
        .fetch_one(executor)
        .await
    }

    // -- Status transitions --------------------------------------------------

    /// Move a user's `Parked` entry to `Completed`.
    ///
    /// Returns `None` if no entry matches all of id, owner and `Parked`
    /// status, which is also what a repeated release observes.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<ParkingHistory>, sqlx::Error> {
        let query = format!(
            "UPDATE parking_history SET status_id = $3 \
             WHERE id = $1 AND user_id = $2 AND status_id = $4 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParkingHistory>(&query)
            .bind(id)
            .bind(user_id)
            .bind(BookingStatus::Completed.id())
            .bind(BookingStatus::Parked.id())
            .fetch_optional(pool)
            .await
    }

    /// Move every `Parked` entry created before `cutoff` to `Expired`,
    /// returning the expired rows.
    pub async fn expire_older_than(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<ParkingHistory>, sqlx::Error> {
        let query = format!(
            "UPDATE parking_history SET status_id = $2 \
             WHERE status_id = $3 AND created_at < $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ParkingHistory>(&query)
            .bind(cutoff)
            .bind(BookingStatus::Expired.id())
            .bind(BookingStatus::Parked.id())
            .fetch_all(pool)
            .await
    }

    // -- Read views ----------------------------------------------------------

    /// A single entry with lot and owner details.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<BookingDetail>, sqlx::Error> {
        let query = format!("SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM} WHERE h.id = $1");
        sqlx::query_as::<_, BookingDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's bookings, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<BookingDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM} \
             WHERE h.user_id = $1 \
             ORDER BY h.created_at DESC, h.id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, BookingDetail>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// A user's `Parked` bookings, newest first.
    pub async fn list_active_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<BookingDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM} \
             WHERE h.user_id = $1 AND h.status_id = $2 \
             ORDER BY h.created_at DESC, h.id DESC"
        );
        sqlx::query_as::<_, BookingDetail>(&query)
            .bind(user_id)
            .bind(BookingStatus::Parked.id())
            .fetch_all(pool)
            .await
    }

    /// Booking counts per status for one user. Statuses with no bookings are
    /// absent.
    pub async fn status_counts_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status_id, COUNT(*) AS count FROM parking_history \
             WHERE user_id = $1 GROUP BY status_id ORDER BY status_id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Entries whose vehicle number contains `term` (case-insensitive),
    /// newest first.
    pub async fn search_by_vehicle(
        pool: &PgPool,
        term: &str,
        limit: i64,
    ) -> Result<Vec<BookingDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM} \
             WHERE h.vehicle_no ILIKE $1 \
             ORDER BY h.created_at DESC, h.id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, BookingDetail>(&query)
            .bind(contains_pattern(term))
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// `Parked` entries created before `cutoff`, oldest first.
    pub async fn list_parked_before(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<BookingDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM} \
             WHERE h.status_id = $1 AND h.created_at < $2 \
             ORDER BY h.created_at, h.id"
        );
        sqlx::query_as::<_, BookingDetail>(&query)
            .bind(BookingStatus::Parked.id())
            .bind(cutoff)
            .fetch_all(pool)
            .await
    }

    /// A user's bookings created in `[start, end)`, oldest first.
    pub async fn list_for_user_between(
        pool: &PgPool,
        user_id: DbId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<BookingDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM {DETAIL_FROM} \
             WHERE h.user_id = $1 AND h.created_at >= $2 AND h.created_at < $3 \
             ORDER BY h.created_at, h.id"
        );
        sqlx::query_as::<_, BookingDetail>(&query)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }
}
