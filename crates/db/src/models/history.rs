//! Booking ledger (`parking_history`) models.

use parkwise_core::booking::status_name;
use parkwise_core::occupancy::SpotObservation;
use parkwise_core::types::{DbId, SpotNumber, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::status::StatusId;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `parking_history` table.
///
/// `created_at` is the booking (entry) time and the ordering key of the
/// occupancy projection.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParkingHistory {
    pub id: DbId,
    pub user_id: DbId,
    pub lot_id: DbId,
    pub spot_id: SpotNumber,
    pub vehicle_no: String,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ParkingHistory {
    /// Status name (`"Parked"`, `"Completed"`, `"Expired"`).
    pub fn status(&self) -> &'static str {
        status_name(self.status_id)
    }
}

/// The latest ledger entry of one spot, as returned by the projection query.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct SpotLatest {
    pub lot_id: DbId,
    pub id: DbId,
    pub spot_id: SpotNumber,
    pub status_id: StatusId,
    pub created_at: Timestamp,
}

impl From<SpotLatest> for SpotObservation {
    fn from(row: SpotLatest) -> Self {
        SpotObservation {
            entry_id: row.id,
            spot_id: row.spot_id,
            status_id: row.status_id,
            recorded_at: row.created_at,
        }
    }
}

/// A ledger entry joined with its lot and owner, for listings and reports.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingDetail {
    pub id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub fullname: Option<String>,
    pub lot_id: DbId,
    pub lot_name: String,
    pub lot_address: String,
    pub price_per_hour: f64,
    pub spot_id: SpotNumber,
    pub vehicle_no: String,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    /// Time of the last status change; the exit time once closed.
    pub updated_at: Timestamp,
}

impl BookingDetail {
    pub fn status(&self) -> &'static str {
        status_name(self.status_id)
    }
}

/// Booking count for one status, used by per-user summaries.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct StatusCount {
    pub status_id: StatusId,
    pub count: i64,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for appending a new `Parked` entry to the ledger.
#[derive(Debug, Clone)]
pub struct AppendEntry {
    pub user_id: DbId,
    pub lot_id: DbId,
    pub spot_id: SpotNumber,
    /// Must already be normalized (trimmed, uppercase).
    pub vehicle_no: String,
}
