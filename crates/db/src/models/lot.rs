//! Parking lot entity model and DTOs.

use parkwise_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `parking_lots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ParkingLot {
    pub id: DbId,
    pub name: String,
    pub address: String,
    pub pincode: String,
    pub price_per_hour: f64,
    /// Capacity; spots are numbered `1..=max_spots`.
    pub max_spots: i32,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new parking lot.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateParkingLot {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub address: String,
    #[validate(length(min = 1, max = 10))]
    pub pincode: String,
    #[validate(range(min = 0.0))]
    pub price_per_hour: f64,
    #[validate(range(min = 1))]
    pub max_spots: i32,
}

/// DTO for updating an existing parking lot. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateParkingLot {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 10))]
    pub pincode: Option<String>,
    #[validate(range(min = 0.0))]
    pub price_per_hour: Option<f64>,
    #[validate(range(min = 1))]
    pub max_spots: Option<i32>,
}
