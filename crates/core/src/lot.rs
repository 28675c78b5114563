//! Parking lot field rules and registry guards.
//!
//! Length limits are enforced declaratively on the DTOs via `validator`;
//! the checks here cover what derive attributes cannot express.

use crate::error::CoreError;
use crate::types::SpotNumber;

/// Reject values that are empty once surrounding whitespace is removed.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}

/// Hourly prices must be finite and non-negative.
pub fn validate_price_per_hour(price: f64) -> Result<(), CoreError> {
    if !price.is_finite() || price < 0.0 {
        return Err(CoreError::Validation(
            "price_per_hour must be a non-negative number".into(),
        ));
    }
    Ok(())
}

/// Refuse to shrink a lot below a spot that is currently held.
///
/// `highest_active_spot` is the largest spot number with a `Parked` entry.
pub fn validate_capacity_change(
    new_max_spots: i32,
    highest_active_spot: Option<SpotNumber>,
) -> Result<(), CoreError> {
    if new_max_spots < 1 {
        return Err(CoreError::Validation("max_spots must be at least 1".into()));
    }
    match highest_active_spot {
        Some(spot) if spot > new_max_spots => Err(CoreError::Conflict(format!(
            "Cannot reduce capacity to {new_max_spots}: spot {spot} is currently occupied"
        ))),
        _ => Ok(()),
    }
}

/// Refuse to delete a lot that still has vehicles parked in it.
pub fn ensure_deletable(active_bookings: i64) -> Result<(), CoreError> {
    if active_bookings > 0 {
        return Err(CoreError::Conflict(format!(
            "Cannot delete a parking lot with {active_bookings} active booking(s)"
        )));
    }
    Ok(())
}
