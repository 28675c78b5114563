//! Informational parking charges.
//!
//! Charges are computed on release and in reports; they are never persisted
//! and have no effect on allocation.

use serde::Serialize;

use crate::types::Timestamp;

/// Every booking is charged for at least this many hours.
pub const MINIMUM_BILLABLE_HOURS: f64 = 1.0;

/// Duration and cost of a single booking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParkingCharge {
    /// Elapsed hours between entry and exit, rounded to two decimals.
    pub duration_hours: f64,
    /// Hours actually charged (at least [`MINIMUM_BILLABLE_HOURS`]).
    pub billable_hours: f64,
    /// `billable_hours * price_per_hour`, rounded to two decimals.
    pub total_cost: f64,
}

/// Compute the charge for a booking that started at `entered_at` and ended
/// (or is evaluated) at `exited_at`.
///
/// A clock that runs backwards yields a zero duration rather than a negative
/// one.
pub fn compute_charge(entered_at: Timestamp, exited_at: Timestamp, price_per_hour: f64) -> ParkingCharge {
    let elapsed_secs = (exited_at - entered_at).num_seconds().max(0) as f64;
    let duration_hours = elapsed_secs / 3600.0;
    let billable_hours = duration_hours.max(MINIMUM_BILLABLE_HOURS);

    ParkingCharge {
        duration_hours: round_cents(duration_hours),
        billable_hours: round_cents(billable_hours),
        total_cost: round_cents(billable_hours * price_per_hour),
    }
}

/// Round to two decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
