//! Monthly activity report aggregation.
//!
//! Reports cover the previous calendar month and charge every booking at
//! the one-hour minimum rate: the ledger records entry time only, so actual
//! stay length is not known for closed bookings.

use std::collections::BTreeMap;

use chrono::{Datelike, TimeZone, Utc};
use serde::Serialize;

use crate::billing::{round_cents, MINIMUM_BILLABLE_HOURS};
use crate::types::Timestamp;

/// A single booking as seen by the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportBooking {
    pub lot_name: String,
    pub price_per_hour: f64,
    pub vehicle_no: String,
    pub booked_at: Timestamp,
}

/// Aggregated activity of one user over one report window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub total_bookings: usize,
    /// Most frequently used lot and its booking count.
    pub most_used_lot: Option<(String, usize)>,
    pub total_cost: f64,
}

/// Aggregate a user's bookings. Ties for most used lot go to the
/// alphabetically first lot name.
pub fn summarize(bookings: &[ReportBooking]) -> ActivitySummary {
    let mut usage: BTreeMap<&str, usize> = BTreeMap::new();
    let mut total_cost = 0.0;

    for booking in bookings {
        *usage.entry(booking.lot_name.as_str()).or_default() += 1;
        total_cost += booking.price_per_hour * MINIMUM_BILLABLE_HOURS;
    }

    let most_used_lot = usage
        .iter()
        .fold(None::<(&str, usize)>, |best, (&name, &count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((name, count)),
        })
        .map(|(name, count)| (name.to_string(), count));

    ActivitySummary {
        total_bookings: bookings.len(),
        most_used_lot,
        total_cost: round_cents(total_cost),
    }
}

/// The calendar month preceding `now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportWindow {
    /// Inclusive start (first instant of the month).
    pub start: Timestamp,
    /// Exclusive end (first instant of the following month).
    pub end: Timestamp,
    /// Display label such as `"February 2026"`.
    pub label: String,
}

/// Compute the report window for the month before the one containing `now`.
pub fn previous_month_window(now: Timestamp) -> ReportWindow {
    let (year, month) = if now.month() == 1 {
        (now.year() - 1, 12)
    } else {
        (now.year(), now.month() - 1)
    };

    let start = Utc
        .with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or(now);
    let end = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now);

    ReportWindow {
        start,
        end,
        label: start.format("%B %Y").to_string(),
    }
}
