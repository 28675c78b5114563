//! Plain-text message templates for the scheduled jobs.

use std::fmt::Write as _;

use parkwise_core::activity_report::{ActivitySummary, ReportBooking};

use crate::notifier::EmailMessage;

/// Prefix on every subject line.
const SUBJECT_PREFIX: &str = "[Parkwise]";

/// Most recent bookings listed in a monthly report.
pub const REPORT_RECENT_BOOKINGS: usize = 10;

const FOOTER: &str = "This is an automated message. Please do not reply to this email.";

/// Reminder for a vehicle that has been parked longer than the configured
/// threshold.
pub fn long_parking_reminder(
    to: &str,
    name: &str,
    vehicle_no: &str,
    lot_name: &str,
    spot_id: i32,
    hours_parked: i64,
) -> EmailMessage {
    let body = format!(
        "Hi {name},\n\n\
         Your vehicle has been parked for {hours_parked} hours. Please check whether you \
         still need the spot or release it.\n\n\
         Vehicle:  {vehicle_no}\n\
         Location: {lot_name}, spot {spot_id}\n\
         Duration: {hours_parked} hours\n\n\
         {FOOTER}\n"
    );
    EmailMessage {
        to: to.to_string(),
        subject: format!("{SUBJECT_PREFIX} Parking reminder for {vehicle_no}"),
        body,
    }
}

/// Nudge for a user who has not booked for `inactive_days`.
pub fn inactivity_reminder(to: &str, name: &str, inactive_days: i64) -> EmailMessage {
    let body = format!(
        "Hi {name},\n\n\
         We noticed you haven't booked a parking spot in the last {inactive_days} days. \
         Log in to browse lots with free spots and book one when you need it.\n\n\
         {FOOTER}\n"
    );
    EmailMessage {
        to: to.to_string(),
        subject: format!("{SUBJECT_PREFIX} Need a parking spot?"),
        body,
    }
}

/// Monthly activity report. `bookings` are in chronological order; only the
/// last [`REPORT_RECENT_BOOKINGS`] are listed.
pub fn monthly_report(
    to: &str,
    name: &str,
    period_label: &str,
    summary: &ActivitySummary,
    bookings: &[ReportBooking],
) -> EmailMessage {
    let mut body = format!("Hi {name},\n\nHere is your parking activity for {period_label}.\n\n");

    let _ = writeln!(body, "Total bookings: {}", summary.total_bookings);
    match &summary.most_used_lot {
        Some((lot, count)) => {
            let _ = writeln!(body, "Most used lot:  {lot} ({count} bookings)");
        }
        None => {
            let _ = writeln!(body, "Most used lot:  N/A");
        }
    }
    let _ = writeln!(body, "Total cost:     {:.2}", summary.total_cost);

    if !bookings.is_empty() {
        let _ = writeln!(body, "\nRecent bookings:");
        let skip = bookings.len().saturating_sub(REPORT_RECENT_BOOKINGS);
        for booking in &bookings[skip..] {
            let _ = writeln!(
                body,
                "  {}  {:<20}  {}",
                booking.booked_at.format("%Y-%m-%d"),
                booking.lot_name,
                booking.vehicle_no
            );
        }
    }

    let _ = write!(body, "\n{FOOTER}\n");

    EmailMessage {
        to: to.to_string(),
        subject: format!("{SUBJECT_PREFIX} Monthly parking report - {period_label}"),
        body,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use parkwise_core::activity_report::summarize;

    use super::*;

    fn bookings(n: usize) -> Vec<ReportBooking> {
        let base = Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap();
        (0..n)
            .map(|i| ReportBooking {
                lot_name: "Harbor".to_string(),
                price_per_hour: 2.0,
                vehicle_no: format!("VEH{i:02}"),
                booked_at: base + Duration::hours(i as i64),
            })
            .collect()
    }

    #[test]
    fn long_parking_mentions_vehicle_and_location() {
        let msg = long_parking_reminder("a@example.com", "Asha", "AB12", "Harbor", 3, 9);
        assert_eq!(msg.to, "a@example.com");
        assert!(msg.subject.contains("AB12"));
        assert!(msg.body.contains("Harbor, spot 3"));
        assert!(msg.body.contains("9 hours"));
    }

    #[test]
    fn inactivity_mentions_days() {
        let msg = inactivity_reminder("a@example.com", "Asha", 7);
        assert!(msg.body.contains("last 7 days"));
    }

    #[test]
    fn monthly_report_lists_recent_bookings_only() {
        let all = bookings(12);
        let summary = summarize(&all);
        let msg = monthly_report("a@example.com", "Asha", "February 2026", &summary, &all);

        assert!(msg.subject.ends_with("February 2026"));
        assert!(msg.body.contains("Total bookings: 12"));
        assert!(msg.body.contains("Harbor (12 bookings)"));
        assert!(msg.body.contains("Total cost:     24.00"));
        assert!(!msg.body.contains("VEH01"));
        assert!(msg.body.contains("VEH02"));
        assert!(msg.body.contains("VEH11"));
    }

    #[test]
    fn monthly_report_without_bookings() {
        let summary = summarize(&[]);
        let msg = monthly_report("a@example.com", "Asha", "March 2026", &summary, &[]);
        assert!(msg.body.contains("Most used lot:  N/A"));
        assert!(!msg.body.contains("Recent bookings"));
    }
}
