//! Booking status constants and state machine.
//!
//! A ledger entry is created `Parked` and leaves that state exactly once,
//! either through a user release (`Completed`) or the expiry sweep
//! (`Expired`). The IDs match the `booking_statuses` seed data and are
//! duplicated from the `db` crate's `BookingStatus` enum because `core`
//! must have zero internal deps.

/// Status ID of an active booking holding its spot.
pub const STATUS_PARKED: i16 = 1;

/// Status ID of a booking released by its owner.
pub const STATUS_COMPLETED: i16 = 2;

/// Status ID of a booking closed by the expiry sweep.
pub const STATUS_EXPIRED: i16 = 3;

/// Whether a booking with this status currently holds its spot.
///
/// `Expired` is treated exactly like `Completed`: the spot is free.
pub fn holds_spot(status_id: i16) -> bool {
    status_id == STATUS_PARKED
}

/// Human-readable name for a status ID, as exposed by the API.
pub fn status_name(id: i16) -> &'static str {
    match id {
        STATUS_PARKED => "Parked",
        STATUS_COMPLETED => "Completed",
        STATUS_EXPIRED => "Expired",
        _ => "Unknown",
    }
}

pub mod state_machine {
    use super::{status_name, STATUS_COMPLETED, STATUS_EXPIRED, STATUS_PARKED};

    /// Returns the set of valid target status IDs reachable from `from_status`.
    ///
    /// `Completed` and `Expired` are terminal.
    pub fn valid_transitions(from_status: i16) -> &'static [i16] {
        match from_status {
            STATUS_PARKED => &[STATUS_COMPLETED, STATUS_EXPIRED],
            _ => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: i16, to: i16) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Validate a state transition, returning an error message for invalid ones.
    pub fn validate_transition(from: i16, to: i16) -> Result<(), String> {
        if can_transition(from, to) {
            Ok(())
        } else {
            Err(format!(
                "Invalid booking transition: {} ({from}) -> {} ({to})",
                status_name(from),
                status_name(to)
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::state_machine::*;
    use super::*;

    #[test]
    fn parked_to_completed() {
        assert!(can_transition(STATUS_PARKED, STATUS_COMPLETED));
    }

    #[test]
    fn parked_to_expired() {
        assert!(can_transition(STATUS_PARKED, STATUS_EXPIRED));
    }

    #[test]
    fn terminal_states_have_no_transitions() {
        assert!(valid_transitions(STATUS_COMPLETED).is_empty());
        assert!(valid_transitions(STATUS_EXPIRED).is_empty());
    }

    #[test]
    fn completed_cannot_return_to_parked() {
        let err = validate_transition(STATUS_COMPLETED, STATUS_PARKED).unwrap_err();
        assert!(err.contains("Completed (2) -> Parked (1)"), "got: {err}");
    }

    #[test]
    fn expired_releases_the_spot() {
        assert!(holds_spot(STATUS_PARKED));
        assert!(!holds_spot(STATUS_COMPLETED));
        assert!(!holds_spot(STATUS_EXPIRED));
    }

    #[test]
    fn unknown_status_name() {
        assert_eq!(status_name(42), "Unknown");
    }
}
