//! Vehicle registration number normalization.

use crate::error::CoreError;

/// Maximum length of a normalized vehicle number.
pub const MAX_VEHICLE_NO_LEN: usize = 20;

/// Normalize a user-supplied vehicle number: trim surrounding whitespace and
/// uppercase it.
///
/// The normalized form is the identity used by the "one active booking per
/// vehicle" invariant, so `" ab12 "` and `"AB12"` are the same vehicle.
pub fn normalize_vehicle_no(raw: &str) -> Result<String, CoreError> {
    let normalized = raw.trim().to_uppercase();

    if normalized.is_empty() {
        return Err(CoreError::Validation(
            "Vehicle number must not be empty".into(),
        ));
    }
    if normalized.chars().count() > MAX_VEHICLE_NO_LEN {
        return Err(CoreError::Validation(format!(
            "Vehicle number must be at most {MAX_VEHICLE_NO_LEN} characters"
        )));
    }
    if normalized.chars().any(char::is_control) {
        return Err(CoreError::Validation(
            "Vehicle number contains control characters".into(),
        ));
    }

    Ok(normalized)
}
