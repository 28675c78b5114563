//! HTTP request handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod lots;
pub mod user;

use serde::Deserialize;

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: i64 = 50;

/// Largest page size a client may request.
pub const MAX_LIMIT: i64 = 200;

/// Common `?limit=` query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

impl LimitParams {
    /// Requested limit clamped to `1..=MAX_LIMIT`.
    pub fn resolve(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}
