//! Route definitions for the `/bookings` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::bookings;
use crate::state::AppState;

/// Routes mounted at `/bookings`. All require auth.
///
/// ```text
/// GET  /               -> list_bookings
/// POST /               -> create_booking
/// POST /{id}/release   -> release_booking
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/{id}/release", post(bookings::release_booking))
}
