pub mod admin;
pub mod auth;
pub mod bookings;
pub mod health;
pub mod lots;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                      register (public)
/// /auth/login                         login (public)
/// /auth/me                            current user (requires auth)
///
/// /lots                               list with availability, ?search=
/// /lots/{id}                          lot with availability
/// /lots/{id}/spots                    spot map
///
/// /bookings                           list own (GET), book (POST)
/// /bookings/{id}/release              release (POST)
///
/// /user/summary                       personal summary
/// /user/profile                       get, update
/// /user/password                      change password (PUT)
///
/// /admin/lots                         create (admin only)
/// /admin/lots/{id}                    update, delete
/// /admin/users                        list customers
/// /admin/users/{id}                   user with bookings
/// /admin/summary                      occupancy and revenue per lot
/// /admin/search/vehicles              vehicle search, ?q=
/// /admin/jobs/expire                  run expiry sweep (POST)
/// /admin/jobs/reminders               send reminders (POST)
/// /admin/jobs/monthly-report          send monthly reports (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/lots", lots::router())
        .nest("/bookings", bookings::router())
        .nest("/user", user::router())
        .nest("/admin", admin::router())
}
