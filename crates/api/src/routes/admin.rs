//! Route definitions for the `/admin` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. All require the admin role.
///
/// ```text
/// POST   /lots                 -> create_lot
/// PUT    /lots/{id}            -> update_lot
/// DELETE /lots/{id}            -> delete_lot
/// GET    /users                -> list_users
/// GET    /users/{id}           -> get_user
/// GET    /summary              -> summary
/// GET    /search/vehicles      -> search_vehicles
/// POST   /jobs/expire          -> run_expiry
/// POST   /jobs/reminders       -> run_reminders
/// POST   /jobs/monthly-report  -> run_monthly_report
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lots", post(admin::create_lot))
        .route(
            "/lots/{id}",
            put(admin::update_lot).delete(admin::delete_lot),
        )
        .route("/users", get(admin::list_users))
        .route("/users/{id}", get(admin::get_user))
        .route("/summary", get(admin::summary))
        .route("/search/vehicles", get(admin::search_vehicles))
        .route("/jobs/expire", post(admin::run_expiry))
        .route("/jobs/reminders", post(admin::run_reminders))
        .route("/jobs/monthly-report", post(admin::run_monthly_report))
}
