//! Route definitions for the `/lots` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::lots;
use crate::state::AppState;

/// Routes mounted at `/lots`. All require auth.
///
/// ```text
/// GET /            -> list_lots
/// GET /{id}        -> get_lot
/// GET /{id}/spots  -> spot_map
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(lots::list_lots))
        .route("/{id}", get(lots::get_lot))
        .route("/{id}/spots", get(lots::spot_map))
}
