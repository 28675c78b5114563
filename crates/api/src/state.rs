use std::sync::Arc;

use parkwise_events::Notifier;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: parkwise_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Delivery channel for reminder and report messages.
    pub notifier: Arc<dyn Notifier>,
}
