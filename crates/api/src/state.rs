use std::sync::Arc;

use novela_events::EventBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: novela_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Event bus carrying pipeline state changes to subscribers.
    pub event_bus: Arc<EventBus>,
}
