use std::sync::Arc;

use pawtrail_core::storage::PhotoStorage;
use pawtrail_events::EventBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: pawtrail_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Event bus for publishing report activity.
    pub event_bus: Arc<EventBus>,
    /// Photo storage backend, used for compensating cleanup when a
    /// creation pipeline fails after its photos were already saved.
    pub storage: Arc<dyn PhotoStorage>,
}
