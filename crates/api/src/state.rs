use std::sync::Arc;

use crate::config::ServerConfig;
use crate::generation::GenerationRunner;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: fathom_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (generation progress subscribers).
    pub ws_manager: Arc<WsManager>,
    /// Lesson media generation. `None` when no generation service is configured.
    pub generation: Option<Arc<GenerationRunner>>,
}
