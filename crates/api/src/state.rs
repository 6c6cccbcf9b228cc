use std::sync::Arc;

use voyo_core::geo_directory::GeoDirectory;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: voyo_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Resolves place ids to coordinates and addresses.
    pub geo: Arc<dyn GeoDirectory>,
}
