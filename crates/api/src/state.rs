use std::sync::Arc;

use showroom_core::media::MediaStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: showroom_db::DbPool,
    /// Server configuration (JWT secret, upload settings).
    pub config: Arc<ServerConfig>,
    /// Blob store rooted at the upload directory.
    pub media: MediaStore,
}
