//! `GET /health`: liveness plus the two dependencies every write needs.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok` when every check passes, otherwise `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// The upload root exists and is a directory.
    pub media_healthy: bool,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = showroom_db::health_check(&state.pool).await.is_ok();
    let media_healthy = tokio::fs::metadata(state.media.root())
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);

    if !(db_healthy && media_healthy) {
        tracing::warn!(db_healthy, media_healthy, "Health check degraded");
    }

    Json(HealthResponse {
        status: if db_healthy && media_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        media_healthy,
    })
}
