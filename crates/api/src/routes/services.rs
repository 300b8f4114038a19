//! Route definitions for services.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{reorder, services};
use crate::state::AppState;

/// Routes mounted at `/services`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// POST   /reorder        -> reorder_services
/// GET    /slug/{slug}    -> get_by_slug
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// PATCH  /{id}           -> update
/// DELETE /{id}           -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(services::list).post(services::create))
        .route("/reorder", post(reorder::reorder_services))
        .route("/slug/{slug}", get(services::get_by_slug))
        .route(
            "/{id}",
            get(services::get_by_id)
                .put(services::update)
                .patch(services::update)
                .delete(services::delete),
        )
}
