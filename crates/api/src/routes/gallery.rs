//! Route definitions for gallery items.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{gallery, reorder};
use crate::state::AppState;

/// Routes mounted at `/gallery`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// POST   /reorder        -> reorder_gallery
/// GET    /slug/{slug}    -> get_by_slug
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// PATCH  /{id}           -> update
/// DELETE /{id}           -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(gallery::list).post(gallery::create))
        .route("/reorder", post(reorder::reorder_gallery))
        .route("/slug/{slug}", get(gallery::get_by_slug))
        .route(
            "/{id}",
            get(gallery::get_by_id)
                .put(gallery::update)
                .patch(gallery::update)
                .delete(gallery::delete),
        )
}
