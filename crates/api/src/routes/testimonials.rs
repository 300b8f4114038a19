//! Route definitions for testimonials.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{reorder, testimonials};
use crate::state::AppState;

/// Routes mounted at `/testimonials`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// POST   /reorder        -> reorder_testimonials
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// PATCH  /{id}           -> update
/// DELETE /{id}           -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(testimonials::list).post(testimonials::create))
        .route("/reorder", post(reorder::reorder_testimonials))
        .route(
            "/{id}",
            get(testimonials::get_by_id)
                .put(testimonials::update)
                .patch(testimonials::update)
                .delete(testimonials::delete),
        )
}
