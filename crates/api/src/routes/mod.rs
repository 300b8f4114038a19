pub mod gallery;
pub mod health;
pub mod services;
pub mod testimonials;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /services                         list (public), create (auth)
/// /services/reorder                 bulk order update (auth)
/// /services/slug/{slug}             get by slug (public)
/// /services/{id}                    get (public), update, delete (auth)
///
/// /gallery                          list (public, ?category=), create (auth)
/// /gallery/reorder                  bulk order update (auth)
/// /gallery/slug/{slug}              get by slug (public)
/// /gallery/{id}                     get (public), update, delete (auth)
///
/// /testimonials                     list (public), create (auth)
/// /testimonials/reorder             bulk order update (auth)
/// /testimonials/{id}                get (public), update, delete (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/services", services::router())
        .nest("/gallery", gallery::router())
        .nest("/testimonials", testimonials::router())
}
