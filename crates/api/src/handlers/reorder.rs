//! Bulk reorder endpoint shared by every ordered collection.
//!
//! The body carries the full working set the admin just rearranged. Each
//! pair is written independently; ids that match nothing are skipped and
//! reported in the log, never as an error.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use showroom_core::collection::Collection;
use showroom_core::ordering::OrderPair;
use showroom_db::repositories::OrderingRepo;

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::Editor;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Request body for `POST /<collection>/reorder`.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub orders: Vec<OrderPair>,
}

/// POST /api/v1/services/reorder
pub async fn reorder_services(
    editor: Editor,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ReorderRequest>,
) -> AppResult<Json<MessageResponse>> {
    apply(&state, &editor, Collection::Services, &body).await
}

/// POST /api/v1/gallery/reorder
pub async fn reorder_gallery(
    editor: Editor,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ReorderRequest>,
) -> AppResult<Json<MessageResponse>> {
    apply(&state, &editor, Collection::Gallery, &body).await
}

/// POST /api/v1/testimonials/reorder
pub async fn reorder_testimonials(
    editor: Editor,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ReorderRequest>,
) -> AppResult<Json<MessageResponse>> {
    apply(&state, &editor, Collection::Testimonials, &body).await
}

async fn apply(
    state: &AppState,
    editor: &Editor,
    collection: Collection,
    body: &ReorderRequest,
) -> AppResult<Json<MessageResponse>> {
    let report = OrderingRepo::apply_orders(&state.pool, collection, &body.orders).await?;

    if !report.skipped.is_empty() {
        tracing::warn!(
            %collection,
            skipped = ?report.skipped,
            "Reorder batch referenced unknown ids",
        );
    }
    tracing::info!(
        editor_id = editor.id,
        %collection,
        submitted = body.orders.len(),
        updated = report.updated,
        "Applied reorder",
    );

    Ok(Json(MessageResponse::ok(format!(
        "{} order updated",
        collection.entity_name()
    ))))
}
