//! Handlers for the `/testimonials` resource.
//!
//! Testimonials have no slug; the flat file field is `avatar` and it is
//! optional on create.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use showroom_core::binding::UploadSet;
use showroom_core::collection::Collection;
use showroom_core::error::CoreError;
use showroom_core::media::{MediaChangeSet, MediaOwner};
use showroom_core::types::DbId;
use showroom_db::models::testimonial::{CreateTestimonial, Testimonial, UpdateTestimonial};
use showroom_db::repositories::TestimonialRepo;

use crate::error::{AppError, AppResult};
use crate::form::FormPayload;
use crate::handlers::{missed_update, settle};
use crate::middleware::auth::Editor;
use crate::query::IncludeInactiveParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

const COLLECTION: Collection = Collection::Testimonials;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: COLLECTION.entity_name(),
        id,
    })
}

/// GET /api/v1/testimonials?includeInactive=false
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let items = TestimonialRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse::ok(items)))
}

/// GET /api/v1/testimonials/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = TestimonialRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::ok(item)))
}

/// POST /api/v1/testimonials
///
/// Requires `clientName` and `quote`; `avatar` is optional.
pub async fn create(
    editor: Editor,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = FormPayload::from_multipart(multipart).await?;
    let mut changes = MediaChangeSet::new();

    let result = create_testimonial(&state, &mut form, &mut changes).await;
    let item = settle(&state.media, changes, &[], result)?;

    tracing::info!(
        editor_id = editor.id,
        testimonial_id = item.id,
        order = item.sort_order,
        "Testimonial created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse::ok(item))))
}

/// PUT|PATCH /api/v1/testimonials/{id}
pub async fn update(
    editor: Editor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let existing = TestimonialRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let mut form = FormPayload::from_multipart(multipart).await?;
    let previous = existing.owned_media_paths();
    let mut changes = MediaChangeSet::new();

    let result = update_testimonial(&state, existing, &mut form, &mut changes).await;
    let item = settle(&state.media, changes, &previous, result)?;

    tracing::info!(editor_id = editor.id, testimonial_id = id, "Testimonial updated");
    Ok(Json(DataResponse::ok(item)))
}

/// DELETE /api/v1/testimonials/{id}
pub async fn delete(
    editor: Editor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let removed = TestimonialRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(editor_id = editor.id, testimonial_id = id, "Testimonial deleted");
    state.media.delete_detached(removed.owned_media_paths());

    Ok(Json(MessageResponse::ok("Testimonial deleted")))
}

async fn create_testimonial(
    state: &AppState,
    form: &mut FormPayload,
    changes: &mut MediaChangeSet,
) -> AppResult<Testimonial> {
    let client_name = form.required("clientName")?;
    let quote = form.required("quote")?;
    let rating = form.rating("rating")?;
    let is_active = form.bool("isActive")?;

    let avatar = match UploadSet::classify(COLLECTION, form.take_files()).flat {
        Some(file) => {
            let stored = state.media.store(COLLECTION, &file).await?;
            changes.record_stored(stored.clone());
            Some(stored)
        }
        None => None,
    };

    let input = CreateTestimonial {
        client_name,
        company: form.non_empty("company"),
        quote,
        rating,
        avatar,
        is_active,
    };
    Ok(TestimonialRepo::create(&state.pool, &input).await?)
}

async fn update_testimonial(
    state: &AppState,
    existing: Testimonial,
    form: &mut FormPayload,
    changes: &mut MediaChangeSet,
) -> AppResult<Testimonial> {
    let id = existing.id;
    let seen_updated_at = existing.updated_at;
    let client_name = form.required_if_present("clientName")?;
    let quote = form.required_if_present("quote")?;
    let rating = form.rating("rating")?;
    let is_active = form.bool("isActive")?;

    let avatar = match UploadSet::classify(COLLECTION, form.take_files()).flat {
        Some(file) => {
            let stored = state.media.store(COLLECTION, &file).await?;
            changes.record_stored(stored.clone());
            Some(state.media.replace(changes, existing.avatar, stored))
        }
        None => None,
    };

    let input = UpdateTestimonial {
        client_name,
        company: form.trimmed("company"),
        quote,
        rating,
        avatar,
        is_active,
    };
    match TestimonialRepo::update(&state.pool, id, seen_updated_at, &input).await? {
        Some(testimonial) => Ok(testimonial),
        None => {
            let still_exists = TestimonialRepo::find_by_id(&state.pool, id).await?.is_some();
            Err(missed_update(COLLECTION, id, still_exists))
        }
    }
}
