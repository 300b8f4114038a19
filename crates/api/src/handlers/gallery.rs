//! Handlers for the `/gallery` resource.
//!
//! Gallery items carry one flat `image` and are ordered within their
//! `category`.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use showroom_core::binding::UploadSet;
use showroom_core::collection::Collection;
use showroom_core::error::CoreError;
use showroom_core::media::{MediaChangeSet, MediaOwner};
use showroom_core::types::DbId;
use showroom_db::models::gallery::{CreateGalleryItem, GalleryItem, UpdateGalleryItem};
use showroom_db::repositories::{GalleryRepo, SlugRepo};

use crate::error::{AppError, AppResult};
use crate::form::FormPayload;
use crate::handlers::{missed_update, settle};
use crate::middleware::auth::Editor;
use crate::query::GalleryListParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

const COLLECTION: Collection = Collection::Gallery;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: COLLECTION.entity_name(),
        id,
    })
}

/// GET /api/v1/gallery?includeInactive=false&category=labels
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<GalleryListParams>,
) -> AppResult<impl IntoResponse> {
    let category = params.category.as_deref().filter(|c| !c.is_empty());
    let items = GalleryRepo::list(&state.pool, params.include_inactive, category).await?;
    Ok(Json(DataResponse::ok(items)))
}

/// GET /api/v1/gallery/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = GalleryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::ok(item)))
}

/// GET /api/v1/gallery/slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let found = GalleryRepo::find_by_slug(&state.pool, &slug).await?;
    let item = found.ok_or(AppError::Core(CoreError::NotFoundBySlug {
        entity: COLLECTION.entity_name(),
        slug,
    }))?;
    Ok(Json(DataResponse::ok(item)))
}

/// POST /api/v1/gallery
///
/// Requires `title` and an `image` file.
pub async fn create(
    editor: Editor,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = FormPayload::from_multipart(multipart).await?;
    let mut changes = MediaChangeSet::new();

    let result = create_item(&state, &mut form, &mut changes).await;
    let item = settle(&state.media, changes, &[], result)?;

    tracing::info!(
        editor_id = editor.id,
        gallery_item_id = item.id,
        category = ?item.category,
        order = item.sort_order,
        "Gallery item created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse::ok(item))))
}

/// PUT|PATCH /api/v1/gallery/{id}
pub async fn update(
    editor: Editor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let existing = GalleryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let mut form = FormPayload::from_multipart(multipart).await?;
    let previous = existing.owned_media_paths();
    let mut changes = MediaChangeSet::new();

    let result = update_item(&state, existing, &mut form, &mut changes).await;
    let item = settle(&state.media, changes, &previous, result)?;

    tracing::info!(editor_id = editor.id, gallery_item_id = id, "Gallery item updated");
    Ok(Json(DataResponse::ok(item)))
}

/// DELETE /api/v1/gallery/{id}
pub async fn delete(
    editor: Editor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let removed = GalleryRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(editor_id = editor.id, gallery_item_id = id, "Gallery item deleted");
    state.media.delete_detached(removed.owned_media_paths());

    Ok(Json(MessageResponse::ok("Gallery item deleted")))
}

async fn create_item(
    state: &AppState,
    form: &mut FormPayload,
    changes: &mut MediaChangeSet,
) -> AppResult<GalleryItem> {
    let title = form.required("title")?;
    let is_active = form.bool("isActive")?;
    let image_file = UploadSet::classify(COLLECTION, form.take_files())
        .flat
        .ok_or_else(|| AppError::Core(CoreError::Validation("image is required".into())))?;

    let slug = SlugRepo::assign(&state.pool, COLLECTION, &title, None).await?;

    let image = state.media.store(COLLECTION, &image_file).await?;
    changes.record_stored(image.clone());

    let input = CreateGalleryItem {
        title,
        slug,
        caption: form.non_empty("caption"),
        category: form.non_empty("category"),
        image: Some(image),
        is_active,
    };
    Ok(GalleryRepo::create(&state.pool, &input).await?)
}

async fn update_item(
    state: &AppState,
    existing: GalleryItem,
    form: &mut FormPayload,
    changes: &mut MediaChangeSet,
) -> AppResult<GalleryItem> {
    let id = existing.id;
    let seen_updated_at = existing.updated_at;
    let title = form.required_if_present("title")?;
    let is_active = form.bool("isActive")?;

    let slug = match &title {
        Some(t) if *t != existing.title => {
            Some(SlugRepo::assign(&state.pool, COLLECTION, t, Some(id)).await?)
        }
        _ => None,
    };

    let image = match UploadSet::classify(COLLECTION, form.take_files()).flat {
        Some(file) => {
            let stored = state.media.store(COLLECTION, &file).await?;
            changes.record_stored(stored.clone());
            Some(state.media.replace(changes, existing.image, stored))
        }
        None => None,
    };

    // A blank category leaves the item in its current scope.
    let input = UpdateGalleryItem {
        title,
        slug,
        caption: form.trimmed("caption"),
        category: form.non_empty("category"),
        image,
        is_active,
    };
    match GalleryRepo::update(&state.pool, id, seen_updated_at, &input).await? {
        Some(item) => Ok(item),
        None => {
            let still_exists = GalleryRepo::find_by_id(&state.pool, id).await?.is_some();
            Err(missed_update(COLLECTION, id, still_exists))
        }
    }
}
