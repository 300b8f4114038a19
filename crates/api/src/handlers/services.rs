//! Handlers for the `/services` resource.
//!
//! Create and update take `multipart/form-data`: scalar fields, the nested
//! arrays `subProducts`/`sections`/`extraContent` as JSON strings, the flat
//! `image` file and nested `subProductImage_<i>`/`sectionImage_<i>` files.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use showroom_core::binding::{parse_array_field, NestedMediaBinder, UploadSet, SECTIONS, SUB_PRODUCTS};
use showroom_core::collection::Collection;
use showroom_core::content::ContentBlock;
use showroom_core::error::CoreError;
use showroom_core::media::{MediaChangeSet, MediaOwner};
use showroom_core::types::DbId;
use showroom_db::models::service::{CreateService, Service, UpdateService};
use showroom_db::repositories::{ServiceRepo, SlugRepo};

use crate::error::{AppError, AppResult};
use crate::form::FormPayload;
use crate::handlers::{missed_update, settle};
use crate::middleware::auth::Editor;
use crate::query::IncludeInactiveParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

const COLLECTION: Collection = Collection::Services;
const EXTRA_CONTENT: &str = "extraContent";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: COLLECTION.entity_name(),
        id,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/services?includeInactive=false
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let services = ServiceRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse::ok(services)))
}

/// GET /api/v1/services/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let service = ServiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::ok(service)))
}

/// GET /api/v1/services/slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let found = ServiceRepo::find_by_slug(&state.pool, &slug).await?;
    let service = found.ok_or(AppError::Core(CoreError::NotFoundBySlug {
        entity: COLLECTION.entity_name(),
        slug,
    }))?;
    Ok(Json(DataResponse::ok(service)))
}

/// POST /api/v1/services
///
/// Requires `title` and an `image` file. The new service is appended to the
/// end of the collection.
pub async fn create(
    editor: Editor,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = FormPayload::from_multipart(multipart).await?;
    let mut changes = MediaChangeSet::new();

    let result = create_service(&state, &mut form, &mut changes).await;
    let service = settle(&state.media, changes, &[], result)?;

    tracing::info!(
        editor_id = editor.id,
        service_id = service.id,
        slug = %service.slug,
        order = service.sort_order,
        "Service created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse::ok(service))))
}

/// PUT|PATCH /api/v1/services/{id}
///
/// Partial update: omitted fields keep their stored value. A new `image` or
/// nested image replaces the referenced file; the old file is deleted once
/// the update is persisted.
pub async fn update(
    editor: Editor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let existing = ServiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let mut form = FormPayload::from_multipart(multipart).await?;
    let previous = existing.owned_media_paths();
    let mut changes = MediaChangeSet::new();

    let result = update_service(&state, existing, &mut form, &mut changes).await;
    let service = settle(&state.media, changes, &previous, result)?;

    tracing::info!(editor_id = editor.id, service_id = id, "Service updated");
    Ok(Json(DataResponse::ok(service)))
}

/// DELETE /api/v1/services/{id}
///
/// Removes the service and every image it referenced, top-level and nested.
pub async fn delete(
    editor: Editor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let removed = ServiceRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let paths = removed.owned_media_paths();
    tracing::info!(
        editor_id = editor.id,
        service_id = id,
        media = paths.len(),
        "Service deleted",
    );
    state.media.delete_detached(paths);

    Ok(Json(MessageResponse::ok("Service deleted")))
}

// ---------------------------------------------------------------------------
// Write paths
// ---------------------------------------------------------------------------

async fn create_service(
    state: &AppState,
    form: &mut FormPayload,
    changes: &mut MediaChangeSet,
) -> AppResult<Service> {
    let title = form.required("title")?;
    let is_active = form.bool("isActive")?;
    let mut uploads = UploadSet::classify(COLLECTION, form.take_files());
    let image_file = uploads
        .flat
        .take()
        .ok_or_else(|| AppError::Core(CoreError::Validation("image is required".into())))?;

    let slug = SlugRepo::assign(&state.pool, COLLECTION, &title, None).await?;

    let image = state.media.store(COLLECTION, &image_file).await?;
    changes.record_stored(image.clone());

    let binder = NestedMediaBinder::new(&state.media, COLLECTION);
    let sub_products = binder
        .merge(
            &SUB_PRODUCTS,
            form.text(SUB_PRODUCTS.array_field),
            Vec::new(),
            uploads.take_nested(SUB_PRODUCTS.array_field),
            changes,
        )
        .await?;
    let sections = binder
        .merge(
            &SECTIONS,
            form.text(SECTIONS.array_field),
            Vec::new(),
            uploads.take_nested(SECTIONS.array_field),
            changes,
        )
        .await?;
    let extra_content: Vec<ContentBlock> =
        parse_array_field(EXTRA_CONTENT, form.text(EXTRA_CONTENT), Vec::new());

    let input = CreateService {
        title,
        slug,
        summary: form.non_empty("summary"),
        description: form.non_empty("description"),
        image: Some(image),
        sub_products,
        sections,
        extra_content,
        is_active,
    };
    Ok(ServiceRepo::create(&state.pool, &input).await?)
}

async fn update_service(
    state: &AppState,
    existing: Service,
    form: &mut FormPayload,
    changes: &mut MediaChangeSet,
) -> AppResult<Service> {
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

    let mut uploads = UploadSet::classify(COLLECTION, form.take_files());

    let image = match uploads.flat.take() {
        Some(file) => {
            let stored = state.media.store(COLLECTION, &file).await?;
            changes.record_stored(stored.clone());
            Some(state.media.replace(changes, existing.image.clone(), stored))
        }
        None => None,
    };

    let binder = NestedMediaBinder::new(&state.media, COLLECTION);

    let sub_product_uploads = uploads.take_nested(SUB_PRODUCTS.array_field);
    let sub_products = if form.text(SUB_PRODUCTS.array_field).is_some()
        || !sub_product_uploads.is_empty()
    {
        Some(
            binder
                .merge(
                    &SUB_PRODUCTS,
                    form.text(SUB_PRODUCTS.array_field),
                    existing.sub_products.0,
                    sub_product_uploads,
                    changes,
                )
                .await?,
        )
    } else {
        None
    };

    let section_uploads = uploads.take_nested(SECTIONS.array_field);
    let sections = if form.text(SECTIONS.array_field).is_some() || !section_uploads.is_empty() {
        Some(
            binder
                .merge(
                    &SECTIONS,
                    form.text(SECTIONS.array_field),
                    existing.sections.0,
                    section_uploads,
                    changes,
                )
                .await?,
        )
    } else {
        None
    };

    let extra_content = form
        .text(EXTRA_CONTENT)
        .map(|raw| parse_array_field(EXTRA_CONTENT, Some(raw), existing.extra_content.0));

    let input = UpdateService {
        title,
        slug,
        summary: form.trimmed("summary"),
        description: form.trimmed("description"),
        image,
        sub_products,
        sections,
        extra_content,
        is_active,
    };
    match ServiceRepo::update(&state.pool, id, seen_updated_at, &input).await? {
        Some(service) => Ok(service),
        None => {
            let still_exists = ServiceRepo::find_by_id(&state.pool, id).await?.is_some();
            Err(missed_update(COLLECTION, id, still_exists))
        }
    }
}
