//! Repository for the `services` table.

use sqlx::types::Json;
use sqlx::PgPool;
use showroom_core::types::{DbId, Timestamp};

use crate::models::service::{CreateService, Service, UpdateService};

/// Column list for the `services` table.
const COLUMNS: &str = "id, title, slug, summary, description, image, sub_products, \
    sections, extra_content, sort_order, is_active, created_at, updated_at";

/// Provides CRUD operations for services.
pub struct ServiceRepo;

impl ServiceRepo {
    /// Insert a new service at the end of the collection.
    ///
    /// `sort_order` is the number of services that already exist; existing
    /// rows are never renumbered.
    pub async fn create(pool: &PgPool, input: &CreateService) -> Result<Service, sqlx::Error> {
        let query = format!(
            "INSERT INTO services \
                (title, slug, summary, description, image, sub_products, sections, \
                 extra_content, sort_order, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, \
                 (SELECT COUNT(*) FROM services)::INTEGER, COALESCE($9, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.summary)
            .bind(&input.description)
            .bind(&input.image)
            .bind(Json(&input.sub_products))
            .bind(Json(&input.sections))
            .bind(Json(&input.extra_content))
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a service by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services WHERE id = $1");
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a service by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Service>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services WHERE slug = $1");
        sqlx::query_as::<_, Service>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List services in display order, optionally including inactive ones.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Service>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM services \
             WHERE ($1 OR is_active = true) \
             ORDER BY sort_order ASC, created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Update a service. Only non-`None` fields are applied; `sort_order`
    /// is never touched here.
    ///
    /// The write only lands if the row still carries `seen_updated_at`, the
    /// version the caller read. Returns `None` if the row is gone or was
    /// modified in between.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        seen_updated_at: Timestamp,
        input: &UpdateService,
    ) -> Result<Option<Service>, sqlx::Error> {
        let query = format!(
            "UPDATE services SET \
                title = COALESCE($2, title), \
                slug = COALESCE($3, slug), \
                summary = COALESCE($4, summary), \
                description = COALESCE($5, description), \
                image = COALESCE($6, image), \
                sub_products = COALESCE($7, sub_products), \
                sections = COALESCE($8, sections), \
                extra_content = COALESCE($9, extra_content), \
                is_active = COALESCE($10, is_active), \
                updated_at = clock_timestamp() \
             WHERE id = $1 AND updated_at = $11 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.summary)
            .bind(&input.description)
            .bind(&input.image)
            .bind(input.sub_products.as_ref().map(Json))
            .bind(input.sections.as_ref().map(Json))
            .bind(input.extra_content.as_ref().map(Json))
            .bind(input.is_active)
            .bind(seen_updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Delete a service, returning the removed row so its media can be
    /// cleaned up. Remaining rows keep their `sort_order`.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Service>, sqlx::Error> {
        let query = format!("DELETE FROM services WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
