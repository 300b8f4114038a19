//! Repository for the `gallery_items` table.

use sqlx::PgPool;
use showroom_core::types::{DbId, Timestamp};

use crate::models::gallery::{CreateGalleryItem, GalleryItem, UpdateGalleryItem};

/// Column list for the `gallery_items` table.
const COLUMNS: &str = "id, title, slug, caption, category, image, sort_order, is_active, \
    created_at, updated_at";

/// Provides CRUD operations for gallery items.
pub struct GalleryRepo;

impl GalleryRepo {
    /// Insert a new gallery item at the end of its category.
    pub async fn create(
        pool: &PgPool,
        input: &CreateGalleryItem,
    ) -> Result<GalleryItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO gallery_items \
                (title, slug, caption, category, image, sort_order, is_active) \
             VALUES ($1, $2, $3, $4, $5, \
                 (SELECT COUNT(*) FROM gallery_items WHERE category IS NOT DISTINCT FROM $4::TEXT)::INTEGER, \
                 COALESCE($6, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GalleryItem>(&query)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.caption)
            .bind(&input.category)
            .bind(&input.image)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a gallery item by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<GalleryItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gallery_items WHERE id = $1");
        sqlx::query_as::<_, GalleryItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a gallery item by slug.
    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<GalleryItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gallery_items WHERE slug = $1");
        sqlx::query_as::<_, GalleryItem>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List gallery items in display order.
    ///
    /// With `category` set, only that scope is returned.
    pub async fn list(
        pool: &PgPool,
        include_inactive: bool,
        category: Option<&str>,
    ) -> Result<Vec<GalleryItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM gallery_items \
             WHERE ($1 OR is_active = true) \
               AND ($2::TEXT IS NULL OR category = $2) \
             ORDER BY sort_order ASC, created_at DESC, id DESC"
        );
        sqlx::query_as::<_, GalleryItem>(&query)
            .bind(include_inactive)
            .bind(category)
            .fetch_all(pool)
            .await
    }

    /// Update a gallery item. Only non-`None` fields are applied.
    ///
    /// Returns `None` if the row is gone or no longer at `seen_updated_at`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        seen_updated_at: Timestamp,
        input: &UpdateGalleryItem,
    ) -> Result<Option<GalleryItem>, sqlx::Error> {
        let query = format!(
            "UPDATE gallery_items SET \
                title = COALESCE($2, title), \
                slug = COALESCE($3, slug), \
                caption = COALESCE($4, caption), \
                category = COALESCE($5, category), \
                image = COALESCE($6, image), \
                is_active = COALESCE($7, is_active), \
                updated_at = clock_timestamp() \
             WHERE id = $1 AND updated_at = $8 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GalleryItem>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.caption)
            .bind(&input.category)
            .bind(&input.image)
            .bind(input.is_active)
            .bind(seen_updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Delete a gallery item, returning the removed row.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<GalleryItem>, sqlx::Error> {
        let query = format!("DELETE FROM gallery_items WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, GalleryItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
