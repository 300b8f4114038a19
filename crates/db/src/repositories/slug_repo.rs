//! Slug assignment against the live collection.

use std::collections::HashSet;

use sqlx::PgPool;
use showroom_core::collection::Collection;
use showroom_core::slug;
use showroom_core::types::DbId;

pub struct SlugRepo;

impl SlugRepo {
    /// Slugs in `collection` equal to `base` or of the form `<base>-...`,
    /// excluding the row `exclude_id`.
    pub async fn taken_slugs(
        pool: &PgPool,
        collection: Collection,
        base: &str,
        exclude_id: Option<DbId>,
    ) -> Result<HashSet<String>, sqlx::Error> {
        let query = format!(
            "SELECT slug FROM {} \
             WHERE (slug = $1 OR slug LIKE ($1 || '-%')) \
               AND ($2::BIGINT IS NULL OR id <> $2)",
            collection.table()
        );
        let rows: Vec<(String,)> = sqlx::query_as(&query)
            .bind(base)
            .bind(exclude_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|(s,)| s).collect())
    }

    /// Derive a unique slug for `title` in `collection`.
    ///
    /// Pass `exclude_id` when re-slugging an existing row so it does not
    /// collide with itself.
    pub async fn assign(
        pool: &PgPool,
        collection: Collection,
        title: &str,
        exclude_id: Option<DbId>,
    ) -> Result<String, sqlx::Error> {
        let base = slug::base_slug(title);
        let taken = Self::taken_slugs(pool, collection, &base, exclude_id).await?;
        let assigned = slug::resolve_collision(&base, &taken);
        tracing::debug!(%collection, %base, %assigned, taken = taken.len(), "Assigned slug");
        Ok(assigned)
    }
}
