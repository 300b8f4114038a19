//! Repository for the `testimonials` table.

use sqlx::PgPool;
use showroom_core::types::{DbId, Timestamp};

use crate::models::testimonial::{CreateTestimonial, Testimonial, UpdateTestimonial};

/// Column list for the `testimonials` table.
const COLUMNS: &str = "id, client_name, company, quote, rating, avatar, sort_order, \
    is_active, created_at, updated_at";

/// Provides CRUD operations for testimonials.
pub struct TestimonialRepo;

impl TestimonialRepo {
    /// Insert a new testimonial at the end of the collection.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTestimonial,
    ) -> Result<Testimonial, sqlx::Error> {
        let query = format!(
            "INSERT INTO testimonials \
                (client_name, company, quote, rating, avatar, sort_order, is_active) \
             VALUES ($1, $2, $3, $4, $5, \
                 (SELECT COUNT(*) FROM testimonials)::INTEGER, COALESCE($6, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(&input.client_name)
            .bind(&input.company)
            .bind(&input.quote)
            .bind(input.rating)
            .bind(&input.avatar)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a testimonial by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Testimonial>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM testimonials WHERE id = $1");
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List testimonials in display order.
    pub async fn list(
        pool: &PgPool,
        include_inactive: bool,
    ) -> Result<Vec<Testimonial>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM testimonials \
             WHERE ($1 OR is_active = true) \
             ORDER BY sort_order ASC, created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Update a testimonial. Only non-`None` fields are applied.
    ///
    /// Returns `None` if the row is gone or no longer at `seen_updated_at`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        seen_updated_at: Timestamp,
        input: &UpdateTestimonial,
    ) -> Result<Option<Testimonial>, sqlx::Error> {
        let query = format!(
            "UPDATE testimonials SET \
                client_name = COALESCE($2, client_name), \
                company = COALESCE($3, company), \
                quote = COALESCE($4, quote), \
                rating = COALESCE($5, rating), \
                avatar = COALESCE($6, avatar), \
                is_active = COALESCE($7, is_active), \
                updated_at = clock_timestamp() \
             WHERE id = $1 AND updated_at = $8 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(id)
            .bind(&input.client_name)
            .bind(&input.company)
            .bind(&input.quote)
            .bind(input.rating)
            .bind(&input.avatar)
            .bind(input.is_active)
            .bind(seen_updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Delete a testimonial, returning the removed row.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Testimonial>, sqlx::Error> {
        let query = format!("DELETE FROM testimonials WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Testimonial>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
