//! Bulk `sort_order` updates shared by every ordered collection.
//!
//! A reorder batch is applied one row at a time with no enclosing
//! transaction: each `{ id, order }` pair is an independent write. Values are
//! stored verbatim; duplicates and gaps are allowed.

use sqlx::PgPool;
use showroom_core::collection::Collection;
use showroom_core::ordering::OrderPair;
use showroom_core::types::DbId;

/// Summary of an applied reorder batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReorderReport {
    /// Rows whose `sort_order` was written.
    pub updated: usize,
    /// Ids in the batch that matched no row.
    pub skipped: Vec<DbId>,
}

pub struct OrderingRepo;

impl OrderingRepo {
    /// Apply every pair in `pairs` to `collection`.
    ///
    /// Unknown ids are skipped. Every pair is attempted even after a failure;
    /// if any write failed, the first error is returned once all have run.
    pub async fn apply_orders(
        pool: &PgPool,
        collection: Collection,
        pairs: &[OrderPair],
    ) -> Result<ReorderReport, sqlx::Error> {
        let query = format!(
            "UPDATE {} SET sort_order = $2 WHERE id = $1",
            collection.table()
        );

        let mut report = ReorderReport::default();
        let mut first_error: Option<sqlx::Error> = None;

        for pair in pairs {
            match sqlx::query(&query)
                .bind(pair.id)
                .bind(pair.order)
                .execute(pool)
                .await
            {
                Ok(result) if result.rows_affected() > 0 => report.updated += 1,
                Ok(_) => {
                    tracing::debug!(%collection, id = pair.id, "Reorder skipped unknown id");
                    report.skipped.push(pair.id);
                }
                Err(e) => {
                    tracing::error!(%collection, id = pair.id, error = %e, "Reorder write failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    /// Number of rows in `collection`.
    pub async fn count(pool: &PgPool, collection: Collection) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM {}", collection.table());
        let (count,): (i64,) = sqlx::query_as(&query).fetch_one(pool).await?;
        Ok(count)
    }
}
