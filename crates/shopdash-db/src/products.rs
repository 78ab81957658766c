//! Database operations for the `products` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `products` table. `id` is the platform's product id.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub store_id: i64,
    pub title: String,
    pub vendor: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upserts a product keyed by its external id.
///
/// Conflicts on `id` update `title`, `vendor`, and `updated_at`, but only
/// when the existing row belongs to the same store. Ownership is never
/// reassigned.
///
/// Returns `true` if a row was inserted or updated, `false` if the id is
/// already owned by a different store.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_product(
    pool: &PgPool,
    store_id: i64,
    id: i64,
    title: &str,
    vendor: Option<&str>,
) -> Result<bool, DbError> {
    let rows_affected = sqlx::query(
        "INSERT INTO products (id, store_id, title, vendor) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (id) DO UPDATE SET \
             title      = EXCLUDED.title, \
             vendor     = EXCLUDED.vendor, \
             updated_at = NOW() \
         WHERE products.store_id = EXCLUDED.store_id",
    )
    .bind(id)
    .bind(store_id)
    .bind(title)
    .bind(vendor)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected > 0)
}

/// Returns a product by external id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product(pool: &PgPool, id: i64) -> Result<Option<ProductRow>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(
        "SELECT id, store_id, title, vendor, created_at, updated_at \
         FROM products WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Number of products owned by a store.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_products(pool: &PgPool, store_id: i64) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE store_id = $1")
        .bind(store_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}
