//! Database operations for the `stores` table (one row per tenant shop).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `stores` table.
///
/// `access_token` is deliberately not selected; nothing outside the
/// ingestion write path needs it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreRow {
    pub id: i64,
    pub shop: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inserts the store or, when `shop` already exists, replaces its access
/// token with the one supplied.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_store(
    pool: &PgPool,
    shop: &str,
    access_token: &str,
) -> Result<StoreRow, DbError> {
    let row = sqlx::query_as::<_, StoreRow>(
        "INSERT INTO stores (shop, access_token) \
         VALUES ($1, $2) \
         ON CONFLICT (shop) DO UPDATE SET \
             access_token = EXCLUDED.access_token, \
             updated_at   = NOW() \
         RETURNING id, shop, created_at, updated_at",
    )
    .bind(shop)
    .bind(access_token)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns the store for a shop domain, or `None` if it has never been
/// ingested.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_store_by_shop(pool: &PgPool, shop: &str) -> Result<Option<StoreRow>, DbError> {
    let row = sqlx::query_as::<_, StoreRow>(
        "SELECT id, shop, created_at, updated_at FROM stores WHERE shop = $1",
    )
    .bind(shop)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
