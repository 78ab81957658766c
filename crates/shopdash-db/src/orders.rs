//! Database operations for the `orders` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `orders` table. `id` is the platform's order id.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub store_id: i64,
    /// `NULL` for guest checkouts and for customers this store never ingested.
    pub customer_id: Option<i64>,
    pub total_price: Decimal,
    pub currency: Option<String>,
    /// When the order was placed on the platform.
    pub placed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values written by [`upsert_order`].
#[derive(Debug, Clone, Copy)]
pub struct OrderUpsert<'a> {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub total_price: Decimal,
    pub currency: Option<&'a str>,
    pub placed_at: Option<DateTime<Utc>>,
}

/// Upserts an order keyed by external id.
///
/// `customer_id` is resolved inside the statement against the store's own
/// customers: an id that is `NULL`, unknown, or owned by another store is
/// written as `NULL` instead of failing the foreign key.
///
/// Conflicts on `id` update every column except `store_id`, and only when
/// the existing row belongs to the same store.
///
/// Returns `true` if a row was written, `false` if the id is owned by a
/// different store.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_order(
    pool: &PgPool,
    store_id: i64,
    order: OrderUpsert<'_>,
) -> Result<bool, DbError> {
    let rows_affected = sqlx::query(
        "INSERT INTO orders (id, store_id, customer_id, total_price, currency, placed_at) \
         VALUES ( \
             $1, $2, \
             (SELECT c.id FROM customers c WHERE c.id = $3 AND c.store_id = $2), \
             $4, $5, $6 \
         ) \
         ON CONFLICT (id) DO UPDATE SET \
             customer_id = EXCLUDED.customer_id, \
             total_price = EXCLUDED.total_price, \
             currency    = EXCLUDED.currency, \
             placed_at   = EXCLUDED.placed_at, \
             updated_at  = NOW() \
         WHERE orders.store_id = EXCLUDED.store_id",
    )
    .bind(order.id)
    .bind(store_id)
    .bind(order.customer_id)
    .bind(order.total_price)
    .bind(order.currency)
    .bind(order.placed_at)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected > 0)
}

/// Returns an order by external id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_order(pool: &PgPool, id: i64) -> Result<Option<OrderRow>, DbError> {
    let row = sqlx::query_as::<_, OrderRow>(
        "SELECT id, store_id, customer_id, total_price, currency, placed_at, \
                created_at, updated_at \
         FROM orders WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Number of orders owned by a store.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_orders(pool: &PgPool, store_id: i64) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE store_id = $1")
        .bind(store_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}
