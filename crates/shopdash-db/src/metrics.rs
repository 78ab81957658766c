//! Read-model aggregate queries behind the dashboard endpoints.
//!
//! Every query is scoped to a single `store_id`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// Headline counts and revenue for one store.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StoreTotalsRow {
    pub total_customers: i64,
    pub total_orders: i64,
    /// Exact sum of `orders.total_price`; zero when the store has no orders.
    pub total_revenue: Decimal,
}

/// A customer ranked by lifetime spend.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TopCustomerRow {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub total_spent: Decimal,
}

/// Order count and revenue for one UTC calendar day.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DailyOrdersRow {
    pub day: NaiveDate,
    pub order_count: i64,
    pub revenue: Decimal,
}

/// Inclusive day bounds for [`list_daily_orders`]; `None` leaves a side open.
#[derive(Debug, Clone, Copy, Default)]
pub struct DailyOrdersFilters {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Returns customer count, order count, and total revenue for a store.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn store_totals(pool: &PgPool, store_id: i64) -> Result<StoreTotalsRow, DbError> {
    let row = sqlx::query_as::<_, StoreTotalsRow>(
        "SELECT \
             (SELECT COUNT(*) FROM customers WHERE store_id = $1) AS total_customers, \
             (SELECT COUNT(*) FROM orders WHERE store_id = $1) AS total_orders, \
             (SELECT COALESCE(SUM(total_price), 0) FROM orders WHERE store_id = $1) \
                 AS total_revenue",
    )
    .bind(store_id)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns up to `limit` of the store's customers by `total_spent`, highest
/// first. Equal spend is ordered by ascending customer id so the ranking is
/// stable across calls.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_top_customers_by_spend(
    pool: &PgPool,
    store_id: i64,
    limit: i64,
) -> Result<Vec<TopCustomerRow>, DbError> {
    let rows = sqlx::query_as::<_, TopCustomerRow>(
        "SELECT id, first_name, last_name, email, total_spent \
         FROM customers \
         WHERE store_id = $1 \
         ORDER BY total_spent DESC, id ASC \
         LIMIT $2",
    )
    .bind(store_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns per-day order counts and revenue, oldest day first.
///
/// Days are UTC calendar days of `placed_at`; orders without a placement
/// time are excluded.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_daily_orders(
    pool: &PgPool,
    store_id: i64,
    filters: DailyOrdersFilters,
) -> Result<Vec<DailyOrdersRow>, DbError> {
    let rows = sqlx::query_as::<_, DailyOrdersRow>(
        "SELECT \
             (placed_at AT TIME ZONE 'UTC')::date AS day, \
             COUNT(*) AS order_count, \
             COALESCE(SUM(total_price), 0) AS revenue \
         FROM orders \
         WHERE store_id = $1 \
           AND placed_at IS NOT NULL \
           AND ($2::date IS NULL OR (placed_at AT TIME ZONE 'UTC')::date >= $2) \
           AND ($3::date IS NULL OR (placed_at AT TIME ZONE 'UTC')::date <= $3) \
         GROUP BY 1 \
         ORDER BY 1",
    )
    .bind(store_id)
    .bind(filters.from)
    .bind(filters.to)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
