//! Database operations for the `customers` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `customers` table. `id` is the platform's customer id.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerRow {
    pub id: i64,
    pub store_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub total_spent: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values written by [`upsert_customer`].
#[derive(Debug, Clone, Copy)]
pub struct CustomerUpsert<'a> {
    pub id: i64,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub total_spent: Decimal,
}

/// Upserts a customer keyed by external id.
///
/// Conflicts on `id` update the name fields, `email`, `total_spent`, and
/// `updated_at` when the existing row belongs to the same store.
///
/// Returns `true` if a row was written, `false` if the id is owned by a
/// different store.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_customer(
    pool: &PgPool,
    store_id: i64,
    customer: CustomerUpsert<'_>,
) -> Result<bool, DbError> {
    let rows_affected = sqlx::query(
        "INSERT INTO customers (id, store_id, first_name, last_name, email, total_spent) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (id) DO UPDATE SET \
             first_name  = EXCLUDED.first_name, \
             last_name   = EXCLUDED.last_name, \
             email       = EXCLUDED.email, \
             total_spent = EXCLUDED.total_spent, \
             updated_at  = NOW() \
         WHERE customers.store_id = EXCLUDED.store_id",
    )
    .bind(customer.id)
    .bind(store_id)
    .bind(customer.first_name)
    .bind(customer.last_name)
    .bind(customer.email)
    .bind(customer.total_spent)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected > 0)
}

/// Returns a customer by external id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_customer(pool: &PgPool, id: i64) -> Result<Option<CustomerRow>, DbError> {
    let row = sqlx::query_as::<_, CustomerRow>(
        "SELECT id, store_id, first_name, last_name, email, total_spent, created_at, updated_at \
         FROM customers WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Number of customers owned by a store.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_customers(pool: &PgPool, store_id: i64) -> Result<i64, DbError> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers WHERE store_id = $1")
            .bind(store_id)
            .fetch_one(pool)
            .await?;

    Ok(count)
}
