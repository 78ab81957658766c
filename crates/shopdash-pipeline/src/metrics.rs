//! Dashboard read models built from stored rows.
//!
//! Money stays [`Decimal`] until serialisation, where it becomes a JSON
//! number. Customer ids serialise as strings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shopdash_core::ExternalId;
use shopdash_db::{DailyOrdersFilters, DailyOrdersRow, StoreRow, TopCustomerRow};
use sqlx::PgPool;

use crate::error::MetricsError;

/// Maximum number of customers in [`DashboardMetrics::top_customers`].
pub const TOP_CUSTOMERS_LIMIT: i64 = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_customers: i64,
    pub total_orders: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub top_customers: Vec<TopCustomer>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomer {
    pub id: ExternalId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
}

impl From<TopCustomerRow> for TopCustomer {
    fn from(row: TopCustomerRow) -> Self {
        Self {
            id: ExternalId(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            total_spent: row.total_spent,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrdersByDate {
    pub orders: Vec<DailyOrders>,
}

/// Orders placed on one UTC calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct DailyOrders {
    pub date: NaiveDate,
    pub orders: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

impl From<DailyOrdersRow> for DailyOrders {
    fn from(row: DailyOrdersRow) -> Self {
        Self {
            date: row.day,
            orders: row.order_count,
            revenue: row.revenue,
        }
    }
}

async fn resolve_store(pool: &PgPool, shop: &str) -> Result<StoreRow, MetricsError> {
    shopdash_db::get_store_by_shop(pool, shop)
        .await?
        .ok_or_else(|| MetricsError::UnknownStore {
            shop: shop.to_owned(),
        })
}

/// Headline totals and top customers for `shop`.
///
/// Every call re-queries the database.
///
/// # Errors
///
/// Returns [`MetricsError::UnknownStore`] if `shop` has never been ingested,
/// or [`MetricsError::Query`] if a read fails.
pub async fn aggregate_dashboard_metrics(
    pool: &PgPool,
    shop: &str,
) -> Result<DashboardMetrics, MetricsError> {
    let store = resolve_store(pool, shop).await?;

    let totals = shopdash_db::store_totals(pool, store.id).await?;
    let top =
        shopdash_db::list_top_customers_by_spend(pool, store.id, TOP_CUSTOMERS_LIMIT).await?;

    tracing::debug!(
        shop,
        store_id = store.id,
        total_customers = totals.total_customers,
        total_orders = totals.total_orders,
        "dashboard metrics aggregated"
    );

    Ok(DashboardMetrics {
        total_customers: totals.total_customers,
        total_orders: totals.total_orders,
        total_revenue: totals.total_revenue,
        top_customers: top.into_iter().map(TopCustomer::from).collect(),
    })
}

/// Per-day order counts and revenue for `shop`, oldest first. Bounds are
/// inclusive and either side may be open.
///
/// # Errors
///
/// Returns [`MetricsError::InvalidRange`] when `from` is after `to`,
/// [`MetricsError::UnknownStore`] for a shop that was never ingested, or
/// [`MetricsError::Query`] if the read fails.
pub async fn orders_by_date(
    pool: &PgPool,
    shop: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<OrdersByDate, MetricsError> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(MetricsError::InvalidRange { from, to });
        }
    }

    let store = resolve_store(pool, shop).await?;
    let rows =
        shopdash_db::list_daily_orders(pool, store.id, DailyOrdersFilters { from, to }).await?;

    Ok(OrdersByDate {
        orders: rows.into_iter().map(DailyOrders::from).collect(),
    })
}
