use std::fmt::Display;
use std::str::FromStr;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use shopdash_pipeline::{DashboardMetrics, MetricsError, OrdersByDate};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

const METRICS_FAILED: &str = "Failed to load dashboard metrics.";
const ORDERS_FAILED: &str = "Failed to load orders by date.";

#[derive(Debug, Deserialize)]
pub(super) struct MetricsQuery {
    pub shop: Option<String>,
}

/// Treats `?from=` the same as an absent parameter.
fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct OrdersByDateQuery {
    pub shop: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub to: Option<NaiveDate>,
}

fn resolve_shop(state: &AppState, shop: Option<String>) -> String {
    shop.filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| state.config.shopify_shop.clone())
}

fn map_query_rejection(req_id: &RequestId, rejection: &QueryRejection) -> ApiError {
    tracing::debug!(request_id = %req_id.0, error = %rejection, "rejected query string");
    ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text())
}

fn map_metrics_error(
    req_id: &RequestId,
    shop: &str,
    err: &MetricsError,
    fallback: &str,
) -> ApiError {
    match err {
        MetricsError::UnknownStore { .. } => ApiError::new(
            StatusCode::NOT_FOUND,
            format!("No data found for shop '{shop}'."),
        ),
        MetricsError::InvalidRange { .. } => {
            ApiError::new(StatusCode::BAD_REQUEST, err.to_string())
        }
        MetricsError::Query(source) => {
            tracing::error!(
                request_id = %req_id.0,
                shop,
                kind = "persistence",
                error = %source,
                "metrics query failed"
            );
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, fallback)
        }
    }
}

/// Totals and top customers for `?shop=` (defaults to the configured shop).
pub(super) async fn dashboard_metrics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<MetricsQuery>, QueryRejection>,
) -> Result<Json<DashboardMetrics>, ApiError> {
    let Query(query) = query.map_err(|e| map_query_rejection(&req_id, &e))?;
    let shop = resolve_shop(&state, query.shop);

    shopdash_pipeline::aggregate_dashboard_metrics(&state.pool, &shop)
        .await
        .map(Json)
        .map_err(|e| map_metrics_error(&req_id, &shop, &e, METRICS_FAILED))
}

pub(super) async fn orders_by_date(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<OrdersByDateQuery>, QueryRejection>,
) -> Result<Json<OrdersByDate>, ApiError> {
    let Query(query) = query.map_err(|e| map_query_rejection(&req_id, &e))?;
    let shop = resolve_shop(&state, query.shop);

    shopdash_pipeline::orders_by_date(&state.pool, &shop, query.from, query.to)
        .await
        .map(Json)
        .map_err(|e| map_metrics_error(&req_id, &shop, &e, ORDERS_FAILED))
}
