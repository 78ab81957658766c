//! Ingestion pipeline and dashboard metrics aggregation.
//!
//! [`IngestPipeline`] pulls one shop's catalogue, customers, and orders from
//! the Admin API and upserts them. [`aggregate_dashboard_metrics`] and
//! [`orders_by_date`] read the stored data back as dashboard read models.

mod error;
pub mod ingest;
pub mod metrics;

pub use error::{IngestError, MetricsError};
pub use ingest::{IngestPipeline, IngestSummary};
pub use metrics::{
    aggregate_dashboard_metrics, orders_by_date, DailyOrders, DashboardMetrics, OrdersByDate,
    TopCustomer, TOP_CUSTOMERS_LIMIT,
};
