use chrono::NaiveDate;
use shopdash_db::DbError;
use shopdash_shopify::{Resource, ShopifyError};
use thiserror::Error;

/// Failure of one ingestion run. The first error aborts the remaining
/// phases; rows written before it stay committed.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to upsert store '{shop}': {source}")]
    Store {
        shop: String,
        #[source]
        source: DbError,
    },

    #[error("failed to fetch {resource}: {source}")]
    Fetch {
        resource: Resource,
        #[source]
        source: ShopifyError,
    },

    #[error("failed to persist {resource} {external_id}: {source}")]
    Persist {
        resource: Resource,
        external_id: i64,
        #[source]
        source: DbError,
    },
}

impl IngestError {
    /// Coarse failure category for structured logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::Fetch { .. } => "external_api",
            IngestError::Store { .. } | IngestError::Persist { .. } => "persistence",
        }
    }
}

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("no store has been ingested for shop '{shop}'")]
    UnknownStore { shop: String },

    #[error("invalid date range: from {from} is after to {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error(transparent)]
    Query(#[from] DbError),
}
