//! One-shot ingestion of a shop's products, customers, and orders.

use rust_decimal::Decimal;
use shopdash_core::ShopCredentials;
use shopdash_db::{CustomerUpsert, OrderUpsert};
use shopdash_shopify::{Resource, ShopifyClient};
use sqlx::PgPool;

use crate::error::IngestError;

/// Records written by one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSummary {
    pub store_id: i64,
    pub shop: String,
    pub products: usize,
    pub customers: usize,
    pub orders: usize,
    /// Records whose id is already owned by another store.
    pub skipped: usize,
}

impl IngestSummary {
    /// Human-readable outcome returned to API callers.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Ingested {} products, {} customers, and {} orders.",
            self.products, self.customers, self.orders
        )
    }
}

/// Fetch-then-upsert pipeline over a shared client and pool.
///
/// Phases run in order: store, products, customers, orders. Customers are
/// written before orders so order rows can link to them.
pub struct IngestPipeline {
    client: ShopifyClient,
    pool: PgPool,
}

impl IngestPipeline {
    #[must_use]
    pub fn new(client: ShopifyClient, pool: PgPool) -> Self {
        Self { client, pool }
    }

    /// Runs one full ingestion for the shop named by `credentials`.
    ///
    /// # Errors
    ///
    /// Returns the first [`IngestError`] encountered. Later phases do not
    /// run; rows already written are kept.
    pub async fn run(&self, credentials: &ShopCredentials) -> Result<IngestSummary, IngestError> {
        let store = shopdash_db::upsert_store(
            &self.pool,
            &credentials.shop,
            &credentials.access_token,
        )
        .await
        .map_err(|source| IngestError::Store {
            shop: credentials.shop.clone(),
            source,
        })?;

        tracing::info!(shop = %credentials.shop, store_id = store.id, "ingestion started");

        let mut summary = IngestSummary {
            store_id: store.id,
            shop: store.shop,
            products: 0,
            customers: 0,
            orders: 0,
            skipped: 0,
        };

        self.ingest_products(credentials, &mut summary).await?;
        self.ingest_customers(credentials, &mut summary).await?;
        self.ingest_orders(credentials, &mut summary).await?;

        tracing::info!(
            shop = %summary.shop,
            store_id = summary.store_id,
            products = summary.products,
            customers = summary.customers,
            orders = summary.orders,
            skipped = summary.skipped,
            "ingestion complete"
        );

        Ok(summary)
    }

    async fn ingest_products(
        &self,
        credentials: &ShopCredentials,
        summary: &mut IngestSummary,
    ) -> Result<(), IngestError> {
        let products = self
            .client
            .fetch_all_products(credentials)
            .await
            .map_err(|source| IngestError::Fetch {
                resource: Resource::Products,
                source,
            })?;

        for product in &products {
            let id = product.id.get();
            let written = shopdash_db::upsert_product(
                &self.pool,
                summary.store_id,
                id,
                &product.title,
                product.vendor.as_deref(),
            )
            .await
            .map_err(|source| persist_error(Resource::Products, id, source))?;
            tally(summary, Resource::Products, id, written);
        }

        tracing::info!(
            store_id = summary.store_id,
            fetched = products.len(),
            written = summary.products,
            "products ingested"
        );
        Ok(())
    }

    async fn ingest_customers(
        &self,
        credentials: &ShopCredentials,
        summary: &mut IngestSummary,
    ) -> Result<(), IngestError> {
        let customers = self
            .client
            .fetch_all_customers(credentials)
            .await
            .map_err(|source| IngestError::Fetch {
                resource: Resource::Customers,
                source,
            })?;

        for customer in &customers {
            let id = customer.id.get();
            let row = CustomerUpsert {
                id,
                first_name: customer.first_name.as_deref(),
                last_name: customer.last_name.as_deref(),
                email: customer.email.as_deref(),
                total_spent: customer.total_spent.unwrap_or(Decimal::ZERO),
            };
            let written = shopdash_db::upsert_customer(&self.pool, summary.store_id, row)
                .await
                .map_err(|source| persist_error(Resource::Customers, id, source))?;
            tally(summary, Resource::Customers, id, written);
        }

        tracing::info!(
            store_id = summary.store_id,
            fetched = customers.len(),
            written = summary.customers,
            "customers ingested"
        );
        Ok(())
    }

    async fn ingest_orders(
        &self,
        credentials: &ShopCredentials,
        summary: &mut IngestSummary,
    ) -> Result<(), IngestError> {
        let orders = self
            .client
            .fetch_all_orders(credentials)
            .await
            .map_err(|source| IngestError::Fetch {
                resource: Resource::Orders,
                source,
            })?;

        for order in &orders {
            let id = order.id.get();
            let row = OrderUpsert {
                id,
                customer_id: order.customer_id().map(|c| c.get()),
                total_price: order.total_price,
                currency: order.currency.as_deref(),
                placed_at: order.created_at,
            };
            let written = shopdash_db::upsert_order(&self.pool, summary.store_id, row)
                .await
                .map_err(|source| persist_error(Resource::Orders, id, source))?;
            tally(summary, Resource::Orders, id, written);
        }

        tracing::info!(
            store_id = summary.store_id,
            fetched = orders.len(),
            written = summary.orders,
            "orders ingested"
        );
        Ok(())
    }
}

fn persist_error(resource: Resource, external_id: i64, source: shopdash_db::DbError) -> IngestError {
    IngestError::Persist {
        resource,
        external_id,
        source,
    }
}

fn tally(summary: &mut IngestSummary, resource: Resource, external_id: i64, written: bool) {
    if !written {
        tracing::warn!(
            store_id = summary.store_id,
            %resource,
            external_id,
            "id is owned by another store; skipped"
        );
        summary.skipped += 1;
        return;
    }

    match resource {
        Resource::Products => summary.products += 1,
        Resource::Customers => summary.customers += 1,
        Resource::Orders => summary.orders += 1,
    }
}
