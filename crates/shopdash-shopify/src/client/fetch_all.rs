//! Multi-page fetch loops for `ShopifyClient`.

use std::time::Duration;

use shopdash_core::ShopCredentials;

use crate::error::ShopifyError;
use crate::pagination::extract_next_cursor;
use crate::types::{
    CustomersPage, OrdersPage, ProductsPage, ResourcePage, ShopifyCustomer, ShopifyOrder,
    ShopifyProduct,
};

use super::{origin, ShopifyClient};

impl ShopifyClient {
    /// Fetches every page of `P::RESOURCE`, following `Link` cursors until no
    /// `rel="next"` link remains.
    ///
    /// All-or-nothing: if any page fails, records from earlier pages are
    /// discarded and the error is returned.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_page`]. Returns
    /// [`ShopifyError::PaginationLimit`] when the shop still reports a next
    /// page after `max_pages` pages.
    pub async fn fetch_all<P: ResourcePage>(
        &self,
        credentials: &ShopCredentials,
    ) -> Result<Vec<P::Item>, ShopifyError> {
        let mut items: Vec<P::Item> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            if page_count > 0 && self.inter_request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.inter_request_delay_ms)).await;
            }
            page_count += 1;

            let (page, link_header) = self
                .fetch_page::<P>(credentials, cursor.as_deref())
                .await?;
            items.extend(page.into_items());

            cursor = extract_next_cursor(link_header.as_deref());
            if cursor.is_none() {
                break;
            }

            if page_count >= self.max_pages {
                return Err(ShopifyError::PaginationLimit {
                    shop: origin::shop_host(&credentials.shop),
                    resource: P::RESOURCE.as_str(),
                    max_pages: self.max_pages,
                });
            }
        }

        tracing::debug!(
            shop = %credentials.shop,
            resource = %P::RESOURCE,
            pages = page_count,
            records = items.len(),
            "fetched resource"
        );

        Ok(items)
    }

    /// Fetches all products for the shop.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_all`].
    pub async fn fetch_all_products(
        &self,
        credentials: &ShopCredentials,
    ) -> Result<Vec<ShopifyProduct>, ShopifyError> {
        self.fetch_all::<ProductsPage>(credentials).await
    }

    /// Fetches all customers for the shop.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_all`].
    pub async fn fetch_all_customers(
        &self,
        credentials: &ShopCredentials,
    ) -> Result<Vec<ShopifyCustomer>, ShopifyError> {
        self.fetch_all::<CustomersPage>(credentials).await
    }

    /// Fetches all orders for the shop, regardless of status.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_all`].
    pub async fn fetch_all_orders(
        &self,
        credentials: &ShopCredentials,
    ) -> Result<Vec<ShopifyOrder>, ShopifyError> {
        self.fetch_all::<OrdersPage>(credentials).await
    }
}
