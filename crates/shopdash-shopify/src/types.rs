//! Shopify Admin REST response types for `products`, `customers`, `orders`.
//!
//! Only the fields the ingestion pipeline persists are modelled; serde
//! ignores the rest of each payload.
//!
//! ### Identifiers
//! Ids arrive as JSON numbers and can be 19 digits long. They are parsed
//! into [`ExternalId`] directly (serde_json keeps integers exact), never via
//! a float.
//!
//! ### Money
//! `total_price` and `total_spent` are decimal strings (`"199.65"`). They are
//! parsed into [`Decimal`] so the value is exact end to end. Newer API
//! versions may omit `total_spent`; it is modelled as optional.
//!
//! ### Guest orders
//! `customer` is `null` or absent on guest checkouts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shopdash_core::ExternalId;

/// Admin API collection endpoints read by the ingestion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Products,
    Customers,
    Orders,
}

impl Resource {
    /// Path segment and JSON envelope key, e.g. `"products"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Resource::Products => "products",
            Resource::Customers => "customers",
            Resource::Orders => "orders",
        }
    }

    /// Filters sent on the first page only. Shopify rejects any parameter
    /// other than `limit` alongside a `page_info` cursor.
    #[must_use]
    pub const fn first_page_filters(self) -> &'static [(&'static str, &'static str)] {
        match self {
            // Without `status=any` only open orders are returned.
            Resource::Orders => &[("status", "any")],
            Resource::Products | Resource::Customers => &[],
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of a collection endpoint.
pub trait ResourcePage: DeserializeOwned {
    type Item;
    const RESOURCE: Resource;

    fn into_items(self) -> Vec<Self::Item>;
}

#[derive(Debug, Deserialize)]
pub struct ProductsPage {
    pub products: Vec<ShopifyProduct>,
}

#[derive(Debug, Deserialize)]
pub struct CustomersPage {
    pub customers: Vec<ShopifyCustomer>,
}

#[derive(Debug, Deserialize)]
pub struct OrdersPage {
    pub orders: Vec<ShopifyOrder>,
}

impl ResourcePage for ProductsPage {
    type Item = ShopifyProduct;
    const RESOURCE: Resource = Resource::Products;

    fn into_items(self) -> Vec<ShopifyProduct> {
        self.products
    }
}

impl ResourcePage for CustomersPage {
    type Item = ShopifyCustomer;
    const RESOURCE: Resource = Resource::Customers;

    fn into_items(self) -> Vec<ShopifyCustomer> {
        self.customers
    }
}

impl ResourcePage for OrdersPage {
    type Item = ShopifyOrder;
    const RESOURCE: Resource = Resource::Orders;

    fn into_items(self) -> Vec<ShopifyOrder> {
        self.orders
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyProduct {
    pub id: ExternalId,
    pub title: String,
    /// Vendor as configured in the shop admin; empty or absent on some stores.
    #[serde(default)]
    pub vendor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyCustomer {
    pub id: ExternalId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Lifetime spend; absent on API versions that dropped the field.
    #[serde(default)]
    pub total_spent: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyOrder {
    pub id: ExternalId,
    pub total_price: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub customer: Option<ShopifyOrderCustomer>,
}

impl ShopifyOrder {
    /// Id of the ordering customer, `None` for guest checkouts.
    #[must_use]
    pub fn customer_id(&self) -> Option<ExternalId> {
        self.customer.as_ref().map(|c| c.id)
    }
}

/// The customer stub embedded in an order payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyOrderCustomer {
    pub id: ExternalId,
}
