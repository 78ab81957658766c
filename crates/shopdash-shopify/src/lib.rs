pub mod client;
pub mod error;
pub mod pagination;
mod retry;
pub mod types;

pub use client::{ShopifyClient, ADMIN_TOKEN_HEADER};
pub use error::ShopifyError;
pub use types::{
    Resource, ResourcePage, ShopifyCustomer, ShopifyOrder, ShopifyOrderCustomer, ShopifyProduct,
};
