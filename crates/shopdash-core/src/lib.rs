mod app_config;
mod config;
pub mod ids;

pub use app_config::{AppConfig, Environment, ShopifySettings};
pub use config::{load_app_config, load_app_config_from_env};
pub use ids::ExternalId;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Credentials for one shop (tenant) on the commerce platform.
///
/// Passed explicitly into every ingestion call; nothing below the config
/// layer reads credentials from the process environment.
#[derive(Clone, PartialEq, Eq)]
pub struct ShopCredentials {
    /// Shop domain, e.g. `"acme.myshopify.com"`.
    pub shop: String,
    pub access_token: String,
}

impl ShopCredentials {
    #[must_use]
    pub fn new(shop: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            shop: shop.into(),
            access_token: access_token.into(),
        }
    }
}

impl std::fmt::Debug for ShopCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopCredentials")
            .field("shop", &self.shop)
            .field("access_token", &"[redacted]")
            .finish()
    }
}
