use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Shopify Admin API client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopifySettings {
    pub api_version: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Records requested per page (Shopify caps this at 250).
    pub page_limit: u32,
    /// Pages fetched per resource before pagination is treated as runaway.
    pub max_pages: usize,
    pub inter_request_delay_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub shopify_shop: String,
    pub shopify_access_token: String,
    pub api_keys: Vec<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub shopify: ShopifySettings,
}

impl AppConfig {
    /// Credentials for the shop configured via `SHOPIFY_SHOP` /
    /// `SHOPIFY_ACCESS_TOKEN`.
    #[must_use]
    pub fn default_credentials(&self) -> crate::ShopCredentials {
        crate::ShopCredentials::new(&self.shopify_shop, &self.shopify_access_token)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("shopify_shop", &self.shopify_shop)
            .field("shopify_access_token", &"[redacted]")
            .field("api_keys", &format!("[{} redacted]", self.api_keys.len()))
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("shopify", &self.shopify)
            .finish()
    }
}
