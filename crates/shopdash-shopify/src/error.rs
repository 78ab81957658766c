use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShopifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("access token rejected by {shop} (HTTP {status})")]
    Unauthorized { shop: String, status: u16 },

    #[error("rate limited by {shop} (retry after {retry_after_secs}s)")]
    RateLimited { shop: String, retry_after_secs: u64 },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("pagination limit reached for {resource} on {shop}: exceeded {max_pages} pages")]
    PaginationLimit {
        shop: String,
        resource: &'static str,
        max_pages: usize,
    },

    #[error("invalid shop \"{shop}\": {reason}")]
    InvalidShop { shop: String, reason: String },
}
