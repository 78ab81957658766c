//! HTTP client for the Shopify Admin REST API.

mod fetch_all;
mod origin;

use std::time::Duration;

use reqwest::Client;
use shopdash_core::{ShopCredentials, ShopifySettings};

use crate::error::ShopifyError;
use crate::retry::retry_with_backoff;
use crate::types::{Resource, ResourcePage};

/// Header carrying the shop's Admin API access token.
pub const ADMIN_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Long-lived Admin API client.
///
/// Built once at startup and shared; the shop and access token are supplied
/// per call through [`ShopCredentials`], so one client serves any tenant.
///
/// Non-2xx responses map to typed [`ShopifyError`] variants. Transient
/// failures are retried with exponential backoff when `max_retries > 0`.
pub struct ShopifyClient {
    pub(super) client: Client,
    pub(super) api_version: String,
    pub(super) page_limit: u32,
    pub(super) max_pages: usize,
    pub(super) inter_request_delay_ms: u64,
    pub(super) max_retries: u32,
    pub(super) backoff_base_secs: u64,
}

impl ShopifyClient {
    /// Creates a client from the configured Shopify settings.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(settings: &ShopifySettings) -> Result<Self, ShopifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&settings.user_agent)
            .build()?;

        Ok(Self {
            client,
            api_version: settings.api_version.clone(),
            page_limit: settings.page_limit,
            max_pages: settings.max_pages,
            inter_request_delay_ms: settings.inter_request_delay_ms,
            max_retries: settings.max_retries,
            backoff_base_secs: settings.retry_backoff_base_secs,
        })
    }

    /// Fetches one page of `P::RESOURCE`.
    ///
    /// Returns the decoded page and the raw `Link` header, if any.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::Unauthorized`]: HTTP 401/403.
    /// - [`ShopifyError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ShopifyError::NotFound`]: HTTP 404.
    /// - [`ShopifyError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ShopifyError::Http`]: network or TLS failure after all retries.
    /// - [`ShopifyError::Deserialize`]: body does not match the expected shape.
    pub async fn fetch_page<P: ResourcePage>(
        &self,
        credentials: &ShopCredentials,
        page_info: Option<&str>,
    ) -> Result<(P, Option<String>), ShopifyError> {
        let url = self.resource_url(&credentials.shop, P::RESOURCE, page_info)?;
        let shop = origin::shop_host(&credentials.shop);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            let shop = shop.clone();
            async move {
                let response = self
                    .client
                    .get(url.clone())
                    .header(ADMIN_TOKEN_HEADER, &credentials.access_token)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(parse_retry_after)
                        .unwrap_or(2);
                    return Err(ShopifyError::RateLimited {
                        shop,
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::UNAUTHORIZED
                    || status == reqwest::StatusCode::FORBIDDEN
                {
                    return Err(ShopifyError::Unauthorized {
                        shop,
                        status: status.as_u16(),
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ShopifyError::NotFound {
                        url: url.to_string(),
                    });
                }

                if !status.is_success() {
                    return Err(ShopifyError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let link_header = response
                    .headers()
                    .get(reqwest::header::LINK)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned);

                let body = response.text().await?;
                let page = serde_json::from_str::<P>(&body).map_err(|e| {
                    ShopifyError::Deserialize {
                        context: format!("{} page from {shop}", P::RESOURCE),
                        source: e,
                    }
                })?;

                Ok((page, link_header))
            }
        })
        .await
    }

    /// Builds `{origin}/admin/api/{version}/{resource}.json` with paging
    /// parameters. Resource filters are only sent on the first page.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::InvalidShop`] if the shop cannot be turned
    /// into a URL origin.
    fn resource_url(
        &self,
        shop: &str,
        resource: Resource,
        page_info: Option<&str>,
    ) -> Result<reqwest::Url, ShopifyError> {
        let origin = origin::shop_origin(shop)?;
        let base = format!(
            "{origin}/admin/api/{}/{}.json",
            self.api_version,
            resource.as_str()
        );
        let mut url = reqwest::Url::parse(&base).map_err(|e| ShopifyError::InvalidShop {
            shop: shop.to_owned(),
            reason: e.to_string(),
        })?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &self.page_limit.to_string());
            match page_info {
                Some(cursor) => {
                    query.append_pair("page_info", cursor);
                }
                None => {
                    for (key, value) in resource.first_page_filters() {
                        query.append_pair(key, value);
                    }
                }
            }
        }

        Ok(url)
    }
}

/// `Retry-After` is documented as seconds but Shopify sends values like `"2.0"`.
fn parse_retry_after(raw: &str) -> Option<u64> {
    let secs = raw.trim().parse::<f64>().ok()?;
    if secs.is_finite() && secs >= 0.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(secs.ceil() as u64)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
