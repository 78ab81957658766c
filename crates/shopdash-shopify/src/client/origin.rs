//! Shop domain to API origin resolution.

use crate::error::ShopifyError;

/// Resolves a shop identifier to a `scheme://host[:port]` origin.
///
/// A bare domain (`"acme.myshopify.com"`) is served over HTTPS. A value that
/// already carries a scheme is parsed and reduced to its origin, which lets
/// tests point the client at a local mock server.
pub(crate) fn shop_origin(shop: &str) -> Result<String, ShopifyError> {
    let trimmed = shop.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ShopifyError::InvalidShop {
            shop: shop.to_owned(),
            reason: "shop domain is empty".to_owned(),
        });
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };

    let url = reqwest::Url::parse(&candidate).map_err(|e| ShopifyError::InvalidShop {
        shop: shop.to_owned(),
        reason: e.to_string(),
    })?;

    if url.host_str().is_none_or(str::is_empty) {
        return Err(ShopifyError::InvalidShop {
            shop: shop.to_owned(),
            reason: "no host".to_owned(),
        });
    }

    Ok(url.origin().ascii_serialization())
}

/// Host portion of a shop identifier for log and error context.
pub(crate) fn shop_host(shop: &str) -> String {
    shop_origin(shop)
        .ok()
        .and_then(|origin| {
            reqwest::Url::parse(&origin)
                .ok()
                .and_then(|u| u.host_str().map(str::to_owned))
        })
        .unwrap_or_else(|| shop.to_owned())
}
