//! Exponential backoff for transient Admin API failures.
//!
//! Retries are off unless `SHOPIFY_MAX_RETRIES` is set; with `max_retries = 0`
//! the first error is returned as-is.

use std::future::Future;
use std::time::Duration;

use crate::error::ShopifyError;

/// Rate limits, network failures, and 5xx responses are transient. Auth
/// failures, 404s, and malformed bodies are not.
fn is_retriable(err: &ShopifyError) -> bool {
    match err {
        ShopifyError::RateLimited { .. } | ShopifyError::Http(_) => true,
        ShopifyError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Runs `operation`, retrying transient errors up to `max_retries` more times.
///
/// The wait before retry `n` (1-based) is `backoff_base_secs * 2^(n-1)`, or
/// the server's `Retry-After` when that is longer.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ShopifyError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ShopifyError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let mut delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        if let ShopifyError::RateLimited {
            retry_after_secs, ..
        } = &err
        {
            delay_secs = delay_secs.max(*retry_after_secs);
        }

        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient Shopify error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn server_error() -> ShopifyError {
        ShopifyError::UnexpectedStatus {
            status: 503,
            url: "https://acme.myshopify.com/admin/api/2024-01/orders.json".to_owned(),
        }
    }

    async fn count_calls<T>(
        max_retries: u32,
        results: impl Fn(u32) -> Result<T, ShopifyError>,
    ) -> (Result<T, ShopifyError>, u32) {
        let calls = Arc::new(AtomicU32::new(0));
        let result = retry_with_backoff(max_retries, 0, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            let outcome = results(n);
            async move { outcome }
        })
        .await;
        (result, calls.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn no_retries_by_default() {
        let (result, calls) = count_calls::<u32>(0, |_| Err(server_error())).await;
        assert!(matches!(
            result,
            Err(ShopifyError::UnexpectedStatus { status: 503, .. })
        ));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn retries_server_errors_then_succeeds() {
        let (result, calls) =
            count_calls(3, |n| if n < 2 { Err(server_error()) } else { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let (result, calls) = count_calls::<u32>(2, |_| {
            Err(ShopifyError::RateLimited {
                shop: "acme.myshopify.com".to_owned(),
                retry_after_secs: 0,
            })
        })
        .await;
        assert!(matches!(result, Err(ShopifyError::RateLimited { .. })));
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn auth_failures_are_not_retried() {
        let (result, calls) = count_calls::<u32>(3, |_| {
            Err(ShopifyError::Unauthorized {
                shop: "acme.myshopify.com".to_owned(),
                status: 401,
            })
        })
        .await;
        assert!(matches!(result, Err(ShopifyError::Unauthorized { .. })));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let (result, calls) = count_calls::<u32>(3, |_| {
            Err(ShopifyError::UnexpectedStatus {
                status: 422,
                url: "u".to_owned(),
            })
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls, 1);
    }
}
