use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shopdash_core::{AppConfig, Environment};
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Request ID stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Bearer-token settings for the protected `/api` routes.
#[derive(Debug, Clone)]
pub struct AuthState {
    api_keys: Arc<Vec<String>>,
    pub enabled: bool,
}

impl AuthState {
    /// Builds auth from `SHOPDASH_API_KEYS`.
    ///
    /// In development, no keys disables auth. Elsewhere, no keys fails
    /// startup.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        if config.api_keys.is_empty() {
            if config.env == Environment::Development {
                tracing::warn!(
                    "SHOPDASH_API_KEYS not set; bearer auth disabled in development environment"
                );
                return Ok(Self::disabled());
            }

            anyhow::bail!(
                "SHOPDASH_API_KEYS is required outside development; provide comma-separated bearer tokens"
            );
        }

        Ok(Self::with_keys(config.api_keys.clone()))
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self {
            api_keys: Arc::new(Vec::new()),
            enabled: false,
        }
    }

    #[must_use]
    pub fn with_keys(keys: Vec<String>) -> Self {
        Self {
            api_keys: Arc::new(keys),
            enabled: true,
        }
    }

    fn allows(&self, token: &str) -> bool {
        self.api_keys.iter().fold(false, |found, key| {
            found | bool::from(key.as_bytes().ct_eq(token.as_bytes()))
        })
    }
}

#[derive(Debug, Serialize)]
struct UnauthorizedBody {
    status: &'static str,
    message: &'static str,
}

/// Reads `x-request-id` or generates a `UUIDv4`, stores it as a
/// [`RequestId`] extension, and echoes it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Rejects requests without an accepted bearer token when auth is enabled.
pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        return next.run(req).await;
    }

    match extract_bearer_token(req.headers().get(AUTHORIZATION)) {
        Some(token) if auth.allows(token) => next.run(req).await,
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(UnauthorizedBody {
                status: "error",
                message: "missing or invalid bearer token",
            }),
        )
            .into_response(),
    }
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_bearer_token_accepts_valid_header() {
        let header = HeaderValue::from_static("Bearer test-token");
        assert_eq!(extract_bearer_token(Some(&header)), Some("test-token"));
    }

    #[test]
    fn extract_bearer_token_rejects_non_bearer_header() {
        let header = HeaderValue::from_static("Basic abc123");
        assert_eq!(extract_bearer_token(Some(&header)), None);
    }

    #[test]
    fn allows_only_configured_keys() {
        let auth = AuthState::with_keys(vec!["alpha".to_owned(), "beta".to_owned()]);
        assert!(auth.allows("beta"));
        assert!(!auth.allows("gamma"));
        assert!(!auth.allows("bet"));
    }
}
