use crate::app_config::{AppConfig, Environment, ShopifySettings};
use crate::ConfigError;

/// Shopify rejects `limit` values above this.
const MAX_PAGE_LIMIT: u32 = 250;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let shopify_shop = require("SHOPIFY_SHOP")?.trim().to_string();
    let shopify_access_token = require("SHOPIFY_ACCESS_TOKEN")?;

    let env = parse_environment(&or_default("SHOPDASH_ENV", "development"))?;

    let bind_addr = or_default("SHOPDASH_BIND_ADDR", "0.0.0.0:3001")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("SHOPDASH_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("SHOPDASH_LOG_LEVEL", "info");
    let api_keys = parse_api_keys(&or_default("SHOPDASH_API_KEYS", ""));

    let db_max_connections = parse_u32("SHOPDASH_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("SHOPDASH_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("SHOPDASH_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let page_limit = parse_u32("SHOPIFY_PAGE_LIMIT", "250")?;
    if page_limit == 0 || page_limit > MAX_PAGE_LIMIT {
        return Err(invalid(
            "SHOPIFY_PAGE_LIMIT",
            format!("must be between 1 and {MAX_PAGE_LIMIT}, got {page_limit}"),
        ));
    }

    let max_pages = parse_usize("SHOPIFY_MAX_PAGES", "200")?;
    if max_pages == 0 {
        return Err(invalid("SHOPIFY_MAX_PAGES", "must be at least 1".to_string()));
    }

    let shopify = ShopifySettings {
        api_version: or_default("SHOPIFY_API_VERSION", "2024-01"),
        request_timeout_secs: parse_u64("SHOPIFY_REQUEST_TIMEOUT_SECS", "30")?,
        user_agent: or_default("SHOPIFY_USER_AGENT", "shopdash/0.1 (ingest)"),
        page_limit,
        max_pages,
        inter_request_delay_ms: parse_u64("SHOPIFY_INTER_REQUEST_DELAY_MS", "0")?,
        max_retries: parse_u32("SHOPIFY_MAX_RETRIES", "0")?,
        retry_backoff_base_secs: parse_u64("SHOPIFY_RETRY_BACKOFF_BASE_SECS", "2")?,
    };

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        shopify_shop,
        shopify_access_token,
        api_keys,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        shopify,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SHOPDASH_ENV".to_string(),
            reason: format!("expected development, test, or production, got \"{other}\""),
        }),
    }
}

/// Comma-separated bearer tokens; blanks are dropped.
fn parse_api_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
