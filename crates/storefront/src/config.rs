//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CATALOG_API_URL` - Remote catalog collection URL
//!   (default: the public demo collection)
//! - `CATALOG_TIMEOUT_SECS` - Per-request timeout for the catalog client (default: 10)
//! - `TECHSTORE_DATA_DIR` - Directory holding the persisted cart and session (default: `.techstore`)
//! - `AUTH_LOGIN_DELAY_MS` - Simulated login latency (default: 800)
//! - `AUTH_REGISTER_DELAY_MS` - Simulated registration latency (default: 1000)
//! - `AUTH_TIMEOUT_SECS` - Upper bound for a login or registration (default: 5)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_API_URL: &str = "https://687f2671efe65e520088877b.mockapi.io/productos";
const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DATA_DIR: &str = ".techstore";
const DEFAULT_LOGIN_DELAY_MS: u64 = 800;
const DEFAULT_REGISTER_DELAY_MS: u64 = 1000;
const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 5;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Remote catalog client settings
    pub catalog: CatalogConfig,
    /// Simulated authentication settings
    pub auth: AuthConfig,
    /// Directory backing persisted storage
    pub data_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "development")
    pub sentry_environment: Option<String>,
}

/// Remote catalog client configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Collection resource URL; item URLs are `{base_url}/{id}`
    pub base_url: Url,
    /// Request timeout
    pub timeout: Duration,
}

/// Simulated authentication timings.
#[derive(Debug, Clone, Copy)]
pub struct AuthConfig {
    pub login_delay: Duration,
    pub register_delay: Duration,
    /// A login or registration taking longer than this fails
    pub timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_delay: Duration::from_millis(DEFAULT_LOGIN_DELAY_MS),
            register_delay: Duration::from_millis(DEFAULT_REGISTER_DELAY_MS),
            timeout: Duration::from_secs(DEFAULT_AUTH_TIMEOUT_SECS),
        }
    }
}

impl AuthConfig {
    /// No simulated latency. Used by tests and scripted runs.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            login_delay: Duration::ZERO,
            register_delay: Duration::ZERO,
            timeout: Duration::from_secs(DEFAULT_AUTH_TIMEOUT_SECS),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = parse_catalog_url(
            &lookup("CATALOG_API_URL").unwrap_or_else(|| DEFAULT_CATALOG_API_URL.to_string()),
        )?;
        let timeout = Duration::from_secs(parse_or_default(
            &lookup,
            "CATALOG_TIMEOUT_SECS",
            DEFAULT_CATALOG_TIMEOUT_SECS,
        )?);

        let auth = AuthConfig {
            login_delay: Duration::from_millis(parse_or_default(
                &lookup,
                "AUTH_LOGIN_DELAY_MS",
                DEFAULT_LOGIN_DELAY_MS,
            )?),
            register_delay: Duration::from_millis(parse_or_default(
                &lookup,
                "AUTH_REGISTER_DELAY_MS",
                DEFAULT_REGISTER_DELAY_MS,
            )?),
            timeout: Duration::from_secs(parse_or_default(
                &lookup,
                "AUTH_TIMEOUT_SECS",
                DEFAULT_AUTH_TIMEOUT_SECS,
            )?),
        };

        let data_dir = PathBuf::from(
            lookup("TECHSTORE_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
        );

        Ok(Self {
            catalog: CatalogConfig { base_url, timeout },
            auth,
            data_dir,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse the collection URL. Only http(s) is accepted.
fn parse_catalog_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim_end_matches('/')).map_err(|e| {
        ConfigError::InvalidEnvVar("CATALOG_API_URL".to_string(), e.to_string())
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "CATALOG_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
}

/// Parse a numeric variable, falling back to a default when unset.
fn parse_or_default<F>(lookup: &F, key: &str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.catalog.base_url.as_str(), DEFAULT_CATALOG_API_URL);
        assert_eq!(config.catalog.timeout, Duration::from_secs(10));
        assert_eq!(config.auth.login_delay, Duration::from_millis(800));
        assert_eq!(config.auth.register_delay, Duration::from_millis(1000));
        assert_eq!(config.data_dir, PathBuf::from(".techstore"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            ("CATALOG_API_URL", "http://127.0.0.1:4010/items/"),
            ("CATALOG_TIMEOUT_SECS", "3"),
            ("AUTH_LOGIN_DELAY_MS", "0"),
            ("TECHSTORE_DATA_DIR", "/tmp/store"),
            ("SENTRY_DSN", ""),
        ]))
        .unwrap();

        assert_eq!(
            config.catalog.base_url.as_str(),
            "http://127.0.0.1:4010/items"
        );
        assert_eq!(config.catalog.timeout, Duration::from_secs(3));
        assert_eq!(config.auth.login_delay, Duration::ZERO);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/store"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_number() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[("AUTH_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "AUTH_TIMEOUT_SECS"));
    }

    #[test]
    fn test_invalid_url() {
        assert!(parse_catalog_url("not a url").is_err());
        assert!(parse_catalog_url("ftp://example.com/items").is_err());
        assert!(parse_catalog_url("https://example.com/items").is_ok());
    }

    #[test]
    fn test_instant_auth_config() {
        let auth = AuthConfig::instant();
        assert_eq!(auth.login_delay, Duration::ZERO);
        assert_eq!(auth.register_delay, Duration::ZERO);
    }
}
