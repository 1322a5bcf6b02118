//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `WENSHOP_HOST` - Bind address (default: 127.0.0.1)
//! - `WENSHOP_PORT` - Listen port (default: 3000)
//! - `WENSHOP_BASE_URL` - Public URL for the storefront (default: http://localhost:3000)
//! - `WENSHOP_API_URL` - REST backend base URL (default: http://localhost:3001/api).
//!   `NEXT_PUBLIC_API_URL` is accepted as a fallback for existing deployments.
//! - `WENSHOP_API_TIMEOUT_SECS` - Per-request timeout for backend calls (default: 10)
//! - `WENSHOP_PRODUCT_CACHE_TTL_SECS` - Product cache lifetime (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_TRACES_SAMPLE_RATE` - Fraction of requests traced (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// REST backend configuration
    pub api: ApiConfig,
    /// Error tracking configuration
    pub sentry: SentryConfig,
}

/// REST backend client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to (no trailing slash).
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// How long product responses stay cached.
    pub product_cache_ttl: Duration,
}

/// Sentry configuration. Tracking is disabled when `dsn` is unset.
#[derive(Clone, Default)]
pub struct SentryConfig {
    pub dsn: Option<SecretString>,
    pub environment: Option<String>,
    pub traces_sample_rate: f32,
}

impl std::fmt::Debug for SentryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentryConfig")
            .field("dsn", &self.dsn.as_ref().map(|_| "[REDACTED]"))
            .field("environment", &self.environment)
            .field("traces_sample_rate", &self.traces_sample_rate)
            .finish()
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
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_var(&lookup, "WENSHOP_HOST", "127.0.0.1")?;
        let port = parse_var(&lookup, "WENSHOP_PORT", "3000")?;
        let base_url = lookup("WENSHOP_BASE_URL")
            .unwrap_or_else(|| "http://localhost:3000".to_string());

        let api_url = lookup("WENSHOP_API_URL")
            .or_else(|| lookup("NEXT_PUBLIC_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api = ApiConfig {
            base_url: parse_api_url(&api_url)?,
            timeout: Duration::from_secs(parse_var(&lookup, "WENSHOP_API_TIMEOUT_SECS", "10")?),
            product_cache_ttl: Duration::from_secs(parse_var(
                &lookup,
                "WENSHOP_PRODUCT_CACHE_TTL_SECS",
                "60",
            )?),
        };

        let sentry = SentryConfig {
            dsn: lookup("SENTRY_DSN")
                .filter(|dsn| !dsn.is_empty())
                .map(SecretString::from),
            environment: lookup("SENTRY_ENVIRONMENT"),
            traces_sample_rate: parse_var(&lookup, "SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        };

        Ok(Self {
            host,
            port,
            base_url,
            api,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS (controls secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ApiConfig {
    /// Configuration pointing at `base_url` with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_api_url(base_url)?,
            timeout: Duration::from_secs(10),
            product_cache_ttl: Duration::from_secs(60),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable, falling back to `default` when unset.
fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate the backend URL and strip any trailing slash so paths join cleanly.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidEnvVar("WENSHOP_API_URL".to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "WENSHOP_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
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
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.api.base_url.as_str(), "http://localhost:3001/api");
        assert_eq!(config.api.timeout, Duration::from_secs(10));
        assert!(config.sentry.dsn.is_none());
        assert!(!config.is_secure());
    }

    #[test]
    fn test_next_public_api_url_fallback() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[(
            "NEXT_PUBLIC_API_URL",
            "https://api.wenshop.com.br/api/",
        )]))
        .unwrap();
        assert_eq!(config.api.base_url.as_str(), "https://api.wenshop.com.br/api");
    }

    #[test]
    fn test_wenshop_api_url_wins() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            ("NEXT_PUBLIC_API_URL", "http://old:1/api"),
            ("WENSHOP_API_URL", "http://new:2/api"),
        ]))
        .unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://new:2/api");
    }

    #[test]
    fn test_invalid_port() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[("WENSHOP_PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "WENSHOP_PORT"));
    }

    #[test]
    fn test_api_url_rejects_other_schemes() {
        assert!(parse_api_url("ftp://files.example/api").is_err());
        assert!(parse_api_url("not a url").is_err());
    }

    #[test]
    fn test_secure_when_https() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[(
            "WENSHOP_BASE_URL",
            "https://wenshop.com.br",
        )]))
        .unwrap();
        assert!(config.is_secure());
    }

    #[test]
    fn test_sentry_debug_redacts_dsn() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[(
            "SENTRY_DSN",
            "https://publickey@o0.ingest.sentry.io/1",
        )]))
        .unwrap();

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("publickey"));
    }
}
