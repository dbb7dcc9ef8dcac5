//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 5000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: `http://localhost:{port}`)
//! - `STOREFRONT_DATA_DIR` - Directory holding one cart blob per session (default: data/carts)
//! - `STOREFRONT_CATALOG_PATH` - JSON product list replacing the built-in catalog
//! - `RASA_SERVER_URL` - Base URL of the Rasa server (default: `http://localhost:5005`)
//! - `RASA_TIMEOUT_SECS` - Timeout for chat relay requests (default: 30)
//! - `CORS_ORIGINS` - Comma-separated allowed origins, or `*` (default: `*`)
//! - `LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

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
    /// Directory for persisted carts
    pub data_dir: PathBuf,
    /// Optional catalog file; the built-in catalog is used when unset
    pub catalog_path: Option<PathBuf>,
    /// Rasa bot service configuration
    pub rasa: RasaConfig,
    /// Allowed CORS origins
    pub cors: CorsOrigins,
    /// Emit logs as JSON
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Rasa bot service configuration.
#[derive(Debug, Clone)]
pub struct RasaConfig {
    /// Base URL of the Rasa server (e.g., `http://localhost:5005`)
    pub server_url: Url,
    /// Timeout for webhook requests
    pub timeout: Duration,
}

/// Origins allowed to call the JSON API from a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_optional_env("STOREFRONT_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"));
        let data_dir = PathBuf::from(get_env_or_default("STOREFRONT_DATA_DIR", "data/carts"));
        let catalog_path = get_optional_env("STOREFRONT_CATALOG_PATH").map(PathBuf::from);

        let rasa = RasaConfig::from_env()?;
        let cors = parse_cors_origins(&get_env_or_default("CORS_ORIGINS", "*"));
        let json_logs = parse_log_format(&get_env_or_default("LOG_FORMAT", "text"))?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            base_url,
            data_dir,
            catalog_path,
            rasa,
            cors,
            json_logs,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl RasaConfig {
    /// Default Rasa server URL.
    pub const DEFAULT_URL: &'static str = "http://localhost:5005";

    /// Default webhook timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_env_or_default("RASA_SERVER_URL", Self::DEFAULT_URL);
        let server_url = parse_base_url(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar("RASA_SERVER_URL".to_string(), e))?;

        let timeout_secs = get_env_or_default(
            "RASA_TIMEOUT_SECS",
            &Self::DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "RASA_TIMEOUT_SECS".to_string(),
                "must be a positive integer".to_string(),
            )
        })?;

        Ok(Self {
            server_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an HTTP(S) base URL.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{other}'")),
    }
}

/// Parse the `CORS_ORIGINS` list.
fn parse_cors_origins(raw: &str) -> CorsOrigins {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        CorsOrigins::Any
    } else {
        CorsOrigins::List(origins)
    }
}

/// Parse `LOG_FORMAT`; returns true for JSON.
fn parse_log_format(raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "text" => Ok(false),
        "json" => Ok(true),
        other => Err(ConfigError::InvalidEnvVar(
            "LOG_FORMAT".to_string(),
            format!("expected 'text' or 'json', got '{other}'"),
        )),
    }
}
