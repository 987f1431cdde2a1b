//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the site
//!
//! ## Hosting environment
//! - `APP_ID` - Application namespace (default: `default-app-id`)
//! - `FIREBASE_CONFIG` - Backend connection JSON (`apiKey`, `projectId`, ...)
//! - `INITIAL_AUTH_TOKEN` - Pre-issued custom auth token
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `FIREBASE_AUTH_URL` - Identity Toolkit base URL
//! - `FIREBASE_TOKEN_URL` - Secure Token base URL
//! - `FIRESTORE_URL` - Firestore REST base URL
//! - `GEMINI_API_KEY` - Generative Language API key (default: empty)
//! - `GEMINI_MODEL` - Model name (default: gemini-2.0-flash)
//! - `GEMINI_BASE_URL` - Generative Language base URL
//! - `TESTIMONIALS_POLL_SECS` - Testimonial listener refresh interval (default: 5)
//! - `CATEGORY_SWITCH_DELAY_MS` - Category switch spinner delay (default: 500)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)
//!
//! `FIREBASE_CONFIG` is kept as raw text here. It is parsed during identity
//! bootstrap, where a malformed value is logged and degrades to a local
//! identity instead of stopping the server.

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_AUTH_URL: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_TOKEN_URL: &str = "https://securetoken.googleapis.com";
const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com";
const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
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
    /// Public base URL for the site
    pub base_url: String,
    /// Hosted backend (auth + document store) settings
    pub backend: BackendConfig,
    /// Generative Language API settings
    pub gemini: GeminiConfig,
    /// How often the testimonial listener refreshes its snapshot
    pub testimonials_poll_interval: Duration,
    /// Delay applied before a category switch is committed
    pub category_switch_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Hosted backend configuration, supplied by the hosting environment.
///
/// Implements `Debug` manually to redact the auth token.
#[derive(Clone)]
pub struct BackendConfig {
    /// Application namespace identifier (`APP_ID`)
    pub app_id: Option<String>,
    /// Raw backend connection JSON (`FIREBASE_CONFIG`)
    pub firebase_config: Option<String>,
    /// Pre-issued custom auth token
    pub initial_auth_token: Option<SecretString>,
    /// Service endpoints
    pub endpoints: BackendEndpoints,
}

/// Base URLs of the hosted backend services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendEndpoints {
    pub auth_url: String,
    pub token_url: String,
    pub firestore_url: String,
}

impl Default for BackendEndpoints {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            firestore_url: DEFAULT_FIRESTORE_URL.to_string(),
        }
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("app_id", &self.app_id)
            .field("firebase_config", &self.firebase_config)
            .field(
                "initial_auth_token",
                &self.initial_auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

/// Generative Language API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key; may be empty when the hosting environment injects it
    pub api_key: SecretString,
    /// Model name (e.g., gemini-2.0-flash)
    pub model: String,
    /// API base URL
    pub base_url: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
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
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("STOREFRONT_PORT", "3000")?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;

        let backend = BackendConfig::from_env();
        let gemini = GeminiConfig::from_env();

        let poll_secs = parse_env_or_default::<u64>("TESTIMONIALS_POLL_SECS", "5")?;
        if poll_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "TESTIMONIALS_POLL_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let delay_ms = parse_env_or_default::<u64>("CATEGORY_SWITCH_DELAY_MS", "500")?;

        Ok(Self {
            host,
            port,
            base_url,
            backend,
            gemini,
            testimonials_poll_interval: Duration::from_secs(poll_secs),
            category_switch_delay: Duration::from_millis(delay_ms),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or_default("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl BackendConfig {
    fn from_env() -> Self {
        Self {
            app_id: get_optional_env("APP_ID"),
            firebase_config: get_optional_env("FIREBASE_CONFIG"),
            initial_auth_token: get_optional_env("INITIAL_AUTH_TOKEN").map(SecretString::from),
            endpoints: BackendEndpoints {
                auth_url: get_env_or_default("FIREBASE_AUTH_URL", DEFAULT_AUTH_URL),
                token_url: get_env_or_default("FIREBASE_TOKEN_URL", DEFAULT_TOKEN_URL),
                firestore_url: get_env_or_default("FIRESTORE_URL", DEFAULT_FIRESTORE_URL),
            },
        }
    }
}

impl GeminiConfig {
    fn from_env() -> Self {
        Self {
            api_key: SecretString::from(get_env_or_default("GEMINI_API_KEY", "")),
            model: get_env_or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            base_url: get_env_or_default("GEMINI_BASE_URL", DEFAULT_GEMINI_URL),
        }
    }

    /// Configuration pointing at a custom endpoint (emulators and tests).
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(String::new()),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: base_url.into(),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            backend: BackendConfig {
                app_id: Some("canvas-app".to_string()),
                firebase_config: None,
                initial_auth_token: Some(SecretString::from("super_secret_custom_token")),
                endpoints: BackendEndpoints::default(),
            },
            gemini: GeminiConfig {
                api_key: SecretString::from("super_secret_gemini_key"),
                model: DEFAULT_GEMINI_MODEL.to_string(),
                base_url: DEFAULT_GEMINI_URL.to_string(),
            },
            testimonials_poll_interval: Duration::from_secs(5),
            category_switch_delay: Duration::from_millis(500),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure() {
        let mut config = config();
        assert!(!config.is_secure());
        config.base_url = "https://dichvu.example".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug_output = format!("{:?}", config());

        assert!(debug_output.contains("canvas-app"));
        assert!(debug_output.contains("gemini-2.0-flash"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_custom_token"));
        assert!(!debug_output.contains("super_secret_gemini_key"));
    }

    #[test]
    fn test_parse_value_reports_variable() {
        let err = parse_value::<u16>("STOREFRONT_PORT", "not-a-port").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_PORT"));
        assert_eq!(parse_value::<u64>("X", " 42 ").unwrap(), 42);
    }

    #[test]
    fn test_default_endpoints() {
        let endpoints = BackendEndpoints::default();
        assert_eq!(endpoints.firestore_url, DEFAULT_FIRESTORE_URL);
        assert_eq!(endpoints.auth_url, DEFAULT_AUTH_URL);
    }
}
