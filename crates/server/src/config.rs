//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `NEXUS_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `NEXUS_HOST` - Bind address (default: 127.0.0.1)
//! - `NEXUS_PORT` - Listen port (default: 5000)
//! - `NEXUS_BASE_URL` - Public URL, used for cookie security and recovery links
//!   (default: <http://localhost:5000>)
//! - `NEXUS_CORS_ORIGIN` - Allowed browser origin; any origin when unset
//! - `NEXUS_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use axum::http::HeaderValue;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, for local development.
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `pretty` or `json`, got `{other}`")),
        }
    }
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the application
    pub base_url: Url,
    /// Allowed CORS origin; `None` allows any origin
    pub cors_origin: Option<HeaderValue>,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error event sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

impl ServerConfig {
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

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = get_database_url(&env, "NEXUS_DATABASE_URL")?;

        let host = parse_env(&env, "NEXUS_HOST", "127.0.0.1")?;
        let port = parse_env(&env, "NEXUS_PORT", "5000")?;
        let base_url: Url = parse_env(&env, "NEXUS_BASE_URL", "http://localhost:5000")?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "NEXUS_BASE_URL".to_owned(),
                format!("unsupported scheme `{}`", base_url.scheme()),
            ));
        }

        let cors_origin = env("NEXUS_CORS_ORIGIN")
            .map(|origin| {
                HeaderValue::from_str(origin.trim_end_matches('/')).map_err(|e| {
                    ConfigError::InvalidEnvVar("NEXUS_CORS_ORIGIN".to_owned(), e.to_string())
                })
            })
            .transpose()?;

        let log_format = parse_env(&env, "NEXUS_LOG_FORMAT", "pretty")?;

        let sentry_sample_rate = parse_rate(&env, "SENTRY_SAMPLE_RATE", "1.0")?;
        let sentry_traces_sample_rate = parse_rate(&env, "SENTRY_TRACES_SAMPLE_RATE", "0.1")?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            cors_origin,
            log_format,
            sentry_dsn: env("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies must carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.scheme() == "https"
    }

    /// Absolute link to the password recovery page for `token`.
    #[must_use]
    pub fn recovery_link(&self, token: &str) -> String {
        let mut url = self.base_url.join("recovery").unwrap_or_else(|_| self.base_url.clone());
        url.query_pairs_mut().append_pair("token", token);
        url.into()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(
    env: &impl Fn(&str) -> Option<String>,
    primary_key: &str,
) -> Result<SecretString, ConfigError> {
    env(primary_key)
        .or_else(|| env("DATABASE_URL"))
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_owned()))
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env(key)
        .unwrap_or_else(|| default.to_owned())
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
}

/// Parse a sample rate in `0.0..=1.0`.
fn parse_rate(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<f32, ConfigError> {
    let rate: f32 = parse_env(env, key, default)?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_owned(),
            format!("{rate} is outside 0.0..=1.0"),
        ));
    }
    Ok(rate)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            ServerConfig::from_lookup(lookup(&[("NEXUS_DATABASE_URL", "postgres://db/nexus")]))
                .unwrap();

        assert_eq!(config.database_url.expose_secret(), "postgres://db/nexus");
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:5000");
        assert_eq!(config.base_url.as_str(), "http://localhost:5000/");
        assert!(config.cors_origin.is_none());
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.sentry_dsn.is_none());
        assert!(!config.is_secure());
    }

    #[test]
    fn test_database_url_fallback() {
        let config =
            ServerConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://fallback")])).unwrap();
        assert_eq!(config.database_url.expose_secret(), "postgres://fallback");
    }

    #[test]
    fn test_missing_database_url() {
        let err = ServerConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "NEXUS_DATABASE_URL"));
    }

    #[test]
    fn test_invalid_values() {
        let err = ServerConfig::from_lookup(lookup(&[
            ("NEXUS_DATABASE_URL", "postgres://db"),
            ("NEXUS_PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "NEXUS_PORT"));

        let err = ServerConfig::from_lookup(lookup(&[
            ("NEXUS_DATABASE_URL", "postgres://db"),
            ("NEXUS_BASE_URL", "ftp://example.com"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "NEXUS_BASE_URL"));

        let err = ServerConfig::from_lookup(lookup(&[
            ("NEXUS_DATABASE_URL", "postgres://db"),
            ("SENTRY_SAMPLE_RATE", "1.5"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "SENTRY_SAMPLE_RATE"));
    }

    #[test]
    fn test_https_base_url_is_secure() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("NEXUS_DATABASE_URL", "postgres://db"),
            ("NEXUS_BASE_URL", "https://nexus.example.com"),
            ("NEXUS_CORS_ORIGIN", "https://app.example.com/"),
            ("NEXUS_LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert!(config.is_secure());
        assert_eq!(
            config.cors_origin.unwrap(),
            HeaderValue::from_static("https://app.example.com")
        );
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_recovery_link() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("NEXUS_DATABASE_URL", "postgres://db"),
            ("NEXUS_BASE_URL", "https://nexus.example.com"),
        ]))
        .unwrap();

        assert_eq!(
            config.recovery_link("abc-123"),
            "https://nexus.example.com/recovery?token=abc-123"
        );
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = ServerConfig::from_lookup(lookup(&[(
            "NEXUS_DATABASE_URL",
            "postgres://user:hunter2@db/nexus",
        )]))
        .unwrap();

        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
