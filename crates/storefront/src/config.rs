//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `MOSSO_HOST` - Bind address (default: 127.0.0.1)
//! - `MOSSO_PORT` - Listen port (default: 3000)
//! - `MOSSO_DATA_DIR` - Directory holding `local-storage.json` (default: data)
//! - `MOSSO_CATALOG_PATH` - Product catalog JSON file (default: built-in catalog)
//! - `MOSSO_STORAGE_POLL_MS` - Interval for detecting writes from other
//!   processes, 0 disables (default: 500)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default interval between storage polls.
pub const DEFAULT_STORAGE_POLL_MS: u64 = 500;

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
    /// Directory holding the persisted storage area
    pub data_dir: PathBuf,
    /// Catalog file; `None` uses the built-in catalog
    pub catalog_path: Option<PathBuf>,
    /// Storage poll interval; `None` disables the watcher
    pub storage_poll_interval: Option<Duration>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            data_dir: PathBuf::from("data"),
            catalog_path: None,
            storage_poll_interval: Some(Duration::from_millis(DEFAULT_STORAGE_POLL_MS)),
            sentry_dsn: None,
            sentry_environment: None,
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
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = get_env_or_default(&lookup, "MOSSO_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("MOSSO_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default(&lookup, "MOSSO_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("MOSSO_PORT".to_string(), e.to_string()))?;
        let data_dir = PathBuf::from(get_env_or_default(&lookup, "MOSSO_DATA_DIR", "data"));
        let catalog_path = get_optional_env(&lookup, "MOSSO_CATALOG_PATH").map(PathBuf::from);

        let poll_ms = get_env_or_default(
            &lookup,
            "MOSSO_STORAGE_POLL_MS",
            &DEFAULT_STORAGE_POLL_MS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("MOSSO_STORAGE_POLL_MS".to_string(), e.to_string())
        })?;
        let storage_poll_interval = (poll_ms > 0).then(|| Duration::from_millis(poll_ms));

        Ok(Self {
            host,
            port,
            data_dir,
            catalog_path,
            storage_poll_interval,
            sentry_dsn: get_optional_env(&lookup, "SENTRY_DSN"),
            sentry_environment: get_optional_env(&lookup, "SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> String {
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(config.catalog_path.is_none());
        assert_eq!(config.storage_poll_interval, Some(Duration::from_millis(500)));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("MOSSO_HOST", "0.0.0.0"),
            ("MOSSO_PORT", "8080"),
            ("MOSSO_DATA_DIR", "/var/lib/mosso"),
            ("MOSSO_CATALOG_PATH", "/etc/mosso/catalog.json"),
            ("MOSSO_STORAGE_POLL_MS", "250"),
            ("SENTRY_ENVIRONMENT", "staging"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/mosso"));
        assert_eq!(
            config.catalog_path,
            Some(PathBuf::from("/etc/mosso/catalog.json"))
        );
        assert_eq!(config.storage_poll_interval, Some(Duration::from_millis(250)));
        assert_eq!(config.sentry_environment.as_deref(), Some("staging"));
    }

    #[test]
    fn test_zero_poll_disables_watcher() {
        let config = config_from(&[("MOSSO_STORAGE_POLL_MS", "0")]).unwrap();
        assert!(config.storage_poll_interval.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("MOSSO_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "MOSSO_PORT"));
    }

    #[test]
    fn test_empty_sentry_dsn_is_unset() {
        let config = config_from(&[("SENTRY_DSN", "")]).unwrap();
        assert!(config.sentry_dsn.is_none());
    }
}
