//! Engine configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Hard ceiling for a resolved-rounds page.
const RESOLVED_ROUNDS_LIMIT_CAP: u32 = 200;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be {expected} (got {value:?})")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    /// Remote character/skill service; in-memory catalog when unset
    pub catalog_url: Option<String>,
    pub catalog_timeout: Duration,
    /// JSON seed for the in-memory catalog
    pub catalog_seed_path: Option<PathBuf>,
    /// Largest page `list_resolved` will return
    pub resolved_rounds_limit: u32,
    pub notification_capacity: usize,
    /// Comma-separated origins, or `*`; no CORS layer when unset
    pub cors_allowed_origins: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            catalog_url: None,
            catalog_timeout: Duration::from_millis(5000),
            catalog_seed_path: None,
            resolved_rounds_limit: 20,
            notification_capacity: 256,
            cors_allowed_origins: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let server_port = match get("SERVER_PORT") {
            Some(raw) => parse(&raw, "SERVER_PORT", "a port number")?,
            None => defaults.server_port,
        };
        let timeout_ms: u64 = match get("CATALOG_TIMEOUT_MS") {
            Some(raw) => parse(&raw, "CATALOG_TIMEOUT_MS", "a positive number of milliseconds")?,
            None => defaults.catalog_timeout.as_millis() as u64,
        };
        if timeout_ms == 0 {
            return Err(invalid("CATALOG_TIMEOUT_MS", "a positive number of milliseconds", "0"));
        }
        let resolved_rounds_limit: u32 = match get("RESOLVED_ROUNDS_LIMIT") {
            Some(raw) => parse(&raw, "RESOLVED_ROUNDS_LIMIT", "between 1 and 200")?,
            None => defaults.resolved_rounds_limit,
        };
        if !(1..=RESOLVED_ROUNDS_LIMIT_CAP).contains(&resolved_rounds_limit) {
            return Err(invalid(
                "RESOLVED_ROUNDS_LIMIT",
                "between 1 and 200",
                resolved_rounds_limit.to_string(),
            ));
        }
        let notification_capacity: usize = match get("NOTIFICATION_CAPACITY") {
            Some(raw) => parse(&raw, "NOTIFICATION_CAPACITY", "a positive number")?,
            None => defaults.notification_capacity,
        };
        if notification_capacity == 0 {
            return Err(invalid("NOTIFICATION_CAPACITY", "a positive number", "0"));
        }

        Ok(Self {
            server_host: get("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port,
            catalog_url: get("CATALOG_URL"),
            catalog_timeout: Duration::from_millis(timeout_ms),
            catalog_seed_path: get("CATALOG_SEED_PATH").map(PathBuf::from),
            resolved_rounds_limit,
            notification_capacity,
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS"),
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.server_host, self.server_port);
        raw.parse()
            .map_err(|_| invalid("SERVER_HOST", "an IP address", self.server_host.clone()))
    }
}

fn invalid(key: &'static str, expected: &'static str, value: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        expected,
        value: value.into(),
    }
}

fn parse<T: std::str::FromStr>(
    raw: &str,
    key: &'static str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| invalid(key, expected, raw))
}
