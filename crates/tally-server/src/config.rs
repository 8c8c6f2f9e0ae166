use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the calculation service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// Storage backend kind: `"memory"` or `"file"`.
    pub storage_backend: String,
    /// Record file path, used by the file backend only.
    pub storage_path: PathBuf,
    /// Per-request timeout applied to every route.
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".parse().unwrap(),
            storage_backend: "memory".to_string(),
            storage_path: PathBuf::from("./storage.txt"),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ServerConfig {
    /// Build the configuration from environment variables, falling back to
    /// the defaults for anything unset, empty, or unparseable.
    ///
    /// Recognized variables: `TALLY_PORT`, `TALLY_STORAGE`,
    /// `TALLY_STORAGE_PATH`, `TALLY_REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let port = env_parse_or("TALLY_PORT", defaults.bind_addr.port());
        Self {
            bind_addr: SocketAddr::new(defaults.bind_addr.ip(), port),
            storage_backend: env_or("TALLY_STORAGE", &defaults.storage_backend),
            storage_path: PathBuf::from(env_or(
                "TALLY_STORAGE_PATH",
                &defaults.storage_path.to_string_lossy(),
            )),
            request_timeout: Duration::from_secs(env_parse_or(
                "TALLY_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
        }
    }
}

/// Logging configuration, consumed by the binary's subscriber setup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level filter (`error` | `warn` | `info` | `debug` | `trace`).
    pub level: String,
    /// Output format: `"text"` or `"json"`.
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl LogConfig {
    /// Build from `TALLY_LOG_LEVEL` / `TALLY_LOG_FORMAT`, defaulting
    /// anything unset or empty.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            level: env_or("TALLY_LOG_LEVEL", &defaults.level),
            format: env_or("TALLY_LOG_FORMAT", &defaults.format),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
