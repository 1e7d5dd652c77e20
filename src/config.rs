//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::coordinator::CachePolicy;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory pages are read from
    pub storage_root: PathBuf,
    /// Homepage path relative to `storage_root`, if any
    pub homepage: Option<String>,
    /// Format tag of the homepage (e.g. "markdown")
    pub homepage_format: Option<String>,
    /// Seconds a resolved page stays fresh in memory
    pub cache_expires: u64,
    /// Seconds an expired page is renewed for while it is reloaded
    pub cache_refresh: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background purge task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `STORAGE_ROOT` - Page directory (default: ./data)
    /// - `HOMEPAGE_PATH` - Homepage path below the root (default: unset)
    /// - `HOMEPAGE_FORMAT` - Homepage format tag (default: unset)
    /// - `CACHE_EXPIRES` - Page lifespan in seconds (default: 600)
    /// - `CACHE_REFRESH` - Refresh window in seconds (default: 32)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Purge frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            storage_root: env::var("STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_root),
            homepage: non_empty_var("HOMEPAGE_PATH"),
            homepage_format: non_empty_var("HOMEPAGE_FORMAT"),
            cache_expires: parsed_var("CACHE_EXPIRES").unwrap_or(defaults.cache_expires),
            cache_refresh: parsed_var("CACHE_REFRESH").unwrap_or(defaults.cache_refresh),
            server_port: parsed_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parsed_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
        }
    }

    /// Returns the cache lifespans as a coordinator policy.
    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            life_span: Duration::from_secs(self.cache_expires),
            refresh: Duration::from_secs(self.cache_refresh),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("./data"),
            homepage: None,
            homepage_format: None,
            cache_expires: 600,
            cache_refresh: 32,
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
