//! Response DTOs for the page cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for page reads (GET /homepage, GET /pages/*path)
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    /// Page path below the storage root
    pub path: String,
    /// Format tag, only set for the homepage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Page text
    pub content: String,
}

impl PageResponse {
    /// Creates a new PageResponse
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            format: None,
            content: content.into(),
        }
    }

    /// Attaches a format tag
    pub fn with_format(mut self, format: Option<&str>) -> Self {
        self.format = format.map(str::to_string);
        self
    }
}

/// Response body for invalidation (DELETE /pages/*path)
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Human readable outcome
    pub message: String,
    /// The invalidated path
    pub path: String,
    /// Whether the path was cached before
    pub was_cached: bool,
}

impl InvalidateResponse {
    /// Creates a new InvalidateResponse
    pub fn new(path: impl Into<String>, was_cached: bool) -> Self {
        let path = path.into();
        let message = if was_cached {
            format!("Page '{}' invalidated", path)
        } else {
            format!("Page '{}' was not cached", path)
        };
        Self {
            message,
            path,
            was_cached,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Page cache counters
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate ((hits + negative_hits) / lookups)
    pub hit_rate: f64,
    /// Holder count per named pool
    pub pools: Vec<PoolSize>,
}

/// Holder count of one named pool
#[derive(Debug, Clone, Serialize)]
pub struct PoolSize {
    pub name: String,
    pub entries: usize,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: CacheStats, pools: Vec<(String, usize)>) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
            pools: pools
                .into_iter()
                .map(|(name, entries)| PoolSize { name, entries })
                .collect(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
