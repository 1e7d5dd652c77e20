//! Webmaster Module
//!
//! Serves the configured homepage and other pages through the read-through
//! page cache.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::coordinator::{CachePolicy, ReadThrough};
use crate::error::Result;
use crate::storage::{FsStorage, Storage};

/// Name of the pool holding page texts (path => text).
pub const POOL_NAME: &str = "web_pages";

/// Default lifespan of a cached page.
pub const MEM_CACHE_EXPIRES: Duration = Duration::from_secs(600);

/// Default refresh window of an expired page.
pub const MEM_CACHE_REFRESH: Duration = Duration::from_secs(32);

/// Default policy for the page cache.
pub fn default_policy() -> CachePolicy {
    CachePolicy {
        life_span: MEM_CACHE_EXPIRES,
        refresh: MEM_CACHE_REFRESH,
    }
}

/// Homepage settings, read on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebmasterConfig {
    /// Homepage path below the storage root
    pub homepage: Option<String>,
    /// Format tag of the homepage
    pub format: Option<String>,
}

// == Web Master ==
/// Page service: the configured homepage plus arbitrary pages, all read
/// through the `web_pages` pool.
#[derive(Debug)]
pub struct WebMaster<S: Storage = FsStorage> {
    config: WebmasterConfig,
    pages: Arc<ReadThrough<S>>,
}

impl<S> WebMaster<S>
where
    S: Storage<Key = String, Value = String>,
{
    /// Creates a page service over an existing coordinator.
    pub fn new(config: WebmasterConfig, pages: Arc<ReadThrough<S>>) -> Self {
        Self { config, pages }
    }

    /// Returns the configured homepage path, if any.
    pub fn homepage(&self) -> Option<&str> {
        self.config.homepage.as_deref()
    }

    /// Returns the configured homepage format tag, if any.
    pub fn format(&self) -> Option<&str> {
        self.config.format.as_deref()
    }

    /// Returns the page cache coordinator.
    pub fn pages(&self) -> &Arc<ReadThrough<S>> {
        &self.pages
    }

    // == Load Homepage ==
    /// Loads the homepage text, `None` when no homepage is configured or
    /// the file does not exist.
    pub async fn load_homepage(&self) -> Result<Option<String>> {
        match self.homepage() {
            None => {
                debug!("No homepage configured");
                Ok(None)
            }
            Some(path) => self.load_page(path).await,
        }
    }

    /// Loads any page below the storage root through the cache.
    pub async fn load_page(&self, path: &str) -> Result<Option<String>> {
        self.pages.lookup(&path.to_string()).await
    }

    /// Drops a page from the cache, returning whether it was cached.
    pub async fn invalidate(&self, path: &str) -> Result<bool> {
        self.pages.invalidate(&path.to_string()).await
    }
}
