//! Application Context
//!
//! Owns the cache manager and every component built on it. Built once at
//! startup and shared by reference.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::cache::{CacheManager, CacheStats};
use crate::config::Config;
use crate::coordinator::ReadThrough;
use crate::error::Result;
use crate::storage::FsStorage;
use crate::webmaster::{WebMaster, WebmasterConfig, POOL_NAME};

/// Everything built from configuration: the named pools and the page service.
#[derive(Debug)]
pub struct AppContext {
    caches: CacheManager,
    webmaster: WebMaster,
}

impl AppContext {
    /// Wires the page cache from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let caches = CacheManager::new();
        let pool = caches.get_pool::<String, String>(POOL_NAME)?;
        let storage = FsStorage::new(&config.storage_root);
        let pages = ReadThrough::new(pool, storage, config.cache_policy());

        let webmaster = WebMaster::new(
            WebmasterConfig {
                homepage: config.homepage.clone(),
                format: config.homepage_format.clone(),
            },
            Arc::new(pages),
        );

        info!(
            root = %config.storage_root.display(),
            homepage = ?config.homepage,
            "Page cache ready"
        );
        Ok(Self { caches, webmaster })
    }

    /// Returns the named pool provider.
    pub fn caches(&self) -> &CacheManager {
        &self.caches
    }

    /// Returns the page service.
    pub fn webmaster(&self) -> &WebMaster {
        &self.webmaster
    }

    /// Returns the page cache counters.
    pub fn page_stats(&self) -> CacheStats {
        self.webmaster.pages().stats()
    }

    // == Purge ==
    /// Drops deprecated holders from every pool and records the evictions.
    pub fn purge(&self, now: Instant) -> Result<usize> {
        let removed = self.caches.purge(now)?;
        self.webmaster.pages().record_evictions(removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_context_shares_named_pool() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.md"), "home").unwrap();
        let config = Config {
            storage_root: dir.path().to_path_buf(),
            homepage: Some("index.md".to_string()),
            ..Config::default()
        };
        let context = AppContext::from_config(&config).unwrap();

        context.webmaster().load_homepage().await.unwrap();

        let pool = context
            .caches()
            .get_pool::<String, String>(POOL_NAME)
            .unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(context.caches().pool_names(), vec![POOL_NAME.to_string()]);
    }

    #[tokio::test]
    async fn test_purge_records_evictions() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            storage_root: dir.path().to_path_buf(),
            cache_expires: 10,
            ..Config::default()
        };
        let context = AppContext::from_config(&config).unwrap();
        let start = Instant::now();

        context.webmaster().load_page("nothing.md").await.unwrap();
        assert_eq!(context.purge(start).unwrap(), 0);
        assert_eq!(context.purge(start + Duration::from_secs(60)).unwrap(), 1);

        let stats = context.page_stats();
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.total_entries, 0);
    }
}
