//! Cache Manager Module
//!
//! Provider of named cache pools. Call sites asking for the same name share
//! one pool instance.

use std::any::Any;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use tracing::debug;

use crate::cache::CachePool;
use crate::error::{CacheError, Result};

/// Type-erased view of a pool, enough for bulk maintenance.
trait ManagedPool: Send + Sync {
    fn purge(&self, now: Instant) -> Result<usize>;

    fn size(&self) -> usize;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<K, V> ManagedPool for CachePool<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn purge(&self, now: Instant) -> Result<usize> {
        CachePool::purge(self, now)
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

// == Cache Manager ==
/// Owns every named pool of the process.
#[derive(Default)]
pub struct CacheManager {
    pools: RwLock<HashMap<String, Arc<dyn ManagedPool>>>,
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("pools", &self.pool_names())
            .finish()
    }
}

impl CacheManager {
    // == Constructor ==
    /// Creates a manager with no pools.
    pub fn new() -> Self {
        Self::default()
    }

    // == Get Pool ==
    /// Returns the pool registered under `name`, creating it on first use.
    ///
    /// Fails with [`CacheError::PoolTypeMismatch`] when the name is already
    /// taken by a pool of different key/value types.
    pub fn get_pool<K, V>(&self, name: &str) -> Result<Arc<CachePool<K, V>>>
    where
        K: Eq + Hash + Clone + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        let mut pools = self
            .pools
            .write()
            .map_err(|_| CacheError::poisoned("cache manager"))?;

        if let Some(existing) = pools.get(name) {
            return Arc::clone(existing)
                .into_any()
                .downcast::<CachePool<K, V>>()
                .map_err(|_| CacheError::PoolTypeMismatch(name.to_string()));
        }

        debug!(pool = name, "Creating cache pool");
        let pool = Arc::new(CachePool::<K, V>::new(name));
        pools.insert(name.to_string(), pool.clone());
        Ok(pool)
    }

    // == Purge ==
    /// Purges deprecated holders from every pool, returning the total removed.
    pub fn purge(&self, now: Instant) -> Result<usize> {
        let pools: Vec<Arc<dyn ManagedPool>> = self
            .pools
            .read()
            .map_err(|_| CacheError::poisoned("cache manager"))?
            .values()
            .cloned()
            .collect();

        let mut removed = 0;
        for pool in pools {
            removed += pool.purge(now)?;
        }
        Ok(removed)
    }

    /// Returns the registered pool names, sorted.
    pub fn pool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .pools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Returns `(name, holder count)` for every pool, sorted by name.
    pub fn pool_sizes(&self) -> Vec<(String, usize)> {
        let mut sizes: Vec<(String, usize)> = self
            .pools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, pool)| (name.clone(), pool.size()))
            .collect();
        sizes.sort();
        sizes
    }
}
