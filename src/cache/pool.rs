//! Cache Pool Module
//!
//! Keyed in-memory store of cache holders with time-based freshness.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use crate::cache::CacheHolder;
use crate::error::{CacheError, Result};

/// Snapshot returned by [`CachePool::fetch`].
pub type Fetched<V> = (Option<V>, Option<Arc<CacheHolder<V>>>);

// == Cache Pool ==
/// In-memory store mapping keys to holders.
///
/// The value is only exposed while its holder is alive; an expired holder is
/// still returned so callers can renew it before refreshing.
#[derive(Debug)]
pub struct CachePool<K, V> {
    /// Pool name, as registered with the manager
    name: String,
    /// Key to holder storage
    holders: RwLock<HashMap<K, Arc<CacheHolder<V>>>>,
}

impl<K, V> CachePool<K, V> {
    // == Constructor ==
    /// Creates an empty pool.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            holders: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the pool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // == Length ==
    /// Returns the number of holders in the pool.
    ///
    /// Still counts after the lock was poisoned; the map itself is never left
    /// half-written.
    pub fn len(&self) -> usize {
        self.holders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    // == Is Empty ==
    /// Returns true if the pool holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> CachePool<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Fetch ==
    /// Returns the value (only while alive) and the holder for `key`.
    ///
    /// - `(Some(v), Some(h))`: fresh hit
    /// - `(None, Some(h))` with `h.is_alive(now)`: fresh negative result
    /// - `(None, Some(h))` with an expired `h`: stale, due for refresh
    /// - `(None, None)`: never resolved
    pub fn fetch(&self, key: &K, now: Instant) -> Result<Fetched<V>> {
        let holders = self
            .holders
            .read()
            .map_err(|_| CacheError::poisoned(&self.name))?;

        Ok(match holders.get(key) {
            None => (None, None),
            Some(holder) if holder.is_alive(now) => (holder.value().cloned(), Some(holder.clone())),
            Some(holder) => (None, Some(holder.clone())),
        })
    }

    // == Update ==
    /// Stores `value` (possibly `None`) under `key` with a fresh holder that
    /// expires at `now + life_span`.
    pub fn update(&self, key: K, value: Option<V>, life_span: Duration, now: Instant) -> Result<()> {
        let holder = Arc::new(CacheHolder::new(value, life_span, now));
        let mut holders = self
            .holders
            .write()
            .map_err(|_| CacheError::poisoned(&self.name))?;
        holders.insert(key, holder);
        Ok(())
    }

    // == Erase ==
    /// Removes `key`, returning its value if the holder was still alive.
    pub fn erase(&self, key: &K, now: Instant) -> Result<Option<V>> {
        let mut holders = self
            .holders
            .write()
            .map_err(|_| CacheError::poisoned(&self.name))?;

        Ok(holders
            .remove(key)
            .filter(|holder| holder.is_alive(now))
            .and_then(|holder| holder.value().cloned()))
    }

    // == Purge ==
    /// Drops every deprecated holder, returning how many were removed.
    pub fn purge(&self, now: Instant) -> Result<usize> {
        let mut holders = self
            .holders
            .write()
            .map_err(|_| CacheError::poisoned(&self.name))?;

        let before = holders.len();
        holders.retain(|_, holder| !holder.is_deprecated(now));
        Ok(before - holders.len())
    }

    // == Keys ==
    /// Returns all keys currently held, including expired ones.
    pub fn keys(&self) -> Result<Vec<K>> {
        let holders = self
            .holders
            .read()
            .map_err(|_| CacheError::poisoned(&self.name))?;
        Ok(holders.keys().cloned().collect())
    }
}

#[cfg(test)]
impl<K: Send + Sync, V: Send + Sync> CachePool<K, V> {
    /// Poisons the holder lock by panicking on another thread while the
    /// write guard is held.
    pub(crate) fn poison(&self) {
        std::thread::scope(|scope| {
            let writer = scope.spawn(|| {
                let _holders = self.holders.write();
                panic!("writer panicked while holding the pool");
            });
            assert!(writer.join().is_err());
        });
        assert!(self.holders.is_poisoned());
    }
}
