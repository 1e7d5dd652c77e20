//! Read-through coordinator.
//!
//! Serves lookups from a [`CachePool`], falling back to [`Storage`] on a miss
//! or a stale entry. Refreshes are single-flight per key: concurrent lookups
//! of the same key wait on one lock and reuse the refreshed entry.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::KeyedLocks;
use crate::cache::{CacheHolder, CachePool, CacheStats, Deadlines};
use crate::error::Result;
use crate::storage::Storage;

// == Cache Policy ==
/// Lifespans applied by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// How long a resolved entry stays fresh
    pub life_span: Duration,
    /// How long an expired entry is renewed for while it is being refreshed
    pub refresh: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            life_span: Duration::from_secs(600),
            refresh: Duration::from_secs(32),
        }
    }
}

/// What the pool says about a key.
enum Cached<V> {
    Hit(V),
    Negative,
    Missing,
    Stale(Arc<CacheHolder<V>>),
}

/// Undoes a holder renewal when dropped, unless the refresh completed.
///
/// Covers storage errors and a lookup future dropped mid-read alike.
struct RenewalGuard<V> {
    renewed: Option<(Arc<CacheHolder<V>>, Deadlines)>,
}

impl<V> RenewalGuard<V> {
    fn complete(mut self) {
        self.renewed = None;
    }
}

impl<V> Drop for RenewalGuard<V> {
    fn drop(&mut self) {
        if let Some((holder, previous)) = self.renewed.take() {
            holder.restore(previous);
        }
    }
}

// == Read Through ==
/// Read-through coordinator over one pool and one storage backend.
pub struct ReadThrough<S: Storage> {
    pool: Arc<CachePool<S::Key, S::Value>>,
    storage: S,
    policy: CachePolicy,
    locks: KeyedLocks<S::Key>,
    stats: Mutex<CacheStats>,
}

impl<S> ReadThrough<S>
where
    S: Storage,
    S::Key: Eq + Hash + Clone + Debug,
    S::Value: Clone,
{
    // == Constructor ==
    /// Creates a coordinator with empty stats and no refresh in flight.
    pub fn new(pool: Arc<CachePool<S::Key, S::Value>>, storage: S, policy: CachePolicy) -> Self {
        Self {
            pool,
            storage,
            policy,
            locks: KeyedLocks::new(),
            stats: Mutex::new(CacheStats::new()),
        }
    }

    /// Returns the pool lookups are served from.
    pub fn pool(&self) -> &Arc<CachePool<S::Key, S::Value>> {
        &self.pool
    }

    /// Returns the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the lifespans in use.
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    // == Lookup ==
    /// Looks `key` up as of the current instant.
    pub async fn lookup(&self, key: &S::Key) -> Result<Option<S::Value>> {
        self.lookup_at(key, Instant::now()).await
    }

    /// Looks `key` up as of `now`.
    ///
    /// Returns `Ok(None)` when storage has confirmed the resource does not
    /// exist. A storage failure is returned as-is and leaves the pool in the
    /// state it had before the call, as does dropping the future mid-read.
    pub async fn lookup_at(&self, key: &S::Key, now: Instant) -> Result<Option<S::Value>> {
        // 1. unlocked fast path
        if let Some(answer) = self.answer(key, self.peek(key, now)?) {
            return Ok(answer);
        }

        // 2. one refresh per key; re-check in case another caller just did it
        let _guard = self.locks.lock(key).await?;
        let stale = match self.peek(key, now)? {
            Cached::Stale(holder) => Some(holder),
            Cached::Missing => None,
            cached => return Ok(self.answer(key, cached).flatten()),
        };
        self.record(CacheStats::record_miss);

        // let unlocked readers keep using the old entry during the read
        let renewal = RenewalGuard {
            renewed: stale.map(|holder| {
                let previous = holder.renewal(self.policy.refresh, now);
                self.record(CacheStats::record_renewal);
                (holder, previous)
            }),
        };

        // 3. durable storage
        self.record(CacheStats::record_storage_read);
        let value = match self.storage.read(key).await {
            Ok(value) => value,
            Err(err) => {
                self.record(CacheStats::record_storage_error);
                warn!(?key, error = %err, "Storage read failed");
                return Err(err);
            }
        };
        info!(?key, found = value.is_some(), "Refreshed cache entry from storage");

        // 4. cache the resolution, positive or negative
        self.pool
            .update(key.clone(), value.clone(), self.policy.life_span, now)?;
        renewal.complete();
        Ok(value)
    }

    // == Invalidate ==
    /// Drops `key` from the pool so the next lookup reads storage.
    ///
    /// Waits for an in-flight refresh of the same key to finish first.
    pub async fn invalidate(&self, key: &S::Key) -> Result<bool> {
        let _guard = self.locks.lock(key).await?;
        let now = Instant::now();
        let existed = self.pool.fetch(key, now)?.1.is_some();
        self.pool.erase(key, now)?;
        debug!(?key, existed, "Invalidated cache entry");
        Ok(existed)
    }

    // == Stats ==
    /// Returns a snapshot of the lookup counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self
            .stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        stats.set_total_entries(self.pool.len());
        stats
    }

    /// Adds purged holders to the eviction counter.
    pub fn record_evictions(&self, count: usize) {
        self.record(|stats| stats.record_evictions(count));
    }

    fn peek(&self, key: &S::Key, now: Instant) -> Result<Cached<S::Value>> {
        Ok(match self.pool.fetch(key, now)? {
            (Some(value), _) => Cached::Hit(value),
            (None, None) => Cached::Missing,
            (None, Some(holder)) if holder.is_alive(now) => Cached::Negative,
            (None, Some(holder)) => Cached::Stale(holder),
        })
    }

    /// Resolves a pool answer that needs no storage read.
    fn answer(&self, key: &S::Key, cached: Cached<S::Value>) -> Option<Option<S::Value>> {
        match cached {
            Cached::Hit(value) => {
                self.record(CacheStats::record_hit);
                debug!(?key, "Cache hit");
                Some(Some(value))
            }
            Cached::Negative => {
                self.record(CacheStats::record_negative_hit);
                debug!(?key, "Cached negative result");
                Some(None)
            }
            Cached::Missing | Cached::Stale(_) => None,
        }
    }

    fn record(&self, f: impl FnOnce(&mut CacheStats)) {
        let mut stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *stats);
    }
}

impl<S: Storage> Debug for ReadThrough<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadThrough")
            .field("pool", &self.pool.name())
            .field("policy", &self.policy)
            .finish()
    }
}
