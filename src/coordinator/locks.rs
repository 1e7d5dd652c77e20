//! Per-key async locks.
//!
//! One mutex per key that is currently being refreshed. Entries are created
//! on demand and removed when the last holder or waiter lets go.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::error::{CacheError, Result};

// == Keyed Locks ==
/// Table of per-key async mutexes.
#[derive(Debug)]
pub struct KeyedLocks<K> {
    locks: Mutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    // == Lock ==
    /// Waits until the lock for `key` is free and takes it.
    ///
    /// The lock is released when the returned guard is dropped, on every
    /// exit path including errors and cancellation.
    pub async fn lock(&self, key: &K) -> Result<KeyGuard<'_, K>> {
        let mutex = {
            let mut locks = self
                .locks
                .lock()
                .map_err(|_| CacheError::poisoned("keyed locks"))?;
            locks
                .entry(key.clone())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        let mut guard = KeyGuard {
            locks: self,
            key: key.clone(),
            held: None,
        };
        guard.held = Some(mutex.lock_owned().await);
        Ok(guard)
    }

    /// Returns the number of keys with a holder or waiters.
    pub fn in_flight(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn release(&self, key: &K) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Clones are only taken under this lock, so a count of one means the
        // table holds the last reference.
        if locks.get(key).is_some_and(|mutex| Arc::strong_count(mutex) == 1) {
            locks.remove(key);
        }
    }
}

// == Key Guard ==
/// Holds the lock for one key.
pub struct KeyGuard<'a, K>
where
    K: Eq + Hash + Clone,
{
    locks: &'a KeyedLocks<K>,
    key: K,
    held: Option<OwnedMutexGuard<()>>,
}

impl<K> Drop for KeyGuard<'_, K>
where
    K: Eq + Hash + Clone,
{
    fn drop(&mut self) {
        self.held.take();
        self.locks.release(&self.key);
    }
}
