//! Cache Holder Module
//!
//! Expiry metadata attached to a cached value. A holder may carry no value,
//! which records a confirmed "not found" result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Renewal window used when a caller passes a zero duration.
pub const DEFAULT_RENEWAL: Duration = Duration::from_secs(128);

/// Deadlines of a holder as they were before a [`CacheHolder::renewal`].
///
/// Handing them back to [`CacheHolder::restore`] undoes the renewal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    expires: u64,
    deprecated: u64,
}

// == Cache Holder ==
/// A cached value together with its freshness deadlines.
///
/// Deadlines are stored as nanosecond offsets from the instant the holder was
/// created, so `renewal` can extend them through a shared reference without
/// taking the pool lock.
#[derive(Debug)]
pub struct CacheHolder<V> {
    /// The cached value, `None` for a negative result
    value: Option<V>,
    /// Full lifespan this holder was created with
    life_span: Duration,
    /// Reference point for the deadline offsets
    epoch: Instant,
    /// Offset after which the holder is due for refresh
    expires: AtomicU64,
    /// Offset after which the pool may drop the holder
    deprecated: AtomicU64,
}

impl<V> CacheHolder<V> {
    // == Constructor ==
    /// Creates a holder that stays alive for `life_span` and is kept by the
    /// pool for twice that long.
    pub fn new(value: Option<V>, life_span: Duration, now: Instant) -> Self {
        Self {
            value,
            life_span,
            epoch: now,
            expires: AtomicU64::new(nanos(life_span)),
            deprecated: AtomicU64::new(nanos(life_span).saturating_mul(2)),
        }
    }

    /// Returns the cached value, `None` for a negative result.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Returns the lifespan the holder was created with.
    pub fn life_span(&self) -> Duration {
        self.life_span
    }

    // == Is Alive ==
    /// Returns true while `now` is before the expiry deadline.
    pub fn is_alive(&self, now: Instant) -> bool {
        self.offset(now) < self.expires.load(Ordering::Acquire)
    }

    // == Is Deprecated ==
    /// Returns true once `now` is past the eviction deadline.
    pub fn is_deprecated(&self, now: Instant) -> bool {
        self.offset(now) > self.deprecated.load(Ordering::Acquire)
    }

    // == Renewal ==
    /// Extends the expiry to at least `now + duration` without touching the
    /// value. A zero `duration` falls back to [`DEFAULT_RENEWAL`].
    ///
    /// The eviction deadline is pushed to at least `now + 2 * life_span`.
    /// Returns the deadlines as they were before the call.
    pub fn renewal(&self, duration: Duration, now: Instant) -> Deadlines {
        let duration = if duration.is_zero() {
            DEFAULT_RENEWAL
        } else {
            duration
        };
        let offset = self.offset(now);
        let expires = self
            .expires
            .fetch_max(offset.saturating_add(nanos(duration)), Ordering::AcqRel);
        let deprecated = self.deprecated.fetch_max(
            offset.saturating_add(nanos(self.life_span).saturating_mul(2)),
            Ordering::AcqRel,
        );
        Deadlines {
            expires,
            deprecated,
        }
    }

    // == Restore ==
    /// Puts both deadlines back to `previous`, undoing a renewal whose
    /// refresh did not complete.
    pub fn restore(&self, previous: Deadlines) {
        self.expires.store(previous.expires, Ordering::Release);
        self.deprecated.store(previous.deprecated, Ordering::Release);
    }

    // == Expires In ==
    /// Returns the time left until expiry, zero when already expired.
    pub fn expires_in(&self, now: Instant) -> Duration {
        let remaining = self
            .expires
            .load(Ordering::Acquire)
            .saturating_sub(self.offset(now));
        Duration::from_nanos(remaining)
    }

    fn offset(&self, now: Instant) -> u64 {
        nanos(now.saturating_duration_since(self.epoch))
    }
}

fn nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}
