//! Coordinator Module
//!
//! Read-through lookups on top of a cache pool with per-key single-flight
//! refresh from durable storage.

mod locks;
mod read_through;

pub use locks::{KeyGuard, KeyedLocks};
pub use read_through::{CachePolicy, ReadThrough};
