//! Storage Module
//!
//! Durable storage collaborators the read-through cache falls back to.

mod fs;

use async_trait::async_trait;

use crate::error::Result;

pub use fs::FsStorage;

/// Durable storage read by the coordinator on a miss or a stale entry.
///
/// `Ok(None)` means the resource legitimately does not exist and is worth
/// caching as a negative result; `Err` is a failed read and is never cached.
#[async_trait]
pub trait Storage: Send + Sync {
    type Key: Send + Sync;
    type Value: Send + Sync;

    async fn read(&self, key: &Self::Key) -> Result<Option<Self::Value>>;
}
