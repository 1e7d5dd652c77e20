//! Cache Module
//!
//! In-memory cache pools with expiry holders, negative caching and a named
//! pool provider.

mod holder;
mod manager;
mod pool;
mod stats;


// Re-export public types
pub use holder::{CacheHolder, Deadlines, DEFAULT_RENEWAL};
pub use manager::CacheManager;
pub use pool::{CachePool, Fetched};
pub use stats::CacheStats;
