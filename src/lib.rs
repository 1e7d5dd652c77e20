//! Page Cache - A read-through page cache
//!
//! Serves pages from durable storage through an in-memory cache pool with
//! per-key single-flight refresh and negative caching.

pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod coordinator;
pub mod error;
pub mod models;
pub mod storage;
pub mod tasks;
pub mod webmaster;

pub use api::AppState;
pub use config::Config;
pub use context::AppContext;
pub use coordinator::{CachePolicy, ReadThrough};
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
