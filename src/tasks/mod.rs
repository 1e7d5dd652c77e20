//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache purge: Drops deprecated holders from every pool at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
