//! API Module
//!
//! HTTP handlers and routing for the page cache REST API.
//!
//! # Endpoints
//! - `GET /homepage` - Configured homepage
//! - `GET /pages/*path` - Read a page through the cache
//! - `DELETE /pages/*path` - Invalidate a cached page
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
