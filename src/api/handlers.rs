//! API Handlers
//!
//! HTTP request handlers for each page cache endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::context::AppContext;
use crate::error::{CacheError, Result};
use crate::models::{HealthResponse, InvalidateResponse, PageResponse, StatsResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application context owning the page cache
    pub context: Arc<AppContext>,
}

impl AppState {
    /// Creates a new AppState around an application context.
    pub fn new(context: AppContext) -> Self {
        Self {
            context: Arc::new(context),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Result<Self> {
        Ok(Self::new(AppContext::from_config(config)?))
    }
}

/// Handler for GET /homepage
///
/// Returns the configured homepage through the page cache.
pub async fn homepage_handler(State(state): State<AppState>) -> Result<Json<PageResponse>> {
    let webmaster = state.context.webmaster();
    let path = webmaster
        .homepage()
        .ok_or(CacheError::NoHomepage)?;

    match webmaster.load_homepage().await? {
        Some(content) => Ok(Json(
            PageResponse::new(path, content).with_format(webmaster.format()),
        )),
        None => Err(CacheError::NotFound(path.to_string())),
    }
}

/// Handler for GET /pages/*path
pub async fn page_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<PageResponse>> {
    match state.context.webmaster().load_page(&path).await? {
        Some(content) => Ok(Json(PageResponse::new(path, content))),
        None => Err(CacheError::NotFound(path)),
    }
}

/// Handler for DELETE /pages/*path
///
/// Drops the page from the cache so the next read goes to storage.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<InvalidateResponse>> {
    let was_cached = state.context.webmaster().invalidate(&path).await?;
    Ok(Json(InvalidateResponse::new(path, was_cached)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(
        state.context.page_stats(),
        state.context.caches().pool_sizes(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    fn state_with_pages(pages: &[(&str, &str)], homepage: Option<&str>) -> (TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        for (path, content) in pages {
            std::fs::write(dir.path().join(path), content).unwrap();
        }
        let config = Config {
            storage_root: dir.path().to_path_buf(),
            homepage: homepage.map(str::to_string),
            homepage_format: Some("markdown".to_string()),
            ..Config::default()
        };
        let state = AppState::from_config(&config).unwrap();
        (dir, state)
    }

    #[tokio::test]
    async fn test_homepage_handler() {
        let (_dir, state) = state_with_pages(&[("index.md", "# Hi")], Some("index.md"));

        let response = homepage_handler(State(state)).await.unwrap();
        assert_eq!(response.content, "# Hi");
        assert_eq!(response.format.as_deref(), Some("markdown"));
    }

    #[tokio::test]
    async fn test_homepage_not_configured() {
        let (_dir, state) = state_with_pages(&[], None);

        let result = homepage_handler(State(state)).await;
        assert!(matches!(result, Err(CacheError::NoHomepage)));
    }

    #[tokio::test]
    async fn test_page_handler_missing() {
        let (_dir, state) = state_with_pages(&[], None);

        let result = page_handler(State(state.clone()), Path("gone.md".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
        assert_eq!(state.context.page_stats().storage_reads, 1);
    }

    #[tokio::test]
    async fn test_invalidate_handler() {
        let (_dir, state) = state_with_pages(&[("a.md", "A")], None);

        page_handler(State(state.clone()), Path("a.md".to_string()))
            .await
            .unwrap();
        let response = invalidate_handler(State(state.clone()), Path("a.md".to_string()))
            .await
            .unwrap();
        assert!(response.was_cached);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let (_dir, state) = state_with_pages(&[], None);

        let response = stats_handler(State(state)).await;
        assert_eq!(response.stats.hits, 0);
        assert_eq!(response.stats.misses, 0);
        assert_eq!(response.pools.len(), 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
