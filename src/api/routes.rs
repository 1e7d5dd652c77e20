//! API Routes
//!
//! Configures the Axum router with all page cache endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    health_handler, homepage_handler, invalidate_handler, page_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /homepage` - Configured homepage
/// - `GET /pages/*path` - Any page below the storage root
/// - `DELETE /pages/*path` - Drop a page from the cache
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/homepage", get(homepage_handler))
        .route("/pages/*path", get(page_handler).delete(invalidate_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app(root: &std::path::Path) -> Router {
        let config = Config {
            storage_root: root.to_path_buf(),
            ..Config::default()
        };
        create_router(AppState::from_config(&config).unwrap())
    }

    async fn status_of(app: Router, method: &str, uri: &str) -> StatusCode {
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let status = status_of(create_test_app(dir.path()), "GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let status = status_of(create_test_app(dir.path()), "GET", "/stats").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_nested_page() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/a.md"), "A").unwrap();

        let status = status_of(create_test_app(dir.path()), "GET", "/pages/docs/a.md").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_homepage_not_configured() {
        let dir = tempfile::tempdir().unwrap();
        let status = status_of(create_test_app(dir.path()), "GET", "/homepage").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalidate_uncached_page() {
        let dir = tempfile::tempdir().unwrap();
        let status = status_of(create_test_app(dir.path()), "DELETE", "/pages/a.md").await;
        assert_eq!(status, StatusCode::OK);
    }
}
