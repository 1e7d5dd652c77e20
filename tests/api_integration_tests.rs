//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint against a temporary
//! storage directory.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use page_cache::{api::create_router, AppState, Config};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

// == Helper Functions ==

struct TestApp {
    dir: TempDir,
    router: Router,
}

impl TestApp {
    fn new(homepage: Option<&str>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            storage_root: dir.path().to_path_buf(),
            homepage: homepage.map(str::to_string),
            homepage_format: Some("markdown".to_string()),
            ..Config::default()
        };
        let router = create_router(AppState::from_config(&config).unwrap());
        Self { dir, router }
    }

    fn write(&self, path: &str, content: &str) {
        std::fs::write(self.dir.path().join(path), content).unwrap();
    }

    async fn send(&self, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

// == Homepage Tests ==

#[tokio::test]
async fn test_homepage_success() {
    let app = TestApp::new(Some("index.md"));
    app.write("index.md", "# Welcome");

    let (status, json) = app.send("GET", "/homepage").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["path"], "index.md");
    assert_eq!(json["content"], "# Welcome");
    assert_eq!(json["format"], "markdown");
}

#[tokio::test]
async fn test_homepage_missing_file() {
    let app = TestApp::new(Some("index.md"));

    let (status, json) = app.send("GET", "/homepage").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("index.md"));
}

#[tokio::test]
async fn test_homepage_not_configured() {
    let app = TestApp::new(None);

    let (status, json) = app.send("GET", "/homepage").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "No homepage configured");
}

// == Page Tests ==

#[tokio::test]
async fn test_page_served_from_cache() {
    let app = TestApp::new(None);
    app.write("about.md", "v1");

    let (status, json) = app.send("GET", "/pages/about.md").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["content"], "v1");

    // changed on disk, still fresh in memory
    app.write("about.md", "v2");
    let (_, json) = app.send("GET", "/pages/about.md").await;
    assert_eq!(json["content"], "v1");

    let (_, stats) = app.send("GET", "/stats").await;
    assert_eq!(stats["storage_reads"], 1);
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
}

#[tokio::test]
async fn test_missing_page_is_negative_cached() {
    let app = TestApp::new(None);

    let (status, _) = app.send("GET", "/pages/ghost.md").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // created later, but the absence is still fresh
    app.write("ghost.md", "boo");
    let (status, _) = app.send("GET", "/pages/ghost.md").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, stats) = app.send("GET", "/stats").await;
    assert_eq!(stats["storage_reads"], 1);
    assert_eq!(stats["negative_hits"], 1);
}

#[tokio::test]
async fn test_invalidate_then_reload() {
    let app = TestApp::new(None);
    app.write("news.md", "old");
    app.send("GET", "/pages/news.md").await;

    app.write("news.md", "new");
    let (status, json) = app.send("DELETE", "/pages/news.md").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["was_cached"], true);

    let (_, json) = app.send("GET", "/pages/news.md").await;
    assert_eq!(json["content"], "new");
}

#[tokio::test]
async fn test_path_traversal_rejected() {
    let app = TestApp::new(None);

    let (status, json) = app.send("GET", "/pages/..%2Fsecret").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Invalid key"));
}

// == Stats / Health Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = TestApp::new(None);

    let (status, json) = app.send("GET", "/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"], 0);
    assert_eq!(json["hit_rate"], 0.0);
    assert_eq!(json["pools"][0]["name"], "web_pages");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new(None);

    let (status, json) = app.send("GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
