//! Shared helpers for HTTP integration tests.
//!
//! Builds the production router via `build_router` so tests exercise the
//! same middleware stack (CORS, request ID, timeout, panic recovery,
//! metrics) that the binary uses.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use minfo_api::config::ServerConfig;
use minfo_api::metrics::Metrics;
use minfo_api::router::build_router;
use minfo_api::state::AppState;
use minfo_db::DbConfig;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 8000,
        root_path: String::new(),
        request_timeout_secs: 30,
        metrics_enabled: true,
        db: DbConfig {
            host: "localhost".to_string(),
            port: 5432,
            database: "app_db".to_string(),
            user: "app_user".to_string(),
            password: String::new(),
            connect_timeout_secs: 5,
        },
    }
}

/// Build the full application router using the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_config(pool, test_config())
}

/// Build the app with a custom configuration (root path, metrics toggle).
pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config),
        started_at: Instant::now(),
        metrics: Arc::new(Metrics::default()),
    };
    build_router(state)
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Issue a request with a JSON body against the app.
pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Issue a bodyless request (DELETE and friends) against the app.
pub async fn send(app: Router, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
