//! Shared application router builder.
//!
//! Both the production binary (`main.rs`) and the integration tests
//! (`tests/common/mod.rs`) assemble the app through [`build_router`] so
//! they exercise the exact same middleware stack.

use std::time::Duration;

use axum::http::{HeaderName, StatusCode};
use axum::middleware;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::metrics;
use crate::routes;
use crate::state::AppState;

/// Assemble the application router with the full middleware stack.
pub fn build_router(state: AppState) -> Router {
    let mut app = routes::service_routes(state.config.metrics_enabled);

    // Optional URL prefix when served behind a path-rewriting proxy.
    if !state.config.root_path.is_empty() {
        app = Router::new().nest(&state.config.root_path, app);
    }

    let request_id_header = HeaderName::from_static("x-request-id");

    app
        // -- Middleware stack (applied bottom-up) --
        // Panic recovery: catch panics and return 500.
        .layer(CatchPanicLayer::new())
        // Request timeout.
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(state.config.request_timeout_secs),
        ))
        // Propagate request ID to response.
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        // Structured request/response tracing.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Set request ID on incoming requests.
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        // CORS.
        .layer(build_cors_layer())
        // Request counters.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            metrics::track_requests,
        ))
        // Shared state.
        .with_state(state)
}

/// Permissive CORS: any origin, method, and header, with credentials.
///
/// `tower_http` rejects the `Any` wildcard combined with credentials, so
/// the request's own values are mirrored back instead, which grants the
/// same access.
fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
