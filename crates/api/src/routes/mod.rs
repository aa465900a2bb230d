//! Route definitions.
//!
//! ```text
//! GET    /                service descriptor
//! GET    /machine-info    host snapshot
//! GET    /health/db       database liveness
//! GET    /metrics         request counters (when enabled)
//! POST   /todos           create
//! GET    /todos           list (?done=bool)
//! GET    /todos/{id}      fetch one
//! PATCH  /todos/{id}      partial update
//! DELETE /todos/{id}      remove
//! ```

pub mod todos;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the service route tree, before root-path nesting and middleware.
pub fn service_routes(metrics_enabled: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/", get(handlers::root::index))
        .route("/machine-info", get(handlers::machine_info::machine_info))
        .route("/health/db", get(handlers::health::db_health))
        .nest("/todos", todos::router());

    if metrics_enabled {
        router.route("/metrics", get(handlers::metrics::metrics))
    } else {
        router
    }
}
