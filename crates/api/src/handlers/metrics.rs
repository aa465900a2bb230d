//! Operational metrics endpoint.

use axum::extract::State;
use axum::Json;

use crate::metrics::MetricsSnapshot;
use crate::state::AppState;

/// GET /metrics -- process-local request counters.
///
/// Only routed when `METRICS_ENABLED` is set (see the router builder).
pub async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
