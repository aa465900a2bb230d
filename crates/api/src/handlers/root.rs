//! Service descriptor at the root path.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / -- service descriptor with links to the exposed endpoints,
/// honoring the configured root path prefix.
pub async fn index(State(state): State<AppState>) -> Json<Value> {
    let prefix = state.config.root_path.as_str();

    let mut endpoints = serde_json::Map::new();
    endpoints.insert("machine_info".into(), json!(format!("{prefix}/machine-info")));
    endpoints.insert("todos".into(), json!(format!("{prefix}/todos")));
    endpoints.insert("db_health".into(), json!(format!("{prefix}/health/db")));
    if state.config.metrics_enabled {
        endpoints.insert("metrics".into(), json!(format!("{prefix}/metrics")));
    }

    Json(json!({
        "message": "Machine Info API",
        "endpoints": endpoints,
    }))
}
