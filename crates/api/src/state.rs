use std::sync::Arc;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::metrics::Metrics;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is `Copy`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: minfo_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Process start, captured once in `main`; uptime derives from it.
    pub started_at: Instant,
    /// Request counters exposed at `/metrics`.
    pub metrics: Arc<Metrics>,
}
