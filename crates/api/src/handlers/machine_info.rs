//! Host machine snapshot endpoint.

use axum::extract::State;
use axum::Json;

use crate::machine::{self, MachineInfo};
use crate::state::AppState;

/// GET /machine-info -- pure read of host state, never fails.
pub async fn machine_info(State(state): State<AppState>) -> Json<MachineInfo> {
    let uptime_seconds = state.started_at.elapsed().as_secs();
    Json(machine::sample(uptime_seconds, state.config.port))
}
