//! Root status and health handlers

use axum::extract::State;
use axum::Json;
use mcpgw_core::HealthReport;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct RootResponse {
    pub status: &'static str,
    pub name: String,
    pub version: String,
}

/// GET /
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let info = state.gateway().info();
    Json(RootResponse {
        status: "running",
        name: info.name.clone(),
        version: info.version.clone(),
    })
}

/// GET /health
///
/// Always answers 200; the report itself says how healthy the downstream
/// set is.
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.gateway().check_health().await)
}
