//! Discovery handlers

use axum::extract::{Path, State};
use axum::Json;
use mcpgw_core::{Catalog, MethodDescriptor};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Path segment that turns `GET /proxy/{server}/mcp/{method}` into discovery
pub const DISCOVERY_SEGMENT: &str = "methods";

/// GET /proxy/methods
pub async fn list_methods(State(state): State<AppState>) -> Json<Catalog> {
    Json(state.gateway().aggregate().await)
}

#[derive(Serialize)]
pub struct ServerMethodsResponse {
    pub server: String,
    pub methods: Vec<MethodDescriptor>,
    pub count: usize,
}

/// GET /proxy/{server}/mcp/methods
pub async fn server_methods(
    State(state): State<AppState>,
    Path((server, method)): Path<(String, String)>,
) -> Result<Json<ServerMethodsResponse>, ApiError> {
    if method != DISCOVERY_SEGMENT {
        return Err(ApiError::NotFound(format!(
            "GET is only supported for /proxy/{}/mcp/{}",
            server, DISCOVERY_SEGMENT
        )));
    }

    let methods = state.gateway().discover(&server).await?;
    Ok(Json(ServerMethodsResponse {
        server,
        count: methods.len(),
        methods,
    }))
}
