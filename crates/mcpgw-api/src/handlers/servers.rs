//! Registry and configuration views

use axum::extract::State;
use axum::Json;
use mcpgw_core::{RoutingStrategy, ServerDescriptor};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct ServersResponse {
    pub servers: Vec<ServerDescriptor>,
    pub count: usize,
}

/// GET /proxy/servers
pub async fn list_servers(State(state): State<AppState>) -> Json<ServersResponse> {
    let servers = state.gateway().registry().list_all().to_vec();
    Json(ServersResponse {
        count: servers.len(),
        servers,
    })
}

#[derive(Serialize)]
pub struct ConfigResponse {
    pub name: String,
    pub version: String,
    pub routing: RoutingView,
    pub downstream: DownstreamView,
    pub servers: Vec<String>,
}

#[derive(Serialize)]
pub struct RoutingView {
    pub strategy: RoutingStrategy,
    pub delimiter: String,
    pub header_name: String,
    pub default_server: Option<String>,
}

#[derive(Serialize)]
pub struct DownstreamView {
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub health_timeout_ms: u64,
}

/// GET /proxy/config
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let gateway = state.gateway();
    let config = gateway.config();

    Json(ConfigResponse {
        name: gateway.info().name.clone(),
        version: gateway.info().version.clone(),
        routing: RoutingView {
            strategy: config.routing.strategy,
            delimiter: config.routing.delimiter.clone(),
            header_name: config.routing.header_name.clone(),
            default_server: config.routing.default_server.clone(),
        },
        downstream: DownstreamView {
            timeout_ms: config.downstream.timeout_ms,
            connect_timeout_ms: config.downstream.connect_timeout_ms,
            health_timeout_ms: config.downstream.health_timeout_ms,
        },
        servers: gateway
            .registry()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}
