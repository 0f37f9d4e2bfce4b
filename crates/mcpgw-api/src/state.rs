//! Application state for the gateway API

use std::sync::Arc;

use axum::http::HeaderMap;
use mcpgw_gateway::Gateway;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<Gateway>,
}

impl AppState {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Value of the configured target-server header, if present and valid UTF-8
    pub fn target_header<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get(self.gateway.target_header())
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}
