//! mcpgw-api - HTTP front of the MCP gateway
//!
//! Binds the [`Gateway`](mcpgw_gateway::Gateway) to an axum router. It is
//! transport-agnostic: whatever [`Downstream`](mcpgw_core::Downstream) the
//! gateway was built with serves the calls.
//!
//! # Usage
//!
//! ```ignore
//! use mcpgw_api::{create_router, AppState};
//!
//! let gateway = Gateway::new(config, downstream)?;
//! let router = create_router(AppState::new(gateway));
//! axum::serve(listener, router).await?;
//! ```

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the gateway router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::status::root))
        .route("/health", get(handlers::status::health))
        // Registry and catalog
        .route("/proxy/servers", get(handlers::servers::list_servers))
        .route("/proxy/config", get(handlers::servers::get_config))
        .route("/proxy/methods", get(handlers::methods::list_methods))
        // Policy-routed tool calls
        .route("/proxy/tools/call", post(handlers::tools::call_tool))
        .route(
            "/proxy/route/{tool_name}",
            get(handlers::tools::preview_route),
        )
        // Per-server discovery (GET .../mcp/methods) and invocation (POST)
        .route(
            "/proxy/{server}/mcp/{method}",
            get(handlers::methods::server_methods).post(handlers::invoke::invoke_method),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
