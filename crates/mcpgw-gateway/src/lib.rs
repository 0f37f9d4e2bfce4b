//! mcpgw-gateway - Fan-out, routing and health for the MCP gateway
//!
//! Every component holds the same read-only [`Registry`](mcpgw_core::Registry)
//! and a shared [`Downstream`](mcpgw_core::Downstream) transport.
//!
//! # Architecture
//!
//! ```text
//!                  ┌──────────────────────────────────────┐
//!                  │               Gateway                │
//!                  │                                      │
//!  tool calls ───► │  ToolDispatcher (RoutingPolicy)      │
//!                  │          │                           │
//!  invocations ──► │  RequestRouter ──────────┐           │
//!                  │                          │           │
//!  discovery ────► │  MethodAggregator ───────┤ join_all  │
//!                  │                          │           │
//!  health ───────► │  HealthMonitor ──────────┤           │
//!                  └──────────────────────────┼───────────┘
//!                                             ▼
//!                                 dyn Downstream (HTTP)
//!                          ┌──────────┬──────────┬──────────┐
//!                          │  github  │filesystem│atlassian │
//!                          └──────────┴──────────┴──────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use mcpgw_gateway::Gateway;
//! use mcpgw_client::HttpDownstream;
//!
//! let config = GatewayConfig::load(path)?;
//! let downstream = Arc::new(HttpDownstream::new(&config.downstream)?);
//! let gateway = Gateway::new(config, downstream)?;
//!
//! let catalog = gateway.aggregate().await;
//! ```

mod aggregator;
mod dispatch;
mod gateway;
mod health;
#[cfg(test)]
mod mock;
mod router;

pub use aggregator::MethodAggregator;
pub use dispatch::{RoutePreview, ToolCall, ToolCallOutcome, ToolDispatcher};
pub use gateway::Gateway;
pub use health::HealthMonitor;
pub use router::RequestRouter;
