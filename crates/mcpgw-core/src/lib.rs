//! mcpgw-core - Core types for the MCP gateway
//!
//! Holds everything the gateway layers share: the static server registry,
//! method and invocation models, the failure taxonomy, routing policies,
//! configuration, and the [`Downstream`] trait that transports implement.

pub mod config;
pub mod downstream;
pub mod error;
pub mod models;
pub mod registry;
pub mod routing;

pub use config::{DownstreamConfig, GatewayConfig, RoutingConfig, ServerConfig};
pub use downstream::{Downstream, DownstreamResult};
pub use error::{ConfigError, ErrorKind, Failure, Origin};
pub use models::*;
pub use registry::Registry;
pub use routing::{Resolution, RouteHints, RoutingPolicy, RoutingStrategy};
