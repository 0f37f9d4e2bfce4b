//! HTTP request handlers for the gateway API
//!
//! Handlers only translate between HTTP and the [`Gateway`](mcpgw_gateway::Gateway);
//! all routing and fan-out happens there.

pub mod invoke;
pub mod methods;
pub mod servers;
pub mod status;
pub mod tools;
