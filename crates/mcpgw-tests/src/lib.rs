//! End-to-end tests for the MCP gateway
//!
//! Every test runs the full stack in-process over real sockets:
//! stub downstream servers (`mcpgw_client::testing::StubServer`), the
//! reqwest-backed downstream client, the gateway components and the axum
//! front, driven with `reqwest` from the outside.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mcpgw-tests
//! ```
//!
//! # Test Structure
//!
//! - `gateway_e2e_test.rs` - discovery, invocation, tool routing and health
//!   through the HTTP surface

// This crate only contains tests, no library code
