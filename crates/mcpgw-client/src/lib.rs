//! MCP downstream client
//!
//! [`HttpDownstream`] implements [`mcpgw_core::Downstream`] over HTTP. It is
//! the only place that knows the downstream wire format: discovery and
//! invocation envelopes are normalized here into method descriptors and
//! [`InvocationResult`](mcpgw_core::InvocationResult)s.
//!
//! # Example
//!
//! ```rust,no_run
//! use mcpgw_client::HttpDownstream;
//! use mcpgw_core::{Downstream, DownstreamConfig, ServerDescriptor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downstream = HttpDownstream::new(&DownstreamConfig::default())?;
//!     let server = ServerDescriptor::new("filesystem", "http://localhost:8002", "");
//!
//!     let methods = downstream.discover(&server).await?;
//!     println!("{} methods", methods.len());
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! The `testing` module provides stub downstream servers:
//!
//! ```rust,ignore
//! use mcpgw_client::testing::{Reply, StubServer};
//!
//! let stub = StubServer::new()
//!     .method("list_files")
//!     .reply("list_files", Reply::Result(json!({"files": ["a"]})))
//!     .start()
//!     .await?;
//! let server = stub.descriptor("filesystem");
//! ```

mod client;
mod error;
pub mod protocol;
pub mod testing;

pub use client::HttpDownstream;
pub use error::{ClientError, Result};
