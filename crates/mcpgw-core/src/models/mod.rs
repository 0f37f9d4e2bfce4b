//! Data model for the gateway

mod health;
mod invocation;
mod method;
mod server;

pub use health::*;
pub use invocation::*;
pub use method::*;
pub use server::*;
