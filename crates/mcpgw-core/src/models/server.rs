//! Downstream server descriptors

use serde::{Deserialize, Serialize};

/// A registered downstream tool server
///
/// Created once at startup from static configuration and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDescriptor {
    /// Unique logical name (routing key)
    pub name: String,
    /// Base address of the server, e.g. `http://localhost:8001`
    pub base_url: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
}

impl ServerDescriptor {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            description: description.into(),
        }
    }
}
