//! Gateway configuration
//!
//! Loaded once at startup from TOML or YAML. The server list is turned into
//! a validated [`Registry`]; everything else is a tuning knob with a
//! documented default.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::ServerDescriptor;
use crate::registry::Registry;
use crate::routing::{policy_for, RoutingPolicy, RoutingStrategy};

/// Root configuration document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub downstream: DownstreamConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    /// Static downstream registry entries
    #[serde(default)]
    pub servers: Vec<ServerDescriptor>,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Name reported on `/` and `/health`
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Outbound call settings shared by every downstream server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownstreamConfig {
    /// Per-call timeout for discovery and invocation
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// TCP connect timeout
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Timeout of a single health probe
    #[serde(default = "default_health_timeout_ms")]
    pub health_timeout_ms: u64,
    /// Path of the discovery endpoint, relative to each base URL
    #[serde(default = "default_discovery_path")]
    pub discovery_path: String,
    /// Path of the invocation endpoint, relative to each base URL
    #[serde(default = "default_invoke_path")]
    pub invoke_path: String,
}

impl DownstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            health_timeout_ms: default_health_timeout_ms(),
            discovery_path: default_discovery_path(),
            invoke_path: default_invoke_path(),
        }
    }
}

/// Tool-call routing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    #[serde(default)]
    pub strategy: RoutingStrategy,
    /// Separator between server prefix and method in tool names
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Header consulted by the `header` strategy
    #[serde(default = "default_header_name")]
    pub header_name: String,
    /// Fallback server when a tool name does not resolve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_server: Option<String>,
}

impl RoutingConfig {
    /// Build the configured routing policy
    pub fn policy(&self) -> Box<dyn RoutingPolicy> {
        policy_for(self.strategy, &self.delimiter, self.default_server.clone())
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            strategy: RoutingStrategy::default(),
            delimiter: default_delimiter(),
            header_name: default_header_name(),
            default_server: None,
        }
    }
}

fn default_name() -> String {
    "Unified MCP Gateway".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_connect_timeout_ms() -> u64 {
    2000
}

fn default_health_timeout_ms() -> u64 {
    2000
}

fn default_discovery_path() -> String {
    "/mcp/get_methods".to_string()
}

fn default_invoke_path() -> String {
    "/mcp/invoke_method".to_string()
}

fn default_delimiter() -> String {
    "_".to_string()
}

fn default_header_name() -> String {
    "X-Target-MCP".to_string()
}

impl GatewayConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from a file; `.yaml`/`.yml` are parsed as YAML, anything else as TOML
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    /// The three tool servers the gateway was originally built around,
    /// used when the daemon starts without a config file.
    pub fn demo() -> Self {
        Self {
            servers: vec![
                ServerDescriptor::new("github", "http://localhost:8001", "GitHub MCP Server"),
                ServerDescriptor::new(
                    "filesystem",
                    "http://localhost:8002",
                    "Filesystem MCP Server",
                ),
                ServerDescriptor::new(
                    "atlassian",
                    "http://localhost:8003",
                    "Atlassian MCP Server",
                ),
            ],
            ..Self::default()
        }
    }

    /// Validate the server list and routing default, producing the registry
    pub fn registry(&self) -> Result<Registry, ConfigError> {
        let registry = Registry::new(self.servers.clone())?;

        if let Some(default) = &self.routing.default_server {
            if !registry.contains(default) {
                return Err(ConfigError::UnknownDefaultServer(default.clone()));
            }
        }

        Ok(registry)
    }
}
