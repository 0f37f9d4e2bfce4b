//! Downstream registry
//!
//! Static mapping of logical server name to descriptor. Built once at
//! startup, then shared read-only (behind an `Arc`) by every component.

use std::collections::HashMap;

use tracing::debug;
use url::Url;

use crate::error::ConfigError;
use crate::models::ServerDescriptor;

/// Read-only registry of downstream servers
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Descriptors in insertion order
    servers: Vec<ServerDescriptor>,
    /// Name -> position in `servers`
    index: HashMap<String, usize>,
}

impl Registry {
    /// Build a registry, rejecting duplicate or malformed entries
    pub fn new(servers: Vec<ServerDescriptor>) -> Result<Self, ConfigError> {
        let mut index = HashMap::with_capacity(servers.len());

        for (position, server) in servers.iter().enumerate() {
            validate(server)?;
            if index.insert(server.name.clone(), position).is_some() {
                return Err(ConfigError::DuplicateServer(server.name.clone()));
            }
            debug!(server = %server.name, base_url = %server.base_url, "Registered downstream server");
        }

        Ok(Self { servers, index })
    }

    /// Find a server by name
    pub fn lookup(&self, name: &str) -> Option<&ServerDescriptor> {
        self.index.get(name).map(|&position| &self.servers[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All servers in insertion order
    pub fn list_all(&self) -> &[ServerDescriptor] {
        &self.servers
    }

    /// All server names in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.servers.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

fn validate(server: &ServerDescriptor) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidServer {
        name: server.name.clone(),
        reason: reason.to_string(),
    };

    if server.name.trim().is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if server.name.contains('/') {
        return Err(invalid("name must not contain '/'"));
    }

    let url = Url::parse(&server.base_url)
        .map_err(|e| invalid(&format!("base_url is not a valid URL ({})", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("base_url must use http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("base_url must include a host"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn servers() -> Vec<ServerDescriptor> {
        vec![
            ServerDescriptor::new("github", "http://localhost:8001", "GitHub MCP Server"),
            ServerDescriptor::new("filesystem", "http://localhost:8002", "Filesystem MCP Server"),
            ServerDescriptor::new("atlassian", "http://localhost:8003", "Atlassian MCP Server"),
        ]
    }

    #[test]
    fn lookup_returns_registered_descriptor() {
        let registry = Registry::new(servers()).unwrap();
        let first = registry.lookup("filesystem").unwrap().clone();
        let second = registry.lookup("filesystem").unwrap();
        assert_eq!(&first, second);
        assert_eq!(second.base_url, "http://localhost:8002");
    }

    #[test]
    fn lookup_unknown_is_none() {
        let registry = Registry::new(servers()).unwrap();
        assert!(registry.lookup("gdrive").is_none());
        assert!(!registry.contains("gdrive"));
    }

    #[test]
    fn list_all_keeps_insertion_order() {
        let registry = Registry::new(servers()).unwrap();
        assert_eq!(registry.names(), vec!["github", "filesystem", "atlassian"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut entries = servers();
        entries.push(ServerDescriptor::new("github", "http://localhost:9001", ""));
        let err = Registry::new(entries).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateServer(name) if name == "github"));
    }

    #[test]
    fn malformed_entries_are_rejected() {
        let cases = [
            ServerDescriptor::new("", "http://localhost:8001", ""),
            ServerDescriptor::new("a/b", "http://localhost:8001", ""),
            ServerDescriptor::new("bad", "not a url", ""),
            ServerDescriptor::new("ftp", "ftp://localhost/", ""),
        ];
        for case in cases {
            let err = Registry::new(vec![case]).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidServer { .. }), "{err}");
        }
    }

    #[test]
    fn empty_registry_is_valid() {
        let registry = Registry::new(Vec::new()).unwrap();
        assert!(registry.is_empty());
    }
}
