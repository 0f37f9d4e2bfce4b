//! Method descriptors and the aggregated method catalog

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::Failure;

/// A method exposed by a downstream server
///
/// Always derived from a fresh discovery call, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Method name as the downstream server knows it
    pub name: String,
    /// Registered server that exposes the method
    pub owning_server: String,
    /// Optional description supplied by the downstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>, owning_server: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owning_server: owning_server.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Discovery outcome for one server
#[derive(Debug, Clone, PartialEq)]
pub struct ServerCatalog {
    /// Registered server name
    pub server: String,
    /// Method list, or the reason discovery failed
    pub outcome: Result<Vec<MethodDescriptor>, Failure>,
}

impl ServerCatalog {
    /// Number of methods discovered (zero on failure)
    pub fn count(&self) -> usize {
        self.outcome.as_ref().map(Vec::len).unwrap_or(0)
    }
}

/// Merged discovery results across every registered server
///
/// Entries keep registry insertion order. A failed server is an entry like
/// any other: partial results are an expected outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub servers: Vec<ServerCatalog>,
}

impl Catalog {
    /// Number of servers in the catalog
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Discovery outcome for a single server
    pub fn get(&self, server: &str) -> Option<&Result<Vec<MethodDescriptor>, Failure>> {
        self.servers
            .iter()
            .find(|entry| entry.server == server)
            .map(|entry| &entry.outcome)
    }

    /// Total methods across all servers that answered
    pub fn total_methods(&self) -> usize {
        self.servers.iter().map(ServerCatalog::count).sum()
    }

    /// All discovered methods, in server order
    pub fn methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.servers
            .iter()
            .filter_map(|entry| entry.outcome.as_ref().ok())
            .flatten()
    }
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum EntryView<'a> {
    Available {
        methods: &'a [MethodDescriptor],
        count: usize,
    },
    Error {
        error: &'a Failure,
    },
}

impl<'a> From<&'a ServerCatalog> for EntryView<'a> {
    fn from(entry: &'a ServerCatalog) -> Self {
        match &entry.outcome {
            Ok(methods) => EntryView::Available {
                methods,
                count: methods.len(),
            },
            Err(error) => EntryView::Error { error },
        }
    }
}

struct OrderedEntries<'a>(&'a [ServerCatalog]);

impl Serialize for OrderedEntries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in self.0 {
            map.serialize_entry(&entry.server, &EntryView::from(entry))?;
        }
        map.end()
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Catalog", 3)?;
        state.serialize_field("servers", &OrderedEntries(&self.servers))?;
        state.serialize_field("total_servers", &self.len())?;
        state.serialize_field("total_methods", &self.total_methods())?;
        state.end()
    }
}
