//! Node and edge records for the property graph.

use serde::{Deserialize, Serialize};

/// Property bag attached to nodes and edges.
///
/// Keys are free-form; values are arbitrary JSON so the out-of-scope tool
/// layer can round-trip them without adapters.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// A typed node with arbitrary properties.
///
/// `id` is caller-assigned and unique within a store instance. Inserting a
/// duplicate id overwrites the prior node's type and properties but preserves
/// its edges and its original insertion rank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Caller-assigned unique id
    pub id: String,
    /// Free-form type tag, e.g. "function", "file", "class"
    #[serde(rename = "type")]
    pub node_type: String,
    /// Arbitrary properties
    #[serde(default)]
    pub properties: Properties,
}

impl Node {
    /// Create a node with an empty property bag.
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            properties: Properties::new(),
        }
    }

    /// Attach a property (builder style).
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// A typed, directed edge with arbitrary properties.
///
/// Endpoints should reference existing nodes, but the store does not validate
/// them: a dangling edge is retained, counted in stats, and excluded from
/// traversals that require materialized endpoints. This is a tolerated
/// inconsistency, never silently healed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    /// Caller-assigned unique id
    pub id: String,
    /// Source node id
    pub from: String,
    /// Target node id
    pub to: String,
    /// Free-form type tag, e.g. "imports", "calls"
    #[serde(rename = "type")]
    pub edge_type: String,
    /// Arbitrary properties
    #[serde(default)]
    pub properties: Properties,
}

impl Edge {
    /// Create an edge with an empty property bag.
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        edge_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            edge_type: edge_type.into(),
            properties: Properties::new(),
        }
    }

    /// Attach a property (builder style).
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}
