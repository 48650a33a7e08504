//! Node query filters.
//!
//! Matching is conjunctive: a node must satisfy the type tag (if given),
//! every property key (equality), and — if `connected` is given — have at
//! least one edge of the specified type in the specified direction.

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};
use crate::graph::schema::{Node, Properties};

/// Edge direction relative to the node being filtered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Incoming edges (node is the edge target)
    In,
    /// Outgoing edges (node is the edge source)
    Out,
    /// Either direction
    Both,
}

/// Connectivity requirement: at least one edge of `edge_type` in `direction`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectedFilter {
    /// Edge type to require
    #[serde(rename = "type")]
    pub edge_type: String,
    /// Direction relative to the candidate node
    pub direction: Direction,
}

/// Filter for [`GraphStore::query_nodes`](crate::graph::GraphStore::query_nodes).
///
/// All fields optional; an empty filter matches every node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeFilter {
    /// Require this node type
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    /// Require equality on every listed property key
    pub properties: Option<Properties>,
    /// Require at least one matching edge
    pub connected: Option<ConnectedFilter>,
}

impl NodeFilter {
    /// Filter matching every node.
    pub fn any() -> Self {
        Self::default()
    }

    /// Filter by node type.
    pub fn by_type(node_type: impl Into<String>) -> Self {
        Self {
            node_type: Some(node_type.into()),
            ..Self::default()
        }
    }

    /// Require a property equality match (builder style).
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.properties
            .get_or_insert_with(Properties::new)
            .insert(key.into(), value.into());
        self
    }

    /// Require connectivity (builder style).
    pub fn with_connected(mut self, edge_type: impl Into<String>, direction: Direction) -> Self {
        self.connected = Some(ConnectedFilter {
            edge_type: edge_type.into(),
            direction,
        });
        self
    }

    /// Reject malformed filters instead of silently ignoring them.
    pub fn validate(&self) -> Result<()> {
        if let Some(t) = &self.node_type {
            if t.is_empty() {
                return Err(IndexError::validation("node filter: type must not be empty"));
            }
        }
        if let Some(props) = &self.properties {
            if props.keys().any(|k| k.is_empty()) {
                return Err(IndexError::validation(
                    "node filter: property keys must not be empty",
                ));
            }
        }
        if let Some(connected) = &self.connected {
            if connected.edge_type.is_empty() {
                return Err(IndexError::validation(
                    "node filter: connected.type must not be empty",
                ));
            }
        }
        Ok(())
    }

    /// Type and property checks (connectivity is checked by the store, which
    /// owns the adjacency lists).
    pub(super) fn matches_node(&self, node: &Node) -> bool {
        if let Some(t) = &self.node_type {
            if &node.node_type != t {
                return false;
            }
        }
        if let Some(props) = &self.properties {
            for (key, expected) in props {
                if node.properties.get(key) != Some(expected) {
                    return false;
                }
            }
        }
        true
    }
}
