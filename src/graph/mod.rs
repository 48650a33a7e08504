//! In-memory property graph store.
//!
//! Holds typed nodes and typed, directed edges with arbitrary properties and
//! answers filtered queries, shortest-path traversal, and connected-component
//! analysis. No knowledge of source code; the symbol index optionally emits
//! code structure into it.
//!
//! # Determinism
//!
//! - `query_nodes` returns nodes in insertion order.
//! - `find_path` breaks ties by edge insertion order.
//! - Components list their nodes in discovery order.
//!
//! # Concurrency
//!
//! One `RwLock` around the whole store: writers are exclusive, readers run
//! concurrently, and no multi-step mutation is observable half-applied.

mod algorithms;
mod count;
mod query;
mod schema;
#[cfg(test)]
mod tests;

use std::sync::RwLock;

use ahash::AHashMap;
use tracing::debug;

pub use count::GraphStats;
pub use query::{ConnectedFilter, Direction, NodeFilter};
pub use schema::{Edge, Node, Properties};

use crate::error::Result;

/// Default depth bound for [`GraphStore::find_path`] when the caller passes
/// `None`. Bounds runaway searches on large graphs.
pub const DEFAULT_MAX_PATH_DEPTH: usize = 20;

/// Mutable graph state, guarded by the store's lock.
#[derive(Default)]
pub(crate) struct GraphInner {
    nodes: AHashMap<String, Node>,
    /// Node ids in first-insertion order (overwrites keep the original slot)
    node_order: Vec<String>,
    edges: AHashMap<String, Edge>,
    /// Edge ids in first-insertion order
    edge_order: Vec<String>,
    /// node id -> outgoing edge ids, in the order the edges were attached
    outgoing: AHashMap<String, Vec<String>>,
    /// node id -> incoming edge ids, in the order the edges were attached
    incoming: AHashMap<String, Vec<String>>,
}

impl GraphInner {
    fn detach_edge(&mut self, edge_id: &str, from: &str, to: &str) {
        if let Some(out) = self.outgoing.get_mut(from) {
            out.retain(|id| id != edge_id);
        }
        if let Some(inc) = self.incoming.get_mut(to) {
            inc.retain(|id| id != edge_id);
        }
    }

    pub(crate) fn node_exists(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub(crate) fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Outgoing edge ids for a node, in attachment order.
    pub(crate) fn outgoing_edges(&self, id: &str) -> &[String] {
        self.outgoing.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Incoming edge ids for a node, in attachment order.
    pub(crate) fn incoming_edges(&self, id: &str) -> &[String] {
        self.incoming.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether an edge has both endpoints materialized.
    pub(crate) fn edge_is_materialized(&self, edge: &Edge) -> bool {
        self.node_exists(&edge.from) && self.node_exists(&edge.to)
    }

    /// Node ids in insertion order.
    pub(crate) fn nodes_in_order(&self) -> impl Iterator<Item = &Node> {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Edges in insertion order.
    pub(crate) fn edges_in_order(&self) -> impl Iterator<Item = &Edge> {
        self.edge_order.iter().filter_map(|id| self.edges.get(id))
    }

    /// True if the node has at least one edge matching the connectivity filter.
    fn is_connected(&self, node_id: &str, filter: &ConnectedFilter) -> bool {
        let check = |edge_ids: &[String]| {
            edge_ids.iter().any(|id| {
                self.edge(id)
                    .map(|e| e.edge_type == filter.edge_type)
                    .unwrap_or(false)
            })
        };
        match filter.direction {
            Direction::Out => check(self.outgoing_edges(node_id)),
            Direction::In => check(self.incoming_edges(node_id)),
            Direction::Both => {
                check(self.outgoing_edges(node_id)) || check(self.incoming_edges(node_id))
            }
        }
    }
}

/// In-memory property graph.
///
/// Construct one per workspace session and share it behind `Arc`; all
/// operations take `&self`.
pub struct GraphStore {
    inner: RwLock<GraphInner>,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    /// Create an empty graph store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(GraphInner::default()),
        }
    }

    /// Insert or overwrite a node by id. Always succeeds.
    ///
    /// Overwriting replaces the node's type and properties but preserves its
    /// edges and its original insertion rank.
    pub fn add_node(&self, node: Node) {
        let mut inner = self.inner.write().expect("graph lock poisoned");
        if !inner.nodes.contains_key(&node.id) {
            inner.node_order.push(node.id.clone());
        }
        inner.nodes.insert(node.id.clone(), node);
    }

    /// Insert or overwrite an edge by id. Endpoint existence is not validated.
    ///
    /// Overwriting an edge re-attaches it: if the endpoints changed, the edge
    /// leaves its old adjacency slots and is appended to the new ones.
    pub fn add_edge(&self, edge: Edge) {
        let mut inner = self.inner.write().expect("graph lock poisoned");
        if let Some(prev) = inner.edges.get(&edge.id) {
            let (old_from, old_to) = (prev.from.clone(), prev.to.clone());
            let id = edge.id.clone();
            inner.detach_edge(&id, &old_from, &old_to);
        } else {
            inner.edge_order.push(edge.id.clone());
        }
        inner
            .outgoing
            .entry(edge.from.clone())
            .or_default()
            .push(edge.id.clone());
        inner
            .incoming
            .entry(edge.to.clone())
            .or_default()
            .push(edge.id.clone());
        inner.edges.insert(edge.id.clone(), edge);
    }

    /// Fetch a node by id. Missing ids yield `None`, not an error.
    pub fn get_node(&self, id: &str) -> Option<Node> {
        let inner = self.inner.read().expect("graph lock poisoned");
        inner.nodes.get(id).cloned()
    }

    /// Fetch an edge by id.
    pub fn get_edge(&self, id: &str) -> Option<Edge> {
        let inner = self.inner.read().expect("graph lock poisoned");
        inner.edge(id).cloned()
    }

    /// Query nodes matching a conjunctive filter, in insertion order.
    ///
    /// The result set is unbounded; truncation is the caller's job. Malformed
    /// filters are rejected with a validation error.
    pub fn query_nodes(&self, filter: &NodeFilter) -> Result<Vec<Node>> {
        filter.validate()?;
        let inner = self.inner.read().expect("graph lock poisoned");
        let mut out = Vec::new();
        for node in inner.nodes_in_order() {
            if !filter.matches_node(node) {
                continue;
            }
            if let Some(connected) = &filter.connected {
                if !inner.is_connected(&node.id, connected) {
                    continue;
                }
            }
            out.push(node.clone());
        }
        Ok(out)
    }

    /// Breadth-first shortest path over directed edges.
    ///
    /// Returns the node ids of the first shortest path found within
    /// `max_depth` edges (default [`DEFAULT_MAX_PATH_DEPTH`]), endpoints
    /// included; ties are broken by edge insertion order. Unknown endpoints
    /// and unreachable targets yield `None`.
    pub fn find_path(&self, from: &str, to: &str, max_depth: Option<usize>) -> Option<Vec<String>> {
        let inner = self.inner.read().expect("graph lock poisoned");
        algorithms::find_path(&inner, from, to, max_depth.unwrap_or(DEFAULT_MAX_PATH_DEPTH))
    }

    /// Connected components of the undirected view of the graph.
    ///
    /// Every node appears in exactly one component; each component lists its
    /// nodes in discovery (insertion) order. The component list itself is
    /// ordered by first-discovered node; callers commonly re-sort by size.
    pub fn connected_components(&self) -> Vec<Vec<String>> {
        let inner = self.inner.read().expect("graph lock poisoned");
        algorithms::connected_components(&inner)
    }

    /// Node/edge counts and per-type breakdowns.
    pub fn stats(&self) -> GraphStats {
        let inner = self.inner.read().expect("graph lock poisoned");
        count::stats(&inner)
    }

    /// Drop all nodes and edges. Other stores are unaffected.
    pub fn clear(&self) {
        let mut inner = self.inner.write().expect("graph lock poisoned");
        let (nodes, edges) = (inner.nodes.len(), inner.edges.len());
        *inner = GraphInner::default();
        debug!(nodes, edges, "graph store cleared");
    }
}
