//! Graph statistics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::GraphInner;

/// Node/edge counts with per-type breakdowns.
///
/// Breakdown maps are `BTreeMap` so serialized output is stable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphStats {
    /// Total node count
    pub nodes: usize,
    /// Total edge count (dangling edges included)
    pub edges: usize,
    /// Node count per type tag
    pub node_types: BTreeMap<String, usize>,
    /// Edge count per type tag
    pub edge_types: BTreeMap<String, usize>,
    /// Edges with at least one missing endpoint
    pub dangling_edges: usize,
}

pub(super) fn stats(inner: &GraphInner) -> GraphStats {
    let mut node_types = BTreeMap::new();
    for node in inner.nodes_in_order() {
        *node_types.entry(node.node_type.clone()).or_insert(0) += 1;
    }

    let mut edge_types = BTreeMap::new();
    let mut dangling_edges = 0;
    let mut edges = 0;
    for edge in inner.edges_in_order() {
        edges += 1;
        *edge_types.entry(edge.edge_type.clone()).or_insert(0) += 1;
        if !inner.edge_is_materialized(edge) {
            dangling_edges += 1;
        }
    }

    GraphStats {
        nodes: inner.nodes_in_order().count(),
        edges,
        node_types,
        edge_types,
        dangling_edges,
    }
}
