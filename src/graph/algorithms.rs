//! Graph traversal algorithms.
//!
//! Both algorithms run over the adjacency lists the store maintains on every
//! `add_edge`, so neighbor lookup is O(1) per node and no query ever scans
//! the full edge list.
//!
//! Dangling edges (an endpoint with no materialized node) are skipped here;
//! they stay in the store and are reported by `stats()`.

use ahash::{AHashMap, AHashSet};
use std::collections::VecDeque;

use super::GraphInner;

/// Breadth-first shortest path from `from` to `to` over directed edges.
///
/// Neighbors are expanded in edge insertion order, which makes the returned
/// path deterministic among equal-length candidates. `max_depth` bounds the
/// path length in edges.
pub(super) fn find_path(
    inner: &GraphInner,
    from: &str,
    to: &str,
    max_depth: usize,
) -> Option<Vec<String>> {
    if !inner.node_exists(from) || !inner.node_exists(to) {
        return None;
    }
    if from == to {
        return Some(vec![from.to_string()]);
    }

    // predecessor map doubles as the visited set
    let mut predecessor: AHashMap<String, String> = AHashMap::new();
    let mut queue: VecDeque<(String, usize)> = VecDeque::new();
    queue.push_back((from.to_string(), 0));
    let mut visited: AHashSet<String> = AHashSet::new();
    visited.insert(from.to_string());

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        for edge_id in inner.outgoing_edges(&current) {
            let edge = match inner.edge(edge_id) {
                Some(e) => e,
                None => continue,
            };
            if !inner.edge_is_materialized(edge) {
                continue;
            }
            let next = &edge.to;
            if visited.contains(next) {
                continue;
            }
            visited.insert(next.clone());
            predecessor.insert(next.clone(), current.clone());
            if next == to {
                return Some(reconstruct(&predecessor, from, to));
            }
            queue.push_back((next.clone(), depth + 1));
        }
    }

    None
}

/// Walk the predecessor map back from `to` and reverse into a forward path.
fn reconstruct(predecessor: &AHashMap<String, String>, from: &str, to: &str) -> Vec<String> {
    let mut path = vec![to.to_string()];
    let mut current = to;
    while current != from {
        let prev = &predecessor[current];
        path.push(prev.clone());
        current = prev;
    }
    path.reverse();
    path
}

/// Union-find with path compression over node indexes.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            let root = self.find(self.parent[x]);
            self.parent[x] = root;
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

/// Partition the nodes into connected components, ignoring edge direction.
///
/// Each component lists its nodes in insertion order; components are ordered
/// by their first (earliest-inserted) node. The union of all components is
/// exactly the node set, and no node appears twice.
pub(super) fn connected_components(inner: &GraphInner) -> Vec<Vec<String>> {
    let ordered: Vec<&str> = inner.nodes_in_order().map(|n| n.id.as_str()).collect();
    let index_of: AHashMap<&str, usize> = ordered
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i))
        .collect();

    let mut uf = UnionFind::new(ordered.len());
    for edge in inner.edges_in_order() {
        let (Some(&a), Some(&b)) = (
            index_of.get(edge.from.as_str()),
            index_of.get(edge.to.as_str()),
        ) else {
            continue; // dangling edge
        };
        uf.union(a, b);
    }

    // Group by root, preserving insertion order within and across components.
    let mut component_of_root: AHashMap<usize, usize> = AHashMap::new();
    let mut components: Vec<Vec<String>> = Vec::new();
    for (i, id) in ordered.iter().enumerate() {
        let root = uf.find(i);
        let slot = *component_of_root.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[slot].push((*id).to_string());
    }
    components
}
