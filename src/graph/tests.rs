//! Unit tests for the graph store.

use super::*;

fn simple_chain() -> GraphStore {
    // a -> b -> c plus a direct a -> c shortcut
    let graph = GraphStore::new();
    for id in ["a", "b", "c"] {
        graph.add_node(Node::new(id, "file"));
    }
    graph.add_edge(Edge::new("e1", "a", "b", "imports"));
    graph.add_edge(Edge::new("e2", "b", "c", "imports"));
    graph.add_edge(Edge::new("e3", "a", "c", "imports"));
    graph
}

#[test]
fn add_node_overwrites_but_preserves_edges() {
    let graph = simple_chain();
    graph.add_node(Node::new("a", "module").with_property("lang", "rust"));

    let node = graph.get_node("a").unwrap();
    assert_eq!(node.node_type, "module");
    assert_eq!(node.properties["lang"], "rust");

    // edges survived the overwrite
    assert!(graph.find_path("a", "b", None).is_some());

    // insertion order is preserved: "a" still comes first
    let all = graph.query_nodes(&NodeFilter::any()).unwrap();
    assert_eq!(all[0].id, "a");
}

#[test]
fn query_nodes_conjunctive_match() {
    let graph = GraphStore::new();
    graph.add_node(Node::new("f1", "function").with_property("lang", "rust"));
    graph.add_node(Node::new("f2", "function").with_property("lang", "python"));
    graph.add_node(Node::new("c1", "class").with_property("lang", "rust"));

    let filter = NodeFilter::by_type("function").with_property("lang", "rust");
    let results = graph.query_nodes(&filter).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "f1");
}

#[test]
fn query_nodes_connected_direction() {
    let graph = GraphStore::new();
    graph.add_node(Node::new("a", "file"));
    graph.add_node(Node::new("b", "file"));
    graph.add_edge(Edge::new("e1", "a", "b", "imports"));

    let out = graph
        .query_nodes(&NodeFilter::any().with_connected("imports", Direction::Out))
        .unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, "a");

    let inc = graph
        .query_nodes(&NodeFilter::any().with_connected("imports", Direction::In))
        .unwrap();
    assert_eq!(inc.len(), 1);
    assert_eq!(inc[0].id, "b");

    let both = graph
        .query_nodes(&NodeFilter::any().with_connected("imports", Direction::Both))
        .unwrap();
    assert_eq!(both.len(), 2);
}

#[test]
fn query_rejects_malformed_filter() {
    let graph = GraphStore::new();
    let filter = NodeFilter::any().with_connected("", Direction::Out);
    assert!(matches!(
        graph.query_nodes(&filter),
        Err(crate::error::IndexError::Validation(_))
    ));
}

#[test]
fn find_path_prefers_shortest() {
    let graph = simple_chain();
    // e3 (a -> c) beats the two-hop a -> b -> c
    let path = graph.find_path("a", "c", None).unwrap();
    assert_eq!(path, vec!["a", "c"]);
}

#[test]
fn find_path_respects_depth_bound() {
    let graph = GraphStore::new();
    for id in ["n0", "n1", "n2", "n3", "n4", "n5"] {
        graph.add_node(Node::new(id, "file"));
    }
    for i in 0..5 {
        graph.add_edge(Edge::new(
            format!("e{i}"),
            format!("n{i}"),
            format!("n{}", i + 1),
            "next",
        ));
    }

    assert!(graph.find_path("n0", "n5", Some(2)).is_none());
    let path = graph.find_path("n0", "n5", Some(5)).unwrap();
    assert_eq!(path.len(), 6);
}

#[test]
fn find_path_missing_endpoints_is_none() {
    let graph = simple_chain();
    assert!(graph.find_path("a", "zzz", None).is_none());
    assert!(graph.find_path("zzz", "a", None).is_none());
}

#[test]
fn find_path_self_is_single_node() {
    let graph = simple_chain();
    assert_eq!(graph.find_path("a", "a", None).unwrap(), vec!["a"]);
}

#[test]
fn find_path_is_directed() {
    let graph = simple_chain();
    assert!(graph.find_path("c", "a", None).is_none());
}

#[test]
fn dangling_edges_are_kept_but_not_traversed() {
    let graph = GraphStore::new();
    graph.add_node(Node::new("a", "file"));
    graph.add_node(Node::new("b", "file"));
    graph.add_edge(Edge::new("e1", "a", "ghost", "imports"));
    graph.add_edge(Edge::new("e2", "ghost", "b", "imports"));

    // retained and counted
    let stats = graph.stats();
    assert_eq!(stats.edges, 2);
    assert_eq!(stats.dangling_edges, 2);

    // excluded from traversal
    assert!(graph.find_path("a", "b", None).is_none());

    // excluded from components: a and b stay separate
    assert_eq!(graph.connected_components().len(), 2);
}

#[test]
fn components_partition_the_node_set() {
    let graph = GraphStore::new();
    for id in ["a", "b", "c", "d", "e"] {
        graph.add_node(Node::new(id, "file"));
    }
    graph.add_edge(Edge::new("e1", "a", "b", "imports"));
    graph.add_edge(Edge::new("e2", "c", "b", "imports")); // direction ignored
    graph.add_edge(Edge::new("e3", "d", "e", "imports"));

    let components = graph.connected_components();
    assert_eq!(components.len(), 2);
    assert_eq!(components[0], vec!["a", "b", "c"]);
    assert_eq!(components[1], vec!["d", "e"]);

    let total: usize = components.iter().map(Vec::len).sum();
    assert_eq!(total, 5);
}

#[test]
fn stats_per_type_breakdowns() {
    let graph = GraphStore::new();
    graph.add_node(Node::new("a", "file"));
    graph.add_node(Node::new("b", "file"));
    graph.add_node(Node::new("f", "function"));
    graph.add_edge(Edge::new("e1", "a", "b", "imports"));
    graph.add_edge(Edge::new("e2", "a", "f", "contains"));

    let stats = graph.stats();
    assert_eq!(stats.nodes, 3);
    assert_eq!(stats.edges, 2);
    assert_eq!(stats.node_types["file"], 2);
    assert_eq!(stats.node_types["function"], 1);
    assert_eq!(stats.edge_types["imports"], 1);
    assert_eq!(stats.dangling_edges, 0);
}

#[test]
fn clear_drops_everything() {
    let graph = simple_chain();
    graph.clear();
    let stats = graph.stats();
    assert_eq!(stats.nodes, 0);
    assert_eq!(stats.edges, 0);
    assert!(graph.get_node("a").is_none());
}

#[test]
fn edge_overwrite_reattaches_endpoints() {
    let graph = GraphStore::new();
    for id in ["a", "b", "c"] {
        graph.add_node(Node::new(id, "file"));
    }
    graph.add_edge(Edge::new("e1", "a", "b", "imports"));
    graph.add_edge(Edge::new("e1", "a", "c", "imports"));

    let stats = graph.stats();
    assert_eq!(stats.edges, 1);
    assert_eq!(graph.find_path("a", "c", None).unwrap(), vec!["a", "c"]);
    assert!(graph.find_path("a", "b", None).is_none());
}
