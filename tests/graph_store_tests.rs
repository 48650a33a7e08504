//! Integration tests for the graph store operation set.

use sextant::{Direction, Edge, GraphStore, Node, NodeFilter};

#[test]
fn import_scenario_end_to_end() {
    // two files, one import edge; the outbound-connected query returns the
    // importing file and stats report both sides
    let graph = GraphStore::new();
    graph.add_node(Node::new("a", "file"));
    graph.add_node(Node::new("b", "file"));
    graph.add_edge(Edge::new("e1", "a", "b", "imports"));

    let importers = graph
        .query_nodes(&NodeFilter::any().with_connected("imports", Direction::Out))
        .unwrap();
    assert_eq!(importers.len(), 1);
    assert_eq!(importers[0].id, "a");

    let stats = graph.stats();
    assert_eq!(stats.nodes, 2);
    assert_eq!(stats.edges, 1);
}

#[test]
fn shortest_path_beats_longer_alternatives() {
    let graph = GraphStore::new();
    for id in ["a", "b", "c"] {
        graph.add_node(Node::new(id, "module"));
    }
    graph.add_edge(Edge::new("ab", "a", "b", "calls"));
    graph.add_edge(Edge::new("bc", "b", "c", "calls"));
    graph.add_edge(Edge::new("ac", "a", "c", "calls"));

    assert_eq!(graph.find_path("a", "c", None).unwrap(), vec!["a", "c"]);
}

#[test]
fn depth_bound_blocks_long_chains() {
    let graph = GraphStore::new();
    let ids: Vec<String> = (0..6).map(|i| format!("n{i}")).collect();
    for id in &ids {
        graph.add_node(Node::new(id.clone(), "module"));
    }
    for window in ids.windows(2) {
        graph.add_edge(Edge::new(
            format!("{}-{}", window[0], window[1]),
            window[0].clone(),
            window[1].clone(),
            "calls",
        ));
    }

    // five hops, bound of two
    assert!(graph.find_path("n0", "n5", Some(2)).is_none());
    assert!(graph.find_path("n0", "n5", Some(5)).is_some());
}

#[test]
fn components_cover_every_node_exactly_once() {
    let graph = GraphStore::new();
    for i in 0..10 {
        graph.add_node(Node::new(format!("n{i}"), "file"));
    }
    // pair them up: n0-n1, n2-n3, ...
    for i in (0..10).step_by(2) {
        graph.add_edge(Edge::new(
            format!("e{i}"),
            format!("n{i}"),
            format!("n{}", i + 1),
            "link",
        ));
    }

    let components = graph.connected_components();
    assert_eq!(components.len(), 5);

    let mut seen: Vec<String> = components.into_iter().flatten().collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 10);
}

#[test]
fn queries_on_missing_ids_yield_empty_results() {
    let graph = GraphStore::new();
    assert!(graph.get_node("nope").is_none());
    assert!(graph.find_path("nope", "also-nope", None).is_none());
    assert!(graph
        .query_nodes(&NodeFilter::by_type("ghost"))
        .unwrap()
        .is_empty());
}

#[test]
fn clear_is_scoped_to_the_graph() {
    let graph = GraphStore::new();
    graph.add_node(Node::new("a", "file"));
    graph.clear();
    assert_eq!(graph.stats().nodes, 0);

    // clearing a fresh graph is harmless
    graph.clear();
    assert_eq!(graph.stats().nodes, 0);
}
