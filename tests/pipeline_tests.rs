//! Cross-store integration: index a directory, mirror it into the graph,
//! and embed file contents for semantic search — the caller-composed
//! pipeline the three stores are designed for.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use sextant::{
    Direction, GraphStore, NodeFilter, Properties, SearchOptions, SymbolIndex,
    VectorSearchOptions, VectorStore,
};

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn fixture() -> TempDir {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "auth.rs",
        "pub fn authenticate(token: &str) -> bool {\n    validate_token(token)\n}\n\nfn validate_token(token: &str) -> bool {\n    !token.is_empty()\n}\n",
    );
    write(
        temp.path(),
        "db.rs",
        "pub struct Connection;\n\npub fn connect(url: &str) -> Connection {\n    Connection\n}\n",
    );
    temp
}

#[test]
fn symbols_graph_and_vectors_compose() {
    let temp = fixture();

    // 1. symbol extraction
    let index = SymbolIndex::default();
    let report = index.index_directory(temp.path()).unwrap();
    assert_eq!(report.files_indexed, 2);

    // 2. mirror into the graph
    let graph = GraphStore::new();
    index.export_to_graph(&graph);

    let stats = graph.stats();
    assert_eq!(stats.node_types["file"], 2);
    assert!(stats.edge_types["contains"] >= 4);

    // the call edge authenticate -> validate_token is traversable
    let callers = graph
        .query_nodes(
            &NodeFilter::by_type("function")
                .with_property("name", "authenticate")
                .with_connected("calls", Direction::Out),
        )
        .unwrap();
    assert_eq!(callers.len(), 1);

    // 3. embed file contents, independently of the other stores
    let vectors = VectorStore::with_hashing_embedder();
    for entry in fs::read_dir(temp.path()).unwrap() {
        let path = entry.unwrap().path();
        let content = fs::read_to_string(&path).unwrap();
        let mut metadata = Properties::new();
        metadata.insert(
            "path".to_string(),
            path.to_string_lossy().to_string().into(),
        );
        vectors.add_document(&content, metadata).unwrap();
    }

    let hits = vectors
        .search("authenticate token", &VectorSearchOptions::default())
        .unwrap();
    assert!(!hits.is_empty());
    assert!(hits[0].content.contains("authenticate"));

    // 4. clears are independent per store
    graph.clear();
    assert_eq!(graph.stats().nodes, 0);
    assert_eq!(index.get_stats().files, 2);
    assert_eq!(vectors.get_stats().documents, 2);
}

#[test]
fn references_resolve_across_files() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "lib.rs", "pub fn shared_util() {}\n");
    write(
        temp.path(),
        "main.rs",
        "fn main() {\n    shared_util();\n}\n",
    );

    let index = SymbolIndex::default();
    index.index_directory(temp.path()).unwrap();

    let refs = index.find_references("shared_util", None);
    assert_eq!(refs.len(), 1);
    assert!(refs[0].file_path.ends_with("main.rs"));
    assert_eq!(refs[0].line, 2);
}

#[test]
fn stores_share_safely_across_threads() {
    let temp = fixture();
    let index = std::sync::Arc::new(SymbolIndex::default());
    index.index_directory(temp.path()).unwrap();

    // concurrent readers while a writer re-indexes
    let mut handles = Vec::new();
    for _ in 0..4 {
        let index = std::sync::Arc::clone(&index);
        handles.push(std::thread::spawn(move || {
            for _ in 0..50 {
                let results = index.search_symbols("connect", &SearchOptions::default());
                // the symbol is either fully present or (mid-rewrite) fully
                // replaced; a half-applied file is never observable
                assert!(results.len() <= 1);
            }
        }));
    }
    let writer = {
        let index = std::sync::Arc::clone(&index);
        let path = temp.path().to_path_buf();
        std::thread::spawn(move || {
            for _ in 0..10 {
                index.index_directory(&path).unwrap();
            }
        })
    };
    for handle in handles {
        handle.join().unwrap();
    }
    writer.join().unwrap();

    assert_eq!(index.get_stats().files, 2);
}
