//! Mirror indexed code structure into the graph store.
//!
//! Shape: one `file` node per indexed file, one node per symbol (typed by
//! its kind label), `contains` edges file → symbol, `calls` edges
//! symbol → symbol, and `imports` edges file → symbol. Node and edge ids are
//! derived from stable content so repeated exports upsert instead of
//! duplicating.

use ahash::AHashMap;

use crate::graph::{Edge, GraphStore, Node};
use crate::references::ReferenceKind;
use crate::symbols::{Symbol, SymbolInner};

fn file_node_id(path: &str) -> String {
    format!("file:{path}")
}

fn symbol_node_id(symbol: &Symbol) -> String {
    format!("sym:{}", symbol.symbol_id())
}

fn short_hash(input: &str) -> String {
    blake3::hash(input.as_bytes()).to_hex()[..16].to_string()
}

/// Resolve a name to its declared symbol, preferring the given file.
fn resolve<'a>(
    by_name: &AHashMap<&str, Vec<&'a Symbol>>,
    name: &str,
    prefer_file: &str,
) -> Option<&'a Symbol> {
    let candidates = by_name.get(name)?;
    candidates
        .iter()
        .find(|s| s.file_path == prefer_file)
        .or_else(|| candidates.first())
        .copied()
}

pub(super) fn export_to_graph(inner: &SymbolInner, graph: &GraphStore) {
    // name -> symbols, for call/import resolution
    let mut by_name: AHashMap<&str, Vec<&Symbol>> = AHashMap::new();
    for symbol in inner.symbols.values() {
        by_name.entry(symbol.name.as_str()).or_default().push(symbol);
    }
    for list in by_name.values_mut() {
        list.sort_by(|a, b| {
            a.file_path
                .cmp(&b.file_path)
                .then_with(|| a.line.cmp(&b.line))
        });
    }

    // file and symbol nodes, with contains edges
    let mut paths: Vec<&String> = inner.files.keys().collect();
    paths.sort();
    for path in &paths {
        graph.add_node(Node::new(file_node_id(path), "file").with_property("path", path.as_str()));
    }
    let mut symbols: Vec<&Symbol> = inner.symbols.values().collect();
    symbols.sort_by(|a, b| {
        a.file_path
            .cmp(&b.file_path)
            .then_with(|| a.line.cmp(&b.line))
    });
    for symbol in &symbols {
        let node_id = symbol_node_id(symbol);
        graph.add_node(
            Node::new(node_id.clone(), symbol.kind_name())
                .with_property("name", symbol.name.as_str())
                .with_property("path", symbol.file_path.as_str())
                .with_property("line", symbol.line),
        );
        graph.add_edge(Edge::new(
            format!("contains:{}", symbol.symbol_id()),
            file_node_id(&symbol.file_path),
            node_id,
            "contains",
        ));
    }

    // call edges: caller resolved in its own file, callee anywhere
    for (path, calls) in &inner.calls_by_file {
        for call in calls {
            let Some(caller) = resolve(&by_name, &call.caller, path) else {
                continue;
            };
            let Some(callee) = resolve(&by_name, &call.callee, path) else {
                continue;
            };
            let id = format!(
                "call:{}",
                short_hash(&format!("{path}:{}:{}:{}", call.caller, call.callee, call.line))
            );
            graph.add_edge(Edge::new(id, symbol_node_id(caller), symbol_node_id(callee), "calls"));
        }
    }

    // import edges: file -> imported symbol, when the name resolves
    for (path, references) in &inner.references_by_file {
        for reference in references {
            if reference.kind != ReferenceKind::Import {
                continue;
            }
            let Some(target) = resolve(&by_name, &reference.name, path) else {
                continue;
            };
            let id = format!(
                "import:{}",
                short_hash(&format!("{path}:{}:{}", reference.name, reference.line))
            );
            graph.add_edge(Edge::new(
                id,
                file_node_id(path),
                symbol_node_id(target),
                "imports",
            ));
        }
    }
}
