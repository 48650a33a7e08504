//! Rust symbol extraction using tree-sitter-rust.
//!
//! Extracts functions, methods, structs, enums, traits, modules, type
//! aliases, constants, and variable bindings, plus references, call facts,
//! and trait relations (supertraits, trait impls).

use crate::common::node_text;
use crate::ingest::{fact_from_node, last_component, reference_at, ParsedFile, SymbolKind};
use crate::references::{CallFact, ReferenceKind, TypeRelation, TypeRelationFact};

/// Walk state: enclosing function names (caller attribution) and whether the
/// walk is inside an impl/trait body (method detection).
struct Walk<'a> {
    source: &'a [u8],
    fn_stack: Vec<String>,
    in_type_body: bool,
}

pub(crate) fn extract(tree: &tree_sitter::Tree, source: &[u8]) -> ParsedFile {
    let mut out = ParsedFile::default();
    let mut walk = Walk {
        source,
        fn_stack: Vec::new(),
        in_type_body: false,
    };
    visit(&tree.root_node(), &mut walk, &mut out);
    out
}

fn visit(node: &tree_sitter::Node, walk: &mut Walk, out: &mut ParsedFile) {
    match node.kind() {
        "function_item" | "function_signature_item" => {
            let name = field_text(node, "name", walk.source).unwrap_or_default();
            if !name.is_empty() {
                let kind = if walk.in_type_body {
                    SymbolKind::Method
                } else {
                    SymbolKind::Function
                };
                let return_type = field_text(node, "return_type", walk.source).unwrap_or_default();
                out.symbols
                    .push(fact_from_node(node, name.clone(), kind, return_type));
            }
            walk.fn_stack.push(name);
            visit_children(node, walk, out);
            walk.fn_stack.pop();
            return;
        }
        "struct_item" => {
            push_named(node, SymbolKind::Struct, walk, out);
        }
        "enum_item" => {
            push_named(node, SymbolKind::Enum, walk, out);
        }
        "union_item" => {
            push_named(node, SymbolKind::Struct, walk, out);
        }
        "trait_item" => {
            if let Some(name) = field_text(node, "name", walk.source) {
                out.symbols
                    .push(fact_from_node(node, name.clone(), SymbolKind::Trait, String::new()));
                // supertraits: `trait A: B + C`
                for bound in named_children(node) {
                    if bound.kind() == "trait_bounds" {
                        for parent in type_names(&bound, walk.source) {
                            out.relations.push(TypeRelationFact {
                                child: name.clone(),
                                parent,
                                relation: TypeRelation::Extends,
                            });
                        }
                    }
                }
                let was = walk.in_type_body;
                walk.in_type_body = true;
                visit_children(node, walk, out);
                walk.in_type_body = was;
                return;
            }
        }
        "impl_item" => {
            // `impl Trait for Type` records an implements relation
            let type_name = field_text(node, "type", walk.source).map(strip_generics);
            if let (Some(trait_name), Some(type_name)) = (
                field_text(node, "trait", walk.source).map(strip_generics),
                type_name.clone(),
            ) {
                out.relations.push(TypeRelationFact {
                    child: type_name,
                    parent: trait_name,
                    relation: TypeRelation::Implements,
                });
            }
            let was = walk.in_type_body;
            walk.in_type_body = true;
            visit_children(node, walk, out);
            walk.in_type_body = was;
            return;
        }
        "mod_item" => {
            push_named(node, SymbolKind::Module, walk, out);
        }
        "type_item" => {
            if let Some(name) = field_text(node, "name", walk.source) {
                let aliased = field_text(node, "type", walk.source).unwrap_or_default();
                out.symbols
                    .push(fact_from_node(node, name, SymbolKind::TypeAlias, aliased));
            }
        }
        "const_item" | "static_item" => {
            if let Some(name) = field_text(node, "name", walk.source) {
                let type_text = field_text(node, "type", walk.source).unwrap_or_default();
                out.symbols
                    .push(fact_from_node(node, name, SymbolKind::Constant, type_text));
            }
        }
        "let_declaration" => {
            // only simple `let name[: T]` patterns become variable symbols
            if let Some(pattern) = node.child_by_field_name("pattern") {
                if pattern.kind() == "identifier" {
                    if let Some(name) = node_text(&pattern, walk.source) {
                        let type_text =
                            field_text(node, "type", walk.source).unwrap_or_default();
                        out.symbols.push(fact_from_node(
                            node,
                            name.to_string(),
                            SymbolKind::Variable,
                            type_text,
                        ));
                    }
                }
            }
            // the initializer expression may still reference symbols
            if let Some(value) = node.child_by_field_name("value") {
                visit(&value, walk, out);
            }
            return;
        }
        "use_declaration" => {
            collect_imports(node, walk.source, out);
            return;
        }
        "call_expression" => {
            if let Some(function) = node.child_by_field_name("function") {
                if let Some(callee) = callee_name(&function, walk.source) {
                    out.calls.push(CallFact {
                        caller: walk.fn_stack.last().cloned().unwrap_or_default(),
                        callee: callee.clone(),
                        line: node.start_position().row + 1,
                        column: node.start_position().column + 1,
                    });
                    out.references
                        .push(reference_at(&function, &callee, ReferenceKind::Call));
                    // a method call's receiver is still an expression to walk
                    if function.kind() == "field_expression" {
                        if let Some(value) = function.child_by_field_name("value") {
                            visit(&value, walk, out);
                        }
                    }
                } else {
                    visit(&function, walk, out);
                }
                if let Some(args) = node.child_by_field_name("arguments") {
                    visit_children(&args, walk, out);
                }
                return;
            }
        }
        "assignment_expression" | "compound_assignment_expr" => {
            if let Some(left) = node.child_by_field_name("left") {
                if left.kind() == "identifier" {
                    if let Some(name) = node_text(&left, walk.source) {
                        out.references.push(reference_at(&left, name, ReferenceKind::Write));
                    }
                }
            }
            if let Some(right) = node.child_by_field_name("right") {
                visit(&right, walk, out);
            }
            return;
        }
        "scoped_identifier" => {
            if let Some(text) = node_text(node, walk.source) {
                let name = last_component(text);
                out.references.push(reference_at(node, name, ReferenceKind::Read));
            }
            return; // children already covered by the qualified name
        }
        "identifier" | "type_identifier" => {
            if !is_declaration_name(node) {
                if let Some(name) = node_text(node, walk.source) {
                    out.references.push(reference_at(node, name, ReferenceKind::Read));
                }
            }
            return;
        }
        _ => {}
    }
    visit_children(node, walk, out);
}

fn visit_children(node: &tree_sitter::Node, walk: &mut Walk, out: &mut ParsedFile) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(&child, walk, out);
    }
}

fn push_named(node: &tree_sitter::Node, kind: SymbolKind, walk: &Walk, out: &mut ParsedFile) {
    if let Some(name) = field_text(node, "name", walk.source) {
        out.symbols
            .push(fact_from_node(node, name, kind, String::new()));
    }
}

fn field_text(node: &tree_sitter::Node, field: &str, source: &[u8]) -> Option<String> {
    let child = node.child_by_field_name(field)?;
    node_text(&child, source).map(|s| s.to_string())
}

fn named_children<'t>(node: &tree_sitter::Node<'t>) -> Vec<tree_sitter::Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Drop a trailing generic argument list: `Vec<T>` → `Vec`.
fn strip_generics(text: String) -> String {
    match text.find('<') {
        Some(pos) => text[..pos].to_string(),
        None => text,
    }
}

/// Type names inside a bounds/base list node.
fn type_names(node: &tree_sitter::Node, source: &[u8]) -> Vec<String> {
    named_children(node)
        .iter()
        .filter(|c| matches!(c.kind(), "type_identifier" | "scoped_type_identifier" | "generic_type"))
        .filter_map(|c| node_text(c, source))
        .map(|t| strip_generics(last_component(t).to_string()))
        .collect()
}

/// Resolve the called name from a call expression's function child.
fn callee_name(function: &tree_sitter::Node, source: &[u8]) -> Option<String> {
    match function.kind() {
        "identifier" => node_text(function, source).map(|s| s.to_string()),
        "scoped_identifier" => {
            node_text(function, source).map(|t| last_component(t).to_string())
        }
        "field_expression" => {
            let field = function.child_by_field_name("field")?;
            node_text(&field, source).map(|s| s.to_string())
        }
        "generic_function" => {
            let inner = function.child_by_field_name("function")?;
            callee_name(&inner, source)
        }
        _ => None,
    }
}

/// True when this identifier is the *name* of a declaration, not a use.
fn is_declaration_name(node: &tree_sitter::Node) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    let declares = matches!(
        parent.kind(),
        "function_item"
            | "function_signature_item"
            | "struct_item"
            | "enum_item"
            | "union_item"
            | "trait_item"
            | "mod_item"
            | "type_item"
            | "const_item"
            | "static_item"
            | "enum_variant"
            | "field_declaration"
            | "type_parameters"
            | "parameter"
            | "closure_parameters"
    );
    if !declares {
        return false;
    }
    match parent.child_by_field_name("name") {
        Some(name) => name == *node,
        // parameters declare via their pattern; type annotations stay references
        None => match parent.kind() {
            "parameter" => parent
                .child_by_field_name("pattern")
                .map(|p| p == *node)
                .unwrap_or(false),
            "closure_parameters" | "type_parameters" => true,
            _ => false,
        },
    }
}

/// Record `use` declarations as import references, one per imported name.
fn collect_imports(node: &tree_sitter::Node, source: &[u8], out: &mut ParsedFile) {
    fn recurse(node: &tree_sitter::Node, source: &[u8], out: &mut ParsedFile) {
        match node.kind() {
            "identifier" => {
                if let Some(name) = node_text(node, source) {
                    out.references.push(reference_at(node, name, ReferenceKind::Import));
                }
            }
            "scoped_identifier" => {
                if let Some(text) = node_text(node, source) {
                    let name = last_component(text);
                    out.references.push(reference_at(node, name, ReferenceKind::Import));
                }
            }
            "use_as_clause" => {
                // `use a::b as c` imports the alias name
                if let Some(alias) = node.child_by_field_name("alias") {
                    if let Some(name) = node_text(&alias, source) {
                        out.references
                            .push(reference_at(&alias, name, ReferenceKind::Import));
                    }
                }
            }
            "scoped_use_list" | "use_list" | "use_wildcard" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    recurse(&child, source, out);
                }
            }
            _ => {}
        }
    }
    if let Some(argument) = node.child_by_field_name("argument") {
        recurse(&argument, source, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{parse_source, Language};
    use std::path::Path;

    fn parse(source: &str) -> ParsedFile {
        parse_source(Language::Rust, Path::new("test.rs"), source.as_bytes()).unwrap()
    }

    #[test]
    fn extracts_function_and_struct() {
        let parsed = parse("pub struct Point { x: i32 }\n\nfn length(p: &Point) -> f64 { 0.0 }\n");
        let names: Vec<_> = parsed.symbols.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"Point"));
        assert!(names.contains(&"length"));

        let length = parsed.symbols.iter().find(|s| s.name == "length").unwrap();
        assert_eq!(length.kind, SymbolKind::Function);
        assert_eq!(length.type_text, "f64");
        assert_eq!(length.line, 3);
        assert_eq!(length.column, 1);
    }

    #[test]
    fn methods_in_impl_blocks() {
        let parsed = parse("struct A;\nimpl A {\n    fn go(&self) {}\n}\n");
        let go = parsed.symbols.iter().find(|s| s.name == "go").unwrap();
        assert_eq!(go.kind, SymbolKind::Method);
    }

    #[test]
    fn trait_impl_records_implements_relation() {
        let parsed = parse("trait Render {}\nstruct Page;\nimpl Render for Page {}\n");
        assert!(parsed.relations.iter().any(|r| {
            r.child == "Page" && r.parent == "Render" && r.relation == TypeRelation::Implements
        }));
    }

    #[test]
    fn supertraits_record_extends_relations() {
        let parsed = parse("trait Draw: Render + Clone {}\n");
        let parents: Vec<_> = parsed
            .relations
            .iter()
            .filter(|r| r.child == "Draw" && r.relation == TypeRelation::Extends)
            .map(|r| r.parent.as_str())
            .collect();
        assert!(parents.contains(&"Render"));
        assert!(parents.contains(&"Clone"));
    }

    #[test]
    fn calls_attribute_their_enclosing_function() {
        let parsed = parse("fn main() { helper(); }\nfn helper() {}\n");
        let call = parsed.calls.iter().find(|c| c.callee == "helper").unwrap();
        assert_eq!(call.caller, "main");
        assert_eq!(call.line, 1);
    }

    #[test]
    fn use_declarations_become_import_references() {
        let parsed = parse("use std::collections::HashMap;\nuse serde::{Serialize, Deserialize};\n");
        let imports: Vec<_> = parsed
            .references
            .iter()
            .filter(|r| r.kind == ReferenceKind::Import)
            .map(|r| r.name.as_str())
            .collect();
        assert!(imports.contains(&"HashMap"));
        assert!(imports.contains(&"Serialize"));
        assert!(imports.contains(&"Deserialize"));
    }

    #[test]
    fn declaration_names_are_not_references() {
        let parsed = parse("fn alpha() {}\n");
        assert!(parsed
            .references
            .iter()
            .all(|r| r.name != "alpha" || r.kind != ReferenceKind::Read));
    }

    #[test]
    fn constants_carry_their_type_text() {
        let parsed = parse("const LIMIT: usize = 10;\n");
        let limit = parsed.symbols.iter().find(|s| s.name == "LIMIT").unwrap();
        assert_eq!(limit.kind, SymbolKind::Constant);
        assert_eq!(limit.type_text, "usize");
    }
}
