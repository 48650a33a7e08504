//! JavaScript symbol extraction using tree-sitter-javascript.
//!
//! Extracts functions, classes, methods, and top-level bindings (including
//! functions assigned to `const`), plus references, call facts, and
//! `extends` relations.

use crate::common::node_text;
use crate::ingest::{fact_from_node, last_component, reference_at, ParsedFile, SymbolKind};
use crate::references::{CallFact, ReferenceKind, TypeRelation, TypeRelationFact};

struct Walk<'a> {
    source: &'a [u8],
    fn_stack: Vec<String>,
}

pub(crate) fn extract(tree: &tree_sitter::Tree, source: &[u8]) -> ParsedFile {
    let mut out = ParsedFile::default();
    let mut walk = Walk {
        source,
        fn_stack: Vec::new(),
    };
    visit(&tree.root_node(), &mut walk, &mut out);
    out
}

fn visit(node: &tree_sitter::Node, walk: &mut Walk, out: &mut ParsedFile) {
    match node.kind() {
        "function_declaration" | "generator_function_declaration" => {
            let name = field_text(node, "name", walk.source).unwrap_or_default();
            if !name.is_empty() {
                out.symbols.push(fact_from_node(
                    node,
                    name.clone(),
                    SymbolKind::Function,
                    String::new(),
                ));
            }
            walk.fn_stack.push(name);
            visit_children(node, walk, out);
            walk.fn_stack.pop();
            return;
        }
        "method_definition" => {
            let name = field_text(node, "name", walk.source).unwrap_or_default();
            if !name.is_empty() {
                out.symbols.push(fact_from_node(
                    node,
                    name.clone(),
                    SymbolKind::Method,
                    String::new(),
                ));
            }
            walk.fn_stack.push(name);
            visit_children(node, walk, out);
            walk.fn_stack.pop();
            return;
        }
        "class_declaration" | "class" => {
            if let Some(name) = field_text(node, "name", walk.source) {
                out.symbols
                    .push(fact_from_node(node, name.clone(), SymbolKind::Class, String::new()));
                collect_heritage(node, &name, walk.source, out);
                visit_children(node, walk, out);
                return;
            }
        }
        "variable_declarator" => {
            if let Some(name_node) = node.child_by_field_name("name") {
                if name_node.kind() == "identifier" {
                    if let Some(name) = node_text(&name_node, walk.source) {
                        let value = node.child_by_field_name("value");
                        let value_kind = value.as_ref().map(|v| v.kind()).unwrap_or("");
                        let kind = if matches!(
                            value_kind,
                            "arrow_function" | "function_expression" | "function"
                        ) {
                            SymbolKind::Function
                        } else if declared_with_const(node) {
                            SymbolKind::Constant
                        } else {
                            SymbolKind::Variable
                        };
                        out.symbols.push(fact_from_node(
                            node,
                            name.to_string(),
                            kind,
                            String::new(),
                        ));
                        if let Some(value) = value {
                            if kind == SymbolKind::Function {
                                walk.fn_stack.push(name.to_string());
                                visit(&value, walk, out);
                                walk.fn_stack.pop();
                            } else {
                                visit(&value, walk, out);
                            }
                        }
                        return;
                    }
                }
            }
        }
        "import_statement" => {
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
                    if function.kind() == "member_expression" {
                        if let Some(object) = function.child_by_field_name("object") {
                            visit(&object, walk, out);
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
        "assignment_expression" | "augmented_assignment_expression" => {
            if let Some(left) = node.child_by_field_name("left") {
                if left.kind() == "identifier" {
                    if let Some(name) = node_text(&left, walk.source) {
                        out.references.push(reference_at(&left, name, ReferenceKind::Write));
                    }
                } else {
                    visit(&left, walk, out);
                }
            }
            if let Some(right) = node.child_by_field_name("right") {
                visit(&right, walk, out);
            }
            return;
        }
        "identifier" => {
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

fn field_text(node: &tree_sitter::Node, field: &str, source: &[u8]) -> Option<String> {
    let child = node.child_by_field_name(field)?;
    node_text(&child, source).map(|s| s.to_string())
}

/// Whether a declarator belongs to a `const` declaration.
fn declared_with_const(node: &tree_sitter::Node) -> bool {
    node.parent()
        .filter(|p| p.kind() == "lexical_declaration")
        .and_then(|p| p.child(0))
        .map(|kw| kw.kind() == "const")
        .unwrap_or(false)
}

/// `class A extends B` heritage clauses become extends facts.
fn collect_heritage(
    node: &tree_sitter::Node,
    class_name: &str,
    source: &[u8],
    out: &mut ParsedFile,
) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "class_heritage" {
            continue;
        }
        let mut inner = child.walk();
        for base in child.named_children(&mut inner) {
            if matches!(base.kind(), "identifier" | "member_expression") {
                if let Some(text) = node_text(&base, source) {
                    out.relations.push(TypeRelationFact {
                        child: class_name.to_string(),
                        parent: last_component(text).to_string(),
                        relation: TypeRelation::Extends,
                    });
                }
            }
        }
    }
}

fn callee_name(function: &tree_sitter::Node, source: &[u8]) -> Option<String> {
    match function.kind() {
        "identifier" => node_text(function, source).map(|s| s.to_string()),
        "member_expression" => {
            let property = function.child_by_field_name("property")?;
            node_text(&property, source).map(|s| s.to_string())
        }
        _ => None,
    }
}

fn is_declaration_name(node: &tree_sitter::Node) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    match parent.kind() {
        "function_declaration"
        | "generator_function_declaration"
        | "class_declaration"
        | "method_definition"
        | "variable_declarator" => parent
            .child_by_field_name("name")
            .map(|n| n == *node)
            .unwrap_or(false),
        "formal_parameters" | "required_parameter" | "optional_parameter" => true,
        _ => false,
    }
}

/// `import x from "m"` / `import { a, b as c } from "m"` become import refs.
fn collect_imports(node: &tree_sitter::Node, source: &[u8], out: &mut ParsedFile) {
    fn recurse(node: &tree_sitter::Node, source: &[u8], out: &mut ParsedFile) {
        match node.kind() {
            "identifier" => {
                if let Some(name) = node_text(node, source) {
                    out.references.push(reference_at(node, name, ReferenceKind::Import));
                }
            }
            "import_specifier" => {
                // alias wins over the exported name when present
                let target = node
                    .child_by_field_name("alias")
                    .or_else(|| node.child_by_field_name("name"));
                if let Some(target) = target {
                    if let Some(name) = node_text(&target, source) {
                        out.references
                            .push(reference_at(&target, name, ReferenceKind::Import));
                    }
                }
            }
            "import_clause" | "named_imports" | "namespace_import" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    recurse(&child, source, out);
                }
            }
            _ => {}
        }
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        recurse(&child, source, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{parse_source, Language};
    use std::path::Path;

    fn parse(source: &str) -> ParsedFile {
        parse_source(Language::JavaScript, Path::new("test.js"), source.as_bytes()).unwrap()
    }

    #[test]
    fn extracts_functions_classes_and_methods() {
        let parsed = parse("class Cart {\n  total() { return 0; }\n}\nfunction checkout() {}\n");
        let cart = parsed.symbols.iter().find(|s| s.name == "Cart").unwrap();
        assert_eq!(cart.kind, SymbolKind::Class);
        let total = parsed.symbols.iter().find(|s| s.name == "total").unwrap();
        assert_eq!(total.kind, SymbolKind::Method);
        let checkout = parsed.symbols.iter().find(|s| s.name == "checkout").unwrap();
        assert_eq!(checkout.kind, SymbolKind::Function);
    }

    #[test]
    fn arrow_functions_bound_to_const_are_functions() {
        let parsed = parse("const render = (props) => props.name;\nconst LIMIT = 10;\nlet count = 0;\n");
        let render = parsed.symbols.iter().find(|s| s.name == "render").unwrap();
        assert_eq!(render.kind, SymbolKind::Function);
        let limit = parsed.symbols.iter().find(|s| s.name == "LIMIT").unwrap();
        assert_eq!(limit.kind, SymbolKind::Constant);
        let count = parsed.symbols.iter().find(|s| s.name == "count").unwrap();
        assert_eq!(count.kind, SymbolKind::Variable);
    }

    #[test]
    fn extends_clause_becomes_relation() {
        let parsed = parse("class Admin extends User {}\n");
        assert!(parsed.relations.iter().any(|r| {
            r.child == "Admin" && r.parent == "User" && r.relation == TypeRelation::Extends
        }));
    }

    #[test]
    fn imports_and_calls_are_recorded() {
        let parsed = parse("import { render, hydrate as boot } from 'ui';\nfunction main() { render(); }\n");
        let imports: Vec<_> = parsed
            .references
            .iter()
            .filter(|r| r.kind == ReferenceKind::Import)
            .map(|r| r.name.as_str())
            .collect();
        assert!(imports.contains(&"render"));
        assert!(imports.contains(&"boot"));

        let call = parsed.calls.iter().find(|c| c.callee == "render").unwrap();
        assert_eq!(call.caller, "main");
    }
}
