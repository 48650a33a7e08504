//! Python symbol extraction using tree-sitter-python.
//!
//! Extracts functions, methods, classes, and module-level bindings, plus
//! references, call facts, and class-base relations.

use crate::common::node_text;
use crate::ingest::{fact_from_node, last_component, reference_at, ParsedFile, SymbolKind};
use crate::references::{CallFact, ReferenceKind, TypeRelation, TypeRelationFact};

struct Walk<'a> {
    source: &'a [u8],
    fn_stack: Vec<String>,
    class_depth: usize,
}

pub(crate) fn extract(tree: &tree_sitter::Tree, source: &[u8]) -> ParsedFile {
    let mut out = ParsedFile::default();
    let mut walk = Walk {
        source,
        fn_stack: Vec::new(),
        class_depth: 0,
    };
    visit(&tree.root_node(), &mut walk, &mut out);
    out
}

fn visit(node: &tree_sitter::Node, walk: &mut Walk, out: &mut ParsedFile) {
    match node.kind() {
        "function_definition" => {
            let name = field_text(node, "name", walk.source).unwrap_or_default();
            if !name.is_empty() {
                let kind = if walk.class_depth > 0 {
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
        "class_definition" => {
            if let Some(name) = field_text(node, "name", walk.source) {
                out.symbols
                    .push(fact_from_node(node, name.clone(), SymbolKind::Class, String::new()));
                // `class Child(Base, mixin.Other):` bases become extends facts
                if let Some(superclasses) = node.child_by_field_name("superclasses") {
                    let mut cursor = superclasses.walk();
                    for base in superclasses.named_children(&mut cursor) {
                        if matches!(base.kind(), "identifier" | "attribute") {
                            if let Some(text) = node_text(&base, walk.source) {
                                out.relations.push(TypeRelationFact {
                                    child: name.clone(),
                                    parent: last_component(text).to_string(),
                                    relation: TypeRelation::Extends,
                                });
                            }
                        }
                    }
                }
                walk.class_depth += 1;
                visit_children(node, walk, out);
                walk.class_depth -= 1;
                return;
            }
        }
        "assignment" => {
            // module/class-level bindings become variable symbols; ALL_CAPS
            // names follow the constant convention
            if let Some(left) = node.child_by_field_name("left") {
                if left.kind() == "identifier" && walk.fn_stack.is_empty() {
                    if let Some(name) = node_text(&left, walk.source) {
                        let kind = if is_const_name(name) {
                            SymbolKind::Constant
                        } else {
                            SymbolKind::Variable
                        };
                        let type_text = field_text(node, "type", walk.source).unwrap_or_default();
                        out.symbols
                            .push(fact_from_node(node, name.to_string(), kind, type_text));
                    }
                } else if left.kind() == "identifier" {
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
        "import_statement" | "import_from_statement" => {
            collect_imports(node, walk.source, out);
            return;
        }
        "call" => {
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
                    if function.kind() == "attribute" {
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

/// PEP 8 constant convention: all-caps with underscores/digits.
fn is_const_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c == '_' || c.is_ascii_digit())
}

fn callee_name(function: &tree_sitter::Node, source: &[u8]) -> Option<String> {
    match function.kind() {
        "identifier" => node_text(function, source).map(|s| s.to_string()),
        "attribute" => {
            let attr = function.child_by_field_name("attribute")?;
            node_text(&attr, source).map(|s| s.to_string())
        }
        _ => None,
    }
}

fn is_declaration_name(node: &tree_sitter::Node) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    match parent.kind() {
        "function_definition" | "class_definition" => parent
            .child_by_field_name("name")
            .map(|n| n == *node)
            .unwrap_or(false),
        "parameters" | "typed_parameter" | "default_parameter" | "keyword_argument" => true,
        _ => false,
    }
}

/// `import a.b` / `from m import x, y as z` become import references.
fn collect_imports(node: &tree_sitter::Node, source: &[u8], out: &mut ParsedFile) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "dotted_name" => {
                // for `from m import x` the module name is under the `module_name`
                // field; only imported names count
                if node.child_by_field_name("module_name") == Some(child) {
                    continue;
                }
                if let Some(text) = node_text(&child, source) {
                    out.references.push(reference_at(
                        &child,
                        last_component(text),
                        ReferenceKind::Import,
                    ));
                }
            }
            "aliased_import" => {
                if let Some(alias) = child.child_by_field_name("alias") {
                    if let Some(name) = node_text(&alias, source) {
                        out.references
                            .push(reference_at(&alias, name, ReferenceKind::Import));
                    }
                }
            }
            "wildcard_import" => {}
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{parse_source, Language};
    use std::path::Path;

    fn parse(source: &str) -> ParsedFile {
        parse_source(Language::Python, Path::new("test.py"), source.as_bytes()).unwrap()
    }

    #[test]
    fn extracts_functions_and_classes() {
        let parsed = parse("class User:\n    def name(self):\n        return self._name\n\ndef get_user():\n    pass\n");
        let user = parsed.symbols.iter().find(|s| s.name == "User").unwrap();
        assert_eq!(user.kind, SymbolKind::Class);

        let name = parsed.symbols.iter().find(|s| s.name == "name").unwrap();
        assert_eq!(name.kind, SymbolKind::Method);

        let get_user = parsed.symbols.iter().find(|s| s.name == "get_user").unwrap();
        assert_eq!(get_user.kind, SymbolKind::Function);
        assert_eq!(get_user.line, 5);
    }

    #[test]
    fn class_bases_become_extends_relations() {
        let parsed = parse("class Admin(User):\n    pass\n");
        assert!(parsed.relations.iter().any(|r| {
            r.child == "Admin" && r.parent == "User" && r.relation == TypeRelation::Extends
        }));
    }

    #[test]
    fn module_constants_follow_naming_convention() {
        let parsed = parse("MAX_RETRIES = 3\ncurrent = 0\n");
        let max = parsed.symbols.iter().find(|s| s.name == "MAX_RETRIES").unwrap();
        assert_eq!(max.kind, SymbolKind::Constant);
        let current = parsed.symbols.iter().find(|s| s.name == "current").unwrap();
        assert_eq!(current.kind, SymbolKind::Variable);
    }

    #[test]
    fn imports_are_recorded() {
        let parsed = parse("import os.path\nfrom typing import Optional\n");
        let imports: Vec<_> = parsed
            .references
            .iter()
            .filter(|r| r.kind == ReferenceKind::Import)
            .map(|r| r.name.as_str())
            .collect();
        assert!(imports.contains(&"path"));
        assert!(imports.contains(&"Optional"));
    }

    #[test]
    fn calls_track_enclosing_function() {
        let parsed = parse("def main():\n    helper()\n\ndef helper():\n    pass\n");
        let call = parsed.calls.iter().find(|c| c.callee == "helper").unwrap();
        assert_eq!(call.caller, "main");
    }
}
