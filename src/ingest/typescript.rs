//! TypeScript symbol extraction using tree-sitter-typescript.
//!
//! Everything the JavaScript extractor covers, plus interfaces, type
//! aliases, enums, annotated types, and `implements` relations.

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
                let return_type = annotation_text(node, "return_type", walk.source);
                out.symbols.push(fact_from_node(
                    node,
                    name.clone(),
                    SymbolKind::Function,
                    return_type,
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
                let return_type = annotation_text(node, "return_type", walk.source);
                out.symbols.push(fact_from_node(
                    node,
                    name.clone(),
                    SymbolKind::Method,
                    return_type,
                ));
            }
            walk.fn_stack.push(name);
            visit_children(node, walk, out);
            walk.fn_stack.pop();
            return;
        }
        "class_declaration" | "abstract_class_declaration" => {
            if let Some(name) = field_text(node, "name", walk.source) {
                out.symbols
                    .push(fact_from_node(node, name.clone(), SymbolKind::Class, String::new()));
                collect_class_heritage(node, &name, walk.source, out);
                visit_children(node, walk, out);
                return;
            }
        }
        "interface_declaration" => {
            if let Some(name) = field_text(node, "name", walk.source) {
                out.symbols.push(fact_from_node(
                    node,
                    name.clone(),
                    SymbolKind::Interface,
                    String::new(),
                ));
                // `interface A extends B, C`
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if matches!(child.kind(), "extends_type_clause" | "extends_clause") {
                        for parent in clause_type_names(&child, walk.source) {
                            out.relations.push(TypeRelationFact {
                                child: name.clone(),
                                parent,
                                relation: TypeRelation::Extends,
                            });
                        }
                    }
                }
            }
            return; // member signatures are not standalone symbols
        }
        "type_alias_declaration" => {
            if let Some(name) = field_text(node, "name", walk.source) {
                let value = field_text(node, "value", walk.source).unwrap_or_default();
                out.symbols
                    .push(fact_from_node(node, name, SymbolKind::TypeAlias, value));
            }
            return;
        }
        "enum_declaration" => {
            if let Some(name) = field_text(node, "name", walk.source) {
                out.symbols
                    .push(fact_from_node(node, name, SymbolKind::Enum, String::new()));
            }
            return;
        }
        "variable_declarator" => {
            if let Some(name_node) = node.child_by_field_name("name") {
                if name_node.kind() == "identifier" {
                    if let Some(name) = node_text(&name_node, walk.source) {
                        let value = node.child_by_field_name("value");
                        let value_kind = value.as_ref().map(|v| v.kind()).unwrap_or("");
                        let kind = if matches!(value_kind, "arrow_function" | "function_expression") {
                            SymbolKind::Function
                        } else if declared_with_const(node) {
                            SymbolKind::Constant
                        } else {
                            SymbolKind::Variable
                        };
                        let type_text = annotation_text(node, "type", walk.source);
                        out.symbols.push(fact_from_node(
                            node,
                            name.to_string(),
                            kind,
                            type_text,
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

fn field_text(node: &tree_sitter::Node, field: &str, source: &[u8]) -> Option<String> {
    let child = node.child_by_field_name(field)?;
    node_text(&child, source).map(|s| s.to_string())
}

/// Text of a `: T` annotation with the leading colon stripped.
fn annotation_text(node: &tree_sitter::Node, field: &str, source: &[u8]) -> String {
    field_text(node, field, source)
        .map(|t| t.trim_start_matches(':').trim().to_string())
        .unwrap_or_default()
}

fn declared_with_const(node: &tree_sitter::Node) -> bool {
    node.parent()
        .filter(|p| p.kind() == "lexical_declaration")
        .and_then(|p| p.child(0))
        .map(|kw| kw.kind() == "const")
        .unwrap_or(false)
}

/// `class A extends B implements C, D` heritage clauses.
fn collect_class_heritage(
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
        for clause in child.children(&mut inner) {
            let relation = match clause.kind() {
                "extends_clause" => TypeRelation::Extends,
                "implements_clause" => TypeRelation::Implements,
                _ => continue,
            };
            for parent in clause_type_names(&clause, source) {
                out.relations.push(TypeRelationFact {
                    child: class_name.to_string(),
                    parent,
                    relation,
                });
            }
        }
    }
}

/// Type names listed in a heritage clause.
fn clause_type_names(clause: &tree_sitter::Node, source: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = clause.walk();
    for child in clause.named_children(&mut cursor) {
        if matches!(
            child.kind(),
            "identifier" | "type_identifier" | "member_expression" | "nested_type_identifier" | "generic_type"
        ) {
            if let Some(text) = node_text(&child, source) {
                let name = match text.find('<') {
                    Some(pos) => &text[..pos],
                    None => text,
                };
                names.push(last_component(name).to_string());
            }
        }
    }
    names
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
        | "abstract_class_declaration"
        | "interface_declaration"
        | "type_alias_declaration"
        | "enum_declaration"
        | "method_definition"
        | "variable_declarator" => parent
            .child_by_field_name("name")
            .map(|n| n == *node)
            .unwrap_or(false),
        "formal_parameters" | "required_parameter" | "optional_parameter" => true,
        _ => false,
    }
}

/// Import clauses become import references, aliases included.
fn collect_imports(node: &tree_sitter::Node, source: &[u8], out: &mut ParsedFile) {
    fn recurse(node: &tree_sitter::Node, source: &[u8], out: &mut ParsedFile) {
        match node.kind() {
            "identifier" => {
                if let Some(name) = node_text(node, source) {
                    out.references.push(reference_at(node, name, ReferenceKind::Import));
                }
            }
            "import_specifier" => {
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
