//! Type hierarchy queries.
//!
//! Hierarchies are derived on demand from the relations recorded during
//! indexing, never stored. Only relations whose other end resolves to a
//! declared symbol appear in the result; external types (e.g. a std trait)
//! have no declaration to return.

use serde::{Deserialize, Serialize};

use crate::references::TypeRelation;
use crate::symbols::{Symbol, SymbolInner};

/// Result of a type-hierarchy query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeHierarchy {
    /// Supertypes/interfaces the symbol's declaring type extends
    pub parents: Vec<Symbol>,
    /// Direct subtypes
    pub children: Vec<Symbol>,
    /// Concrete types implementing an interface/trait symbol
    pub implementations: Vec<Symbol>,
}

pub(super) fn get_type_hierarchy(inner: &SymbolInner, name: &str) -> TypeHierarchy {
    let mut hierarchy = TypeHierarchy::default();

    for relations in inner.relations_by_file.values() {
        for relation in relations {
            if relation.child == name {
                if let Some(parent) = resolve_type(inner, &relation.parent) {
                    hierarchy.parents.push(parent);
                }
            }
            if relation.parent == name {
                if let Some(child) = resolve_type(inner, &relation.child) {
                    match relation.relation {
                        TypeRelation::Extends => hierarchy.children.push(child),
                        TypeRelation::Implements => hierarchy.implementations.push(child),
                    }
                }
            }
        }
    }

    for list in [
        &mut hierarchy.parents,
        &mut hierarchy.children,
        &mut hierarchy.implementations,
    ] {
        list.sort_by(|a, b| {
            a.file_path
                .cmp(&b.file_path)
                .then_with(|| a.line.cmp(&b.line))
        });
        list.dedup();
    }
    hierarchy
}

/// Resolve a type name to its declared symbol, preferring type-like kinds.
fn resolve_type(inner: &SymbolInner, name: &str) -> Option<Symbol> {
    let mut candidates: Vec<&Symbol> = inner
        .symbols
        .values()
        .filter(|s| s.name == name && s.kind.is_type_like())
        .collect();
    candidates.sort_by(|a, b| {
        a.file_path
            .cmp(&b.file_path)
            .then_with(|| a.line.cmp(&b.line))
    });
    candidates.first().map(|s| (*s).clone())
}
