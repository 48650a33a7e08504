//! Reference, call, and type-relation facts extracted from source code.
//!
//! Pure data structures. No behavior. No semantic resolution — a reference
//! records that a name occurred at a position, nothing more; the symbol index
//! resolves names at query time.

use serde::{Deserialize, Serialize};

/// How a symbol name was used at a reference site.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// Name read in an expression
    Read,
    /// Name assigned to
    Write,
    /// Name invoked
    Call,
    /// Name brought into scope by an import/use declaration
    Import,
}

impl ReferenceKind {
    /// Stable lowercase label used in output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ReferenceKind::Read => "read",
            ReferenceKind::Write => "write",
            ReferenceKind::Call => "call",
            ReferenceKind::Import => "import",
        }
    }
}

/// A fact about an occurrence of a symbol name, distinct from its declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferenceFact {
    /// Name as written (last path component for qualified names)
    pub name: String,
    /// Line of the occurrence (1-based)
    pub line: usize,
    /// Column of the occurrence (1-based)
    pub column: usize,
    /// How the name was used
    pub kind: ReferenceKind,
}

/// A fact about a function call: caller → callee.
///
/// The caller is the innermost enclosing function at the call site; calls at
/// module top level have an empty caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallFact {
    /// Enclosing function name ("" at top level)
    pub caller: String,
    /// Called name (last path component for qualified calls)
    pub callee: String,
    /// Line of the call site (1-based)
    pub line: usize,
    /// Column of the call site (1-based)
    pub column: usize,
}

/// Declaration relationship between two type names.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TypeRelation {
    /// Child extends/inherits the parent type
    Extends,
    /// Child implements the parent interface/trait
    Implements,
}

/// A fact that `child` declares a relationship to `parent`.
///
/// Recorded during indexing; type hierarchies are derived from these on
/// demand, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeRelationFact {
    /// Declaring type name
    pub child: String,
    /// Supertype or interface name
    pub parent: String,
    /// Kind of relationship
    pub relation: TypeRelation,
}
