//! Symbol extraction from source files.
//!
//! Each language module is a pure extractor: given `(path, source)` it
//! returns the symbols, references, calls, and type relations found in the
//! text. No filesystem access, no global state; same input, same output.
//!
//! # Position Conventions
//!
//! Lines and columns are 1-based in every extracted fact. tree-sitter rows
//! and columns are 0-based; extractors add 1 at the boundary.

pub mod detect;
mod javascript;
pub mod pool;
mod python;
mod rust;
mod typescript;

pub use detect::{detect_language, Language};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{IndexError, Result};
use crate::references::{CallFact, ReferenceFact, TypeRelationFact};

/// Kind of symbol extracted from source code.
///
/// Language-agnostic kinds that map across the supported languages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// Free function
    Function,
    /// Function inside a class/impl block
    Method,
    /// Class definition (Python/JS/TS class)
    Class,
    /// Struct definition (Rust)
    Struct,
    /// Enum definition
    Enum,
    /// Interface definition (TypeScript)
    Interface,
    /// Trait definition (Rust)
    Trait,
    /// Variable binding
    Variable,
    /// Constant or static binding
    Constant,
    /// Module declaration
    Module,
    /// Type alias
    TypeAlias,
    /// Anything else worth recording (e.g. impl blocks)
    Unknown,
}

impl SymbolKind {
    /// Stable lowercase label used in output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
            SymbolKind::Class => "class",
            SymbolKind::Struct => "struct",
            SymbolKind::Enum => "enum",
            SymbolKind::Interface => "interface",
            SymbolKind::Trait => "trait",
            SymbolKind::Variable => "variable",
            SymbolKind::Constant => "constant",
            SymbolKind::Module => "module",
            SymbolKind::TypeAlias => "type_alias",
            SymbolKind::Unknown => "unknown",
        }
    }

    /// Parse a label into a kind (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "function" | "fn" => Some(SymbolKind::Function),
            "method" => Some(SymbolKind::Method),
            "class" => Some(SymbolKind::Class),
            "struct" => Some(SymbolKind::Struct),
            "enum" => Some(SymbolKind::Enum),
            "interface" => Some(SymbolKind::Interface),
            "trait" => Some(SymbolKind::Trait),
            "variable" | "var" => Some(SymbolKind::Variable),
            "constant" | "const" => Some(SymbolKind::Constant),
            "module" | "mod" => Some(SymbolKind::Module),
            "type" | "type_alias" => Some(SymbolKind::TypeAlias),
            _ => None,
        }
    }

    /// Whether this kind declares a type that can appear in a hierarchy.
    pub fn is_type_like(&self) -> bool {
        matches!(
            self,
            SymbolKind::Class
                | SymbolKind::Struct
                | SymbolKind::Enum
                | SymbolKind::Interface
                | SymbolKind::Trait
        )
    }
}

/// A fact about a symbol declaration extracted from source code.
///
/// Pure data structure. No behavior. No semantic analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymbolFact {
    /// Symbol name
    pub name: String,
    /// Kind of symbol
    pub kind: SymbolKind,
    /// Declared/inferred type text, may be empty (e.g. a function's return
    /// type, a constant's annotation)
    pub type_text: String,
    /// Line where the declaration starts (1-based)
    pub line: usize,
    /// Column where the declaration starts (1-based)
    pub column: usize,
    /// Line where the declaration ends (1-based)
    pub end_line: usize,
    /// Byte offset where the declaration starts
    pub byte_start: usize,
    /// Byte offset where the declaration ends
    pub byte_end: usize,
}

/// Everything extracted from one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedFile {
    pub symbols: Vec<SymbolFact>,
    pub references: Vec<ReferenceFact>,
    pub calls: Vec<CallFact>,
    pub relations: Vec<TypeRelationFact>,
}

/// Parse one file's source according to its language.
///
/// Uses the thread-local parser pool; returns a [`IndexError::Parse`] when
/// tree-sitter cannot produce a tree (callers count the failure and move on).
pub fn parse_source(language: Language, path: &Path, source: &[u8]) -> Result<ParsedFile> {
    let tree = pool::with_parser(language, |parser| parser.parse(source, None))
        .map_err(|e| IndexError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?
        .ok_or_else(|| IndexError::Parse {
            path: path.display().to_string(),
            message: format!("tree-sitter returned no tree for {}", language.name()),
        })?;

    let parsed = match language {
        Language::Rust => rust::extract(&tree, source),
        Language::Python => python::extract(&tree, source),
        Language::JavaScript => javascript::extract(&tree, source),
        Language::TypeScript => typescript::extract(&tree, source),
    };
    Ok(parsed)
}

/// Build a [`SymbolFact`] from a declaration node (positions converted to
/// 1-based).
pub(crate) fn fact_from_node(
    node: &tree_sitter::Node,
    name: String,
    kind: SymbolKind,
    type_text: String,
) -> SymbolFact {
    SymbolFact {
        name,
        kind,
        type_text,
        line: node.start_position().row + 1,
        column: node.start_position().column + 1,
        end_line: node.end_position().row + 1,
        byte_start: node.start_byte(),
        byte_end: node.end_byte(),
    }
}

/// Build a [`ReferenceFact`] at a node's start position (1-based).
pub(crate) fn reference_at(
    node: &tree_sitter::Node,
    name: &str,
    kind: crate::references::ReferenceKind,
) -> ReferenceFact {
    ReferenceFact {
        name: name.to_string(),
        line: node.start_position().row + 1,
        column: node.start_position().column + 1,
        kind,
    }
}

/// Last component of a qualified name (`a::b::c` or `a.b.c` → `c`).
pub(crate) fn last_component(text: &str) -> &str {
    text.rsplit("::")
        .next()
        .unwrap_or(text)
        .rsplit('.')
        .next()
        .unwrap_or(text)
}
