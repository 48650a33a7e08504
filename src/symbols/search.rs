//! Symbol name search and reference lookup.

use serde::{Deserialize, Serialize};

use crate::references::ReferenceKind;
use crate::symbols::{Symbol, SymbolInner};

/// Matching rules for [`SymbolIndex::search_symbols`](crate::SymbolIndex::search_symbols).
///
/// The default is case-insensitive substring matching, the common editor
/// convention. `exact` requires full-name equality (still case-insensitive
/// unless `case_sensitive` is also set).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Require full-name equality instead of substring containment
    pub exact: bool,
    /// Match case-sensitively (default: insensitive)
    pub case_sensitive: bool,
}

/// A reference occurrence returned by reference lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferenceMatch {
    /// File containing the occurrence
    pub file_path: String,
    /// Line of the occurrence (1-based)
    pub line: usize,
    /// Column of the occurrence (1-based)
    pub column: usize,
    /// How the name was used
    pub kind: ReferenceKind,
}

pub(super) fn search_symbols(
    inner: &SymbolInner,
    query: &str,
    options: &SearchOptions,
) -> Vec<Symbol> {
    let needle = if options.case_sensitive {
        query.to_string()
    } else {
        query.to_lowercase()
    };

    let mut matches: Vec<&Symbol> = inner
        .symbols
        .values()
        .filter(|symbol| {
            let name = if options.case_sensitive {
                symbol.name.clone()
            } else {
                symbol.name.to_lowercase()
            };
            if options.exact {
                name == needle
            } else {
                name.contains(&needle)
            }
        })
        .collect();

    // exact-name matches first, then file path, then line
    matches.sort_by(|a, b| {
        let a_exact = is_exact(a, &needle, options.case_sensitive);
        let b_exact = is_exact(b, &needle, options.case_sensitive);
        b_exact
            .cmp(&a_exact)
            .then_with(|| a.file_path.cmp(&b.file_path))
            .then_with(|| a.line.cmp(&b.line))
            .then_with(|| a.name.cmp(&b.name))
    });

    matches.into_iter().cloned().collect()
}

fn is_exact(symbol: &Symbol, needle: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        symbol.name == needle
    } else {
        symbol.name.to_lowercase() == needle
    }
}

pub(super) fn find_references(
    inner: &SymbolInner,
    name: &str,
    declaring_file: Option<&str>,
) -> Vec<ReferenceMatch> {
    // The name must resolve to at least one declaration — in the given file
    // when one is specified, anywhere otherwise. Unknown names yield empty
    // results, not errors.
    let declared = match declaring_file {
        Some(file) => inner
            .files
            .get(file)
            .map(|record| {
                record
                    .symbol_keys
                    .iter()
                    .any(|(_, symbol_name, _)| symbol_name == name)
            })
            .unwrap_or(false),
        None => inner
            .symbols
            .keys()
            .any(|(_, symbol_name, _)| symbol_name == name),
    };
    if !declared {
        return Vec::new();
    }

    // References are searched across the whole index regardless of the
    // declaring-file restriction.
    let mut matches: Vec<ReferenceMatch> = Vec::new();
    for (file_path, references) in &inner.references_by_file {
        for reference in references {
            if reference.name == name {
                matches.push(ReferenceMatch {
                    file_path: file_path.clone(),
                    line: reference.line,
                    column: reference.column,
                    kind: reference.kind,
                });
            }
        }
    }
    matches.sort_by(|a, b| {
        a.file_path
            .cmp(&b.file_path)
            .then_with(|| a.line.cmp(&b.line))
            .then_with(|| a.column.cmp(&b.column))
    });
    matches
}
