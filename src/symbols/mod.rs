//! Source-symbol index.
//!
//! Extracts symbols, references, calls, and type relations from source files
//! and answers name search, reference lookup, and type-hierarchy queries.
//! Optionally mirrors code structure into the graph store.
//!
//! # Idempotent re-indexing
//!
//! Symbols are keyed by `(file_path, name, line)`. Every file keeps a reverse
//! map of the keys it produced, so re-indexing removes the previous set
//! before inserting the new one — stale entries never survive a re-index,
//! and removal+insert happens under one write lock so readers never observe
//! the intermediate state. Files whose content hash is unchanged are skipped.

mod graph_export;
mod hierarchy;
pub(crate) mod scan;
mod search;

use std::path::Path;
use std::sync::RwLock;

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

pub use hierarchy::TypeHierarchy;
pub use scan::{FileFilter, IndexProgress, IndexReport};
pub use search::{ReferenceMatch, SearchOptions};

use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use crate::graph::GraphStore;
use crate::ingest::{detect_language, parse_source, ParsedFile, SymbolKind};
use crate::references::{CallFact, ReferenceFact, TypeRelationFact};

/// A named code declaration with kind, type, and source position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Symbol {
    /// Symbol name
    pub name: String,
    /// Kind of symbol
    pub kind: SymbolKind,
    /// Declared/inferred type text, may be empty
    pub type_text: String,
    /// File the symbol was declared in
    pub file_path: String,
    /// Declaration line (1-based)
    pub line: usize,
    /// Declaration column (1-based)
    pub column: usize,
}

impl Symbol {
    /// Stable lowercase kind label.
    pub fn kind_name(&self) -> &'static str {
        self.kind.kind_name()
    }

    /// Stable 32-char id derived from `(file_path, name, line)`.
    pub fn symbol_id(&self) -> String {
        let input = format!("{}:{}:{}", self.file_path, self.name, self.line);
        blake3::hash(input.as_bytes()).to_hex()[..32].to_string()
    }
}

/// Symbol storage key: `(file_path, name, line)`.
pub(crate) type SymbolKey = (String, String, usize);

/// Per-file record: content hash, timestamps, and the reverse map entry.
pub(crate) struct FileRecord {
    pub(crate) content_hash: String,
    pub(crate) indexed_at: DateTime<Utc>,
    /// Keys of every symbol attributed to this file (stale-removal invariant)
    pub(crate) symbol_keys: Vec<SymbolKey>,
}

/// Metadata for one indexed file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileInfo {
    /// File path as indexed
    pub path: String,
    /// SHA-256 hash of the content that was indexed
    pub content_hash: String,
    /// When the file was last (re-)indexed
    pub indexed_at: DateTime<Utc>,
    /// Symbols attributed to the file
    pub symbols: usize,
}

/// Counters for the symbol index.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymbolStats {
    /// Files currently indexed
    pub files: usize,
    /// Symbols currently indexed
    pub symbols: usize,
    /// Reference occurrences currently indexed
    pub references: usize,
    /// Import references among them
    pub import_references: usize,
    /// Call edges currently indexed
    pub call_edges: usize,
    /// Cumulative parse/read failures since construction (or last clear)
    pub failed_files: u64,
}

/// Mutable index state, guarded by the store's lock.
#[derive(Default)]
pub(crate) struct SymbolInner {
    pub(crate) symbols: AHashMap<SymbolKey, Symbol>,
    pub(crate) files: AHashMap<String, FileRecord>,
    pub(crate) references_by_file: AHashMap<String, Vec<ReferenceFact>>,
    pub(crate) calls_by_file: AHashMap<String, Vec<CallFact>>,
    pub(crate) relations_by_file: AHashMap<String, Vec<TypeRelationFact>>,
    pub(crate) failed_files: u64,
}

impl SymbolInner {
    /// Remove every fact previously attributed to a file.
    fn remove_file_facts(&mut self, path: &str) {
        if let Some(record) = self.files.remove(path) {
            for key in &record.symbol_keys {
                self.symbols.remove(key);
            }
        }
        self.references_by_file.remove(path);
        self.calls_by_file.remove(path);
        self.relations_by_file.remove(path);
    }

    /// Insert a parsed file. The caller has already removed stale facts.
    fn insert_file_facts(&mut self, path: &str, content_hash: String, parsed: ParsedFile) -> usize {
        let mut symbol_keys = Vec::with_capacity(parsed.symbols.len());
        for fact in parsed.symbols {
            let symbol = Symbol {
                name: fact.name,
                kind: fact.kind,
                type_text: fact.type_text,
                file_path: path.to_string(),
                line: fact.line,
                column: fact.column,
            };
            let key: SymbolKey = (path.to_string(), symbol.name.clone(), symbol.line);
            // (file, name, line) collisions keep the first declaration
            if !self.symbols.contains_key(&key) {
                symbol_keys.push(key.clone());
                self.symbols.insert(key, symbol);
            }
        }
        let count = symbol_keys.len();
        self.files.insert(
            path.to_string(),
            FileRecord {
                content_hash,
                indexed_at: Utc::now(),
                symbol_keys,
            },
        );
        if !parsed.references.is_empty() {
            self.references_by_file
                .insert(path.to_string(), parsed.references);
        }
        if !parsed.calls.is_empty() {
            self.calls_by_file.insert(path.to_string(), parsed.calls);
        }
        if !parsed.relations.is_empty() {
            self.relations_by_file
                .insert(path.to_string(), parsed.relations);
        }
        count
    }
}

/// Outcome of indexing a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// File parsed and its facts replaced the previous set
    Indexed(usize),
    /// Content hash unchanged; nothing to do
    Unchanged,
    /// Parse or read failure; counted, prior facts left in place
    Failed,
    /// Extension not in the allow-list
    Skipped,
}

/// Source-symbol index for a workspace session.
///
/// Construct one per session and share it behind `Arc`; all operations take
/// `&self`.
pub struct SymbolIndex {
    config: IndexConfig,
    inner: RwLock<SymbolInner>,
}

impl Default for SymbolIndex {
    fn default() -> Self {
        Self::new(IndexConfig::default())
    }
}

impl SymbolIndex {
    /// Create an empty index with the given configuration.
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            inner: RwLock::new(SymbolInner::default()),
        }
    }

    /// The configuration this index was built with.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Index one file from disk.
    ///
    /// Unreadable or unparsable files are recorded as a counted failure and
    /// reported via [`FileOutcome::Failed`], never an `Err` — a batch caller
    /// keeps going. Files with an unchanged content hash are skipped.
    pub fn index_file(&self, path: &Path) -> Result<FileOutcome> {
        let path_str = path.to_string_lossy().to_string();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !self.config.allows_extension(ext) {
            return Ok(FileOutcome::Skipped);
        }
        let source = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path_str, error = %e, "failed to read file");
                self.inner.write().expect("symbol lock poisoned").failed_files += 1;
                return Ok(FileOutcome::Failed);
            }
        };
        if self.config.max_file_size > 0 && source.len() as u64 > self.config.max_file_size {
            return Ok(FileOutcome::Skipped);
        }
        self.index_source(&path_str, &source)
    }

    /// Index file content supplied by the caller (no filesystem access).
    ///
    /// The language is detected from the path's extension; unsupported
    /// extensions are a validation error since the caller explicitly chose
    /// the file.
    pub fn index_source(&self, path: &str, source: &[u8]) -> Result<FileOutcome> {
        let language = detect_language(Path::new(path)).ok_or_else(|| {
            IndexError::validation(format!("unsupported file extension: {path}"))
        })?;

        let content_hash = hex::encode(Sha256::digest(source));
        {
            let inner = self.inner.read().expect("symbol lock poisoned");
            if let Some(record) = inner.files.get(path) {
                if record.content_hash == content_hash {
                    return Ok(FileOutcome::Unchanged);
                }
            }
        }

        let parsed = match parse_source(language, Path::new(path), source) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(path, error = %e, "failed to parse file");
                self.inner.write().expect("symbol lock poisoned").failed_files += 1;
                return Ok(FileOutcome::Failed);
            }
        };

        // stale removal + insert under one write lock: atomic for readers
        let mut inner = self.inner.write().expect("symbol lock poisoned");
        inner.remove_file_facts(path);
        let count = inner.insert_file_facts(path, content_hash, parsed);
        debug!(path, symbols = count, "indexed file");
        Ok(FileOutcome::Indexed(count))
    }

    /// Recursively index a directory. See [`FileFilter`] for filtering rules.
    ///
    /// Safe to re-run: unchanged files are skipped, changed files replace
    /// their stale facts, failures are counted into the report.
    pub fn index_directory(&self, root: &Path) -> Result<IndexReport> {
        self.index_directory_with_progress(root, None)
    }

    /// [`index_directory`](Self::index_directory) with a progress callback
    /// `(current, total)`.
    pub fn index_directory_with_progress(
        &self,
        root: &Path,
        progress: Option<&IndexProgress>,
    ) -> Result<IndexReport> {
        scan::index_directory(self, root, progress)
    }

    /// Remove a file and every fact attributed to it.
    pub fn remove_file(&self, path: &str) {
        let mut inner = self.inner.write().expect("symbol lock poisoned");
        inner.remove_file_facts(path);
    }

    /// Metadata for one indexed file, or `None` if the path is not indexed.
    pub fn get_file_info(&self, path: &str) -> Option<FileInfo> {
        let inner = self.inner.read().expect("symbol lock poisoned");
        inner.files.get(path).map(|record| FileInfo {
            path: path.to_string(),
            content_hash: record.content_hash.clone(),
            indexed_at: record.indexed_at,
            symbols: record.symbol_keys.len(),
        })
    }

    /// Paths of all indexed files, sorted.
    pub fn indexed_files(&self) -> Vec<String> {
        let inner = self.inner.read().expect("symbol lock poisoned");
        let mut paths: Vec<String> = inner.files.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Search symbols by name. See [`SearchOptions`] for matching rules;
    /// the default is case-insensitive substring matching.
    pub fn search_symbols(&self, query: &str, options: &SearchOptions) -> Vec<Symbol> {
        let inner = self.inner.read().expect("symbol lock poisoned");
        search::search_symbols(&inner, query, options)
    }

    /// All recorded references to a symbol name, across the whole index.
    ///
    /// `declaring_file` restricts declaration resolution (disambiguating
    /// shadowed names) but not the reference search. Unknown names yield
    /// empty results.
    pub fn find_references(&self, name: &str, declaring_file: Option<&str>) -> Vec<ReferenceMatch> {
        let inner = self.inner.read().expect("symbol lock poisoned");
        search::find_references(&inner, name, declaring_file)
    }

    /// Type hierarchy for a symbol name, derived on demand from the
    /// relations recorded during indexing. Absent relationships yield empty
    /// vectors, not an error.
    pub fn get_type_hierarchy(&self, name: &str) -> TypeHierarchy {
        let inner = self.inner.read().expect("symbol lock poisoned");
        hierarchy::get_type_hierarchy(&inner, name)
    }

    /// Current counters.
    pub fn get_stats(&self) -> SymbolStats {
        let inner = self.inner.read().expect("symbol lock poisoned");
        let references: usize = inner.references_by_file.values().map(Vec::len).sum();
        let import_references = inner
            .references_by_file
            .values()
            .flatten()
            .filter(|r| r.kind == crate::references::ReferenceKind::Import)
            .count();
        SymbolStats {
            files: inner.files.len(),
            symbols: inner.symbols.len(),
            references,
            import_references,
            call_edges: inner.calls_by_file.values().map(Vec::len).sum(),
            failed_files: inner.failed_files,
        }
    }

    /// Mirror indexed files and symbols into a graph store as nodes with
    /// `contains`, `calls`, and `imports` edges.
    pub fn export_to_graph(&self, graph: &GraphStore) {
        let inner = self.inner.read().expect("symbol lock poisoned");
        graph_export::export_to_graph(&inner, graph);
    }

    /// Remove all symbols, references, calls, relations, and counters.
    pub fn clear(&self) {
        let mut inner = self.inner.write().expect("symbol lock poisoned");
        *inner = SymbolInner::default();
    }
}
