//! Sextant: an in-process code intelligence index.
//!
//! Three independent stores, composed only by the caller:
//!
//! - [`GraphStore`]: typed nodes and directed edges with arbitrary
//!   properties; filtered queries, shortest-path traversal, connected
//!   components. No knowledge of source code.
//! - [`SymbolIndex`]: tree-sitter backed symbol extraction from source
//!   files; name search, reference lookup, type-hierarchy queries. Can
//!   mirror code structure into a [`GraphStore`].
//! - [`VectorStore`]: text embeddings with metadata; nearest-neighbor and
//!   similarity-by-id queries ranked by cosine similarity. The embedding
//!   function is injected via the [`Embedder`] trait.
//!
//! Each store is a plain struct constructed per workspace session and shared
//! behind `Arc` — no globals, no background threads, no external database.
//! Writers are exclusive per store; readers run concurrently and never
//! observe a half-applied mutation.
//!
//! # Position Conventions
//!
//! All symbol and reference positions are 1-based: line 1 is the first line,
//! column 1 the first character. Byte offsets are 0-based from file start.
//!
//! # Example
//!
//! ```no_run
//! use sextant::{IndexConfig, SymbolIndex, SearchOptions};
//!
//! let index = SymbolIndex::new(IndexConfig::default());
//! index.index_directory(std::path::Path::new("./src"))?;
//! let hits = index.search_symbols("parse", &SearchOptions::default());
//! # Ok::<(), sextant::IndexError>(())
//! ```

pub mod common;
pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod references;
pub mod symbols;
pub mod vector;

pub use config::IndexConfig;
pub use error::{IndexError, Result};
pub use graph::{
    ConnectedFilter, Direction, Edge, GraphStats, GraphStore, Node, NodeFilter, Properties,
    DEFAULT_MAX_PATH_DEPTH,
};
pub use ingest::{detect_language, Language, SymbolKind};
pub use references::{CallFact, ReferenceFact, ReferenceKind, TypeRelation, TypeRelationFact};
pub use symbols::{
    FileInfo, FileOutcome, IndexReport, ReferenceMatch, SearchOptions, Symbol, SymbolIndex,
    SymbolStats, TypeHierarchy,
};
pub use vector::{
    Embedder, HashingEmbedder, SearchOptions as VectorSearchOptions, SearchResult, VectorDocument,
    VectorStats, VectorStore, DEFAULT_EMBEDDING_DIMENSION, DEFAULT_TOP_K,
};
