//! Directory scanning for the symbol index.
//!
//! Filtering precedence, in order:
//! 1. Hard internal ignores (`.git/`, `target/`, `node_modules/`, ...)
//! 2. Gitignore-style rules (`.gitignore`, `.ignore`) when enabled
//! 3. Configured exclude globs
//! 4. The extension allow-list
//!
//! Files are collected and sorted before parsing so runs are deterministic;
//! parsing fans out across threads, while each file's apply step serializes
//! on the index write lock.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use ignore::gitignore::Gitignore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{IndexConfig, INTERNAL_IGNORE_DIRS};
use crate::error::Result;
use crate::symbols::{FileOutcome, SymbolIndex};

/// Progress callback for directory indexing: `(current, total)`.
pub type IndexProgress = dyn Fn(usize, usize) + Send + Sync;

/// Partial-success report for a directory walk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexReport {
    /// Files parsed and indexed this run
    pub files_indexed: usize,
    /// Files that failed to read or parse (counted, facts untouched)
    pub files_failed: usize,
    /// Files skipped: unchanged content or filtered size
    pub files_skipped: usize,
    /// Symbols inserted this run
    pub symbols_indexed: usize,
}

/// Compiled file filter for one walk.
pub struct FileFilter {
    root: PathBuf,
    gitignore: Option<Gitignore>,
    exclude: Vec<globset::GlobMatcher>,
}

impl FileFilter {
    /// Compile the config's filtering rules for a root directory.
    pub fn new(root: &Path, config: &IndexConfig) -> Result<Self> {
        let root = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());

        let gitignore = if config.respect_gitignore {
            let mut builder = ignore::gitignore::GitignoreBuilder::new(&root);
            for name in [".gitignore", ".ignore"] {
                let path = root.join(name);
                if path.exists() {
                    if let Some(err) = builder.add(&path) {
                        // malformed ignore rules must not abort indexing
                        warn!(file = %path.display(), error = %err, "ignore file not loaded");
                    }
                }
            }
            builder.build().ok()
        } else {
            None
        };

        let mut exclude = Vec::new();
        for pattern in &config.exclude_globs {
            let glob = globset::Glob::new(pattern)
                .map_err(|e| crate::error::IndexError::validation(format!(
                    "bad exclude glob {pattern:?}: {e}"
                )))?;
            exclude.push(glob.compile_matcher());
        }

        Ok(Self {
            root,
            gitignore,
            exclude,
        })
    }

    /// Whether a file should be skipped entirely.
    pub fn is_ignored(&self, path: &Path) -> bool {
        if path.components().any(|c| {
            c.as_os_str()
                .to_str()
                .map(|s| INTERNAL_IGNORE_DIRS.contains(&s))
                .unwrap_or(false)
        }) {
            return true;
        }
        if let Some(gitignore) = &self.gitignore {
            if gitignore.matched_path_or_any_parents(path, false).is_ignore() {
                return true;
            }
        }
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.exclude.iter().any(|m| m.is_match(relative))
    }
}

/// Walk `root`, indexing every eligible file. See module docs for filtering.
pub(super) fn index_directory(
    index: &SymbolIndex,
    root: &Path,
    progress: Option<&IndexProgress>,
) -> Result<IndexReport> {
    let filter = FileFilter::new(root, index.config())?;

    // Collect eligible files first, sorted for deterministic ordering.
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
    {
        let path = entry.path();
        if !entry.file_type().is_file() || filter.is_ignored(path) {
            continue;
        }
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if index.config().allows_extension(ext) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();

    let total = files.len();
    let done = AtomicUsize::new(0);
    let indexed = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let skipped = AtomicUsize::new(0);
    let symbols = AtomicUsize::new(0);

    // Parse in parallel; each file's stale-removal+insert serializes on the
    // index write lock, so readers never see a half-applied file.
    files.par_iter().for_each(|path| {
        match index.index_file(path) {
            Ok(FileOutcome::Indexed(count)) => {
                indexed.fetch_add(1, Ordering::Relaxed);
                symbols.fetch_add(count, Ordering::Relaxed);
            }
            Ok(FileOutcome::Unchanged) | Ok(FileOutcome::Skipped) => {
                skipped.fetch_add(1, Ordering::Relaxed);
            }
            Ok(FileOutcome::Failed) | Err(_) => {
                failed.fetch_add(1, Ordering::Relaxed);
            }
        }
        if let Some(cb) = progress {
            cb(done.fetch_add(1, Ordering::Relaxed) + 1, total);
        }
    });

    let report = IndexReport {
        files_indexed: indexed.into_inner(),
        files_failed: failed.into_inner(),
        files_skipped: skipped.into_inner(),
        symbols_indexed: symbols.into_inner(),
    };
    info!(
        root = %root.display(),
        indexed = report.files_indexed,
        failed = report.files_failed,
        skipped = report.files_skipped,
        "directory indexed"
    );
    Ok(report)
}
