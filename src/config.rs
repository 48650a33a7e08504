//! Index configuration.
//!
//! One `IndexConfig` per workspace session. The config is compiled into a
//! [`FileFilter`](crate::symbols::scan::FileFilter) when a directory walk
//! starts; holding the config itself is cheap and clonable.

use serde::{Deserialize, Serialize};

/// Internal directories that are always ignored (hard-coded).
pub(crate) const INTERNAL_IGNORE_DIRS: &[&str] = &[
    ".git",
    "target",
    "node_modules",
    ".venv",
    "venv",
    "__pycache__",
    "dist",
    "build",
];

/// Default extension allow-list: the languages the ingest layer parses.
pub(crate) const DEFAULT_EXTENSIONS: &[&str] = &["rs", "py", "js", "jsx", "ts", "tsx"];

/// Configuration for symbol indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// File extensions eligible for indexing (no leading dot).
    pub extensions: Vec<String>,
    /// Honor .gitignore / .ignore files during directory walks.
    pub respect_gitignore: bool,
    /// Skip files larger than this many bytes (0 = no limit).
    pub max_file_size: u64,
    /// Extra exclude globs applied after the allow-list (e.g. "**/generated/*").
    pub exclude_globs: Vec<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            respect_gitignore: true,
            max_file_size: 2 * 1024 * 1024,
            exclude_globs: Vec::new(),
        }
    }
}

impl IndexConfig {
    /// Config with the default language allow-list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the extension allow-list.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Add an exclude glob.
    pub fn with_exclude(mut self, glob: impl Into<String>) -> Self {
        self.exclude_globs.push(glob.into());
        self
    }

    /// Whether a file extension (without dot) is eligible.
    pub fn allows_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e == ext)
    }
}
