//! Error taxonomy for the index.
//!
//! Queries whose "not found" case is a normal outcome (symbol search,
//! reference lookup, path finding) return empty results instead of errors.
//! Errors are reserved for malformed arguments, single-entity fetches that
//! miss, per-file parse failures, and embedding failures.

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Error type covering all three stores.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Malformed operation arguments (missing id, empty filter key, ...)
    #[error("validation error: {0}")]
    Validation(String),

    /// A single-entity fetch referenced an id that does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// A file could not be parsed. Recorded per-file, never fatal to a batch.
    #[error("parse error in {path}: {message}")]
    Parse { path: String, message: String },

    /// The injected embedding function failed; no vector can be produced.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// I/O failure reading a file or walking a directory
    #[error("io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl IndexError {
    /// Build a validation error from anything displayable.
    pub fn validation(msg: impl std::fmt::Display) -> Self {
        IndexError::Validation(msg.to_string())
    }

    /// Build a not-found error from anything displayable.
    pub fn not_found(msg: impl std::fmt::Display) -> Self {
        IndexError::NotFound(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_stable() {
        let err = IndexError::validation("node id is empty");
        assert_eq!(err.to_string(), "validation error: node id is empty");

        let err = IndexError::Parse {
            path: "src/broken.rs".to_string(),
            message: "tree-sitter returned no tree".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "parse error in src/broken.rs: tree-sitter returned no tree"
        );
    }
}
