//! Language detection by file extension.

use std::path::Path;

/// Languages the ingest layer can parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Rust,
    Python,
    JavaScript,
    TypeScript,
}

impl Language {
    /// Lowercase language name for output and logging.
    pub fn name(&self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
        }
    }
}

/// Detect the language for a file path from its extension.
///
/// Returns `None` for unsupported extensions; callers skip those files.
pub fn detect_language(path: &Path) -> Option<Language> {
    let ext = path.extension().and_then(|e| e.to_str())?;
    match ext {
        "rs" => Some(Language::Rust),
        "py" => Some(Language::Python),
        "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
        "ts" | "tsx" => Some(Language::TypeScript),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_supported_extensions() {
        assert_eq!(
            detect_language(&PathBuf::from("src/main.rs")),
            Some(Language::Rust)
        );
        assert_eq!(
            detect_language(&PathBuf::from("app.py")),
            Some(Language::Python)
        );
        assert_eq!(
            detect_language(&PathBuf::from("web/index.jsx")),
            Some(Language::JavaScript)
        );
        assert_eq!(
            detect_language(&PathBuf::from("web/app.tsx")),
            Some(Language::TypeScript)
        );
    }

    #[test]
    fn unsupported_extensions_are_none() {
        assert_eq!(detect_language(&PathBuf::from("README.md")), None);
        assert_eq!(detect_language(&PathBuf::from("Makefile")), None);
    }
}
