//! Thread-local parser pool for reusing tree-sitter Parser instances.
//!
//! Creating a parser per file adds avoidable allocation overhead during
//! directory indexing, and `tree_sitter::Parser` is not `Sync`. Each worker
//! thread keeps one lazily-created parser per language instead.

use anyhow::Result;
use std::cell::RefCell;

use crate::ingest::detect::Language;

thread_local! {
    static RUST_PARSER: RefCell<Option<tree_sitter::Parser>> = const { RefCell::new(None) };
    static PYTHON_PARSER: RefCell<Option<tree_sitter::Parser>> = const { RefCell::new(None) };
    static JAVASCRIPT_PARSER: RefCell<Option<tree_sitter::Parser>> = const { RefCell::new(None) };
    static TYPESCRIPT_PARSER: RefCell<Option<tree_sitter::Parser>> = const { RefCell::new(None) };
}

fn grammar(language: Language) -> tree_sitter::Language {
    match language {
        Language::Rust => tree_sitter_rust::language(),
        Language::Python => tree_sitter_python::language(),
        Language::JavaScript => tree_sitter_javascript::language(),
        Language::TypeScript => tree_sitter_typescript::language_typescript(),
    }
}

fn slot(language: Language) -> &'static std::thread::LocalKey<RefCell<Option<tree_sitter::Parser>>> {
    match language {
        Language::Rust => &RUST_PARSER,
        Language::Python => &PYTHON_PARSER,
        Language::JavaScript => &JAVASCRIPT_PARSER,
        Language::TypeScript => &TYPESCRIPT_PARSER,
    }
}

/// Run `f` with this thread's parser for `language`, creating it on first use.
pub fn with_parser<F, R>(language: Language, f: F) -> Result<R>
where
    F: FnOnce(&mut tree_sitter::Parser) -> R,
{
    slot(language).with(|cell| {
        let mut parser_ref = cell.borrow_mut();
        if parser_ref.is_none() {
            let mut parser = tree_sitter::Parser::new();
            parser.set_language(&grammar(language))?;
            *parser_ref = Some(parser);
        }
        let parser = parser_ref
            .as_mut()
            .expect("parser slot populated above");
        Ok(f(parser))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_is_reused_within_a_thread() {
        let first = with_parser(Language::Rust, |parser| {
            parser.parse("fn a() {}", None).is_some()
        })
        .unwrap();
        let second = with_parser(Language::Rust, |parser| {
            parser.parse("fn b() {}", None).is_some()
        })
        .unwrap();
        assert!(first && second);
    }
}
