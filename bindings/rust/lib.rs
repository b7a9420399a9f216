//! Rust bindings for the `tree-sitter-isograph` grammar.
//!
//! This follows the standard layout used by Tree-sitter grammars so that
//! editor integrations can link the generated parser and obtain a
//! `tree_sitter::Language` handle for Isograph literals such as
//! `field User.Avatar @component { name }`.
//!
//! The build script compiles `src/parser.c` when present, and otherwise
//! generates it from `grammar.js` with the Tree-sitter CLI.
//!
//! ```no_run
//! # fn main() -> Result<(), tree_sitter_isograph::GrammarLoadError> {
//! let mut parser = tree_sitter_isograph::ISOGRAPH.parser()?;
//! let tree = parser.parse("entrypoint Query.HomePage", None).unwrap();
//! assert!(!tree.root_node().has_error());
//! # Ok(())
//! # }
//! ```

mod check;

pub use check::{check_grammar_loads, GrammarLoadError, GrammarSource, RawLanguageHandle};

use tree_sitter::Language;

extern "C" {
    fn tree_sitter_isograph() -> RawLanguageHandle;
}

/// The Isograph grammar, as exported by the generated parser.
pub const ISOGRAPH: GrammarSource =
    unsafe { GrammarSource::from_raw("Isograph", tree_sitter_isograph) };

/// Returns the Tree-sitter [`Language`] for this grammar.
///
/// The generated parser hands out a pointer to its static tables, so this
/// never sees a null handle. Use [`ISOGRAPH`] to get the ABI check as well.
pub fn language() -> Language {
    unsafe { Language::from_raw(tree_sitter_isograph()) }
}

/// The content of the [`node-types.json`][] file for this grammar.
///
/// [`node-types.json`]: https://tree-sitter.github.io/tree-sitter/using-parsers#static-node-types
pub const NODE_TYPES: &str = include_str!(concat!(
    env!("ISOGRAPH_GRAMMAR_SRC"),
    "/node-types.json"
));

/// The syntax highlighting query for this language.
pub const HIGHLIGHTS_QUERY: &str = include_str!("../../queries/highlights.scm");
