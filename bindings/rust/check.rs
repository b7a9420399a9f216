//! Loading a compiled grammar into the `tree-sitter` runtime.
//!
//! A [`GrammarSource`] pairs a grammar name with the C entry point exported
//! by its generated parser. Registering it wraps the raw handle into a
//! [`Language`] and installs that into a [`Parser`], which is where the
//! runtime rejects tables built for an ABI it does not understand.

use thiserror::Error;
use tracing::{debug, warn};
use tree_sitter::{ffi, Language, LanguageError, Parser};

/// Raw language pointer as returned by a generated `tree_sitter_<name>()` function.
pub type RawLanguageHandle = *const ffi::TSLanguage;

/// Errors that can occur when loading a grammar.
#[derive(Error, Debug)]
pub enum GrammarLoadError {
    #[error("Error loading {grammar} grammar: the parser returned no language")]
    Missing { grammar: &'static str },

    #[error("Error loading {grammar} grammar: {source}")]
    Incompatible {
        grammar: &'static str,
        #[source]
        source: LanguageError,
    },
}

/// A compiled grammar, identified by name and its language entry point.
#[derive(Debug, Clone, Copy)]
pub struct GrammarSource {
    name: &'static str,
    provide: unsafe extern "C" fn() -> RawLanguageHandle,
}

impl GrammarSource {
    /// # Safety
    ///
    /// `provide` must return either null or a pointer to a `TSLanguage` that
    /// stays valid for the life of the process, as generated parsers do.
    pub const unsafe fn from_raw(
        name: &'static str,
        provide: unsafe extern "C" fn() -> RawLanguageHandle,
    ) -> Self {
        Self { name, provide }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Wraps the grammar's raw handle into a [`Language`] accepted by the runtime.
    pub fn register(&self) -> Result<Language, GrammarLoadError> {
        self.load().map(|(language, _)| language)
    }

    /// Returns a [`Parser`] with this grammar installed.
    pub fn parser(&self) -> Result<Parser, GrammarLoadError> {
        self.load().map(|(_, parser)| parser)
    }

    fn load(&self) -> Result<(Language, Parser), GrammarLoadError> {
        let raw = unsafe { (self.provide)() };
        if raw.is_null() {
            warn!(grammar = self.name, "Grammar returned a null language");
            return Err(GrammarLoadError::Missing { grammar: self.name });
        }

        // Non-null handles are valid per the `from_raw` contract.
        let language = unsafe { Language::from_raw(raw) };
        let mut parser = Parser::new();
        if let Err(source) = parser.set_language(&language) {
            warn!(
                grammar = self.name,
                version = language.version(),
                "Grammar rejected by the runtime"
            );
            return Err(GrammarLoadError::Incompatible {
                grammar: self.name,
                source,
            });
        }

        debug!(
            grammar = self.name,
            version = language.version(),
            node_kinds = language.node_kind_count(),
            "Registered grammar"
        );
        Ok((language, parser))
    }
}

/// Confirms that `source` yields a language the runtime can parse with.
pub fn check_grammar_loads(source: &GrammarSource) -> Result<(), GrammarLoadError> {
    source.parser().map(drop)
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use tree_sitter::LANGUAGE_VERSION;

    use super::*;

    /// Just enough of a `TSLanguage` for the runtime to read its ABI version.
    #[repr(C)]
    struct VersionOnlyLanguage {
        version: u32,
        _tables: [u32; 255],
    }

    static FUTURE_LANGUAGE: VersionOnlyLanguage = VersionOnlyLanguage {
        version: LANGUAGE_VERSION as u32 + 1,
        _tables: [0; 255],
    };

    unsafe extern "C" fn missing_grammar() -> RawLanguageHandle {
        std::ptr::null()
    }

    unsafe extern "C" fn future_grammar() -> RawLanguageHandle {
        std::ptr::addr_of!(FUTURE_LANGUAGE).cast()
    }

    const MISSING: GrammarSource = unsafe { GrammarSource::from_raw("Isograph", missing_grammar) };

    const FUTURE: GrammarSource = unsafe { GrammarSource::from_raw("Isograph", future_grammar) };

    #[test]
    fn null_language_is_reported_as_missing() {
        let err = check_grammar_loads(&MISSING).unwrap_err();
        assert!(matches!(err, GrammarLoadError::Missing { .. }));

        let message = err.to_string();
        assert!(message.starts_with("Error loading Isograph grammar"));
    }

    #[test]
    fn register_fails_for_null_language() {
        assert!(matches!(MISSING.register(), Err(GrammarLoadError::Missing { .. })));
        assert!(MISSING.parser().is_err());
    }

    #[test]
    fn repeated_checks_agree() {
        for _ in 0..3 {
            assert!(matches!(
                check_grammar_loads(&MISSING),
                Err(GrammarLoadError::Missing { .. })
            ));
        }
    }

    #[test]
    fn unsupported_abi_is_reported_as_incompatible() {
        let err = check_grammar_loads(&FUTURE).unwrap_err();
        assert!(matches!(err, GrammarLoadError::Incompatible { .. }));
        assert!(err.to_string().contains("Incompatible language version"));

        let source = err.source().expect("incompatible error has a source");
        assert!(source.downcast_ref::<LanguageError>().is_some());
    }

    #[test]
    fn register_fails_for_unsupported_abi() {
        assert!(matches!(
            FUTURE.register(),
            Err(GrammarLoadError::Incompatible { .. })
        ));
    }
}
