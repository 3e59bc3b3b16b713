//! Grammar registry: one lazily-created tree-sitter parser per language.
//!
//! The registry is an explicit owned object constructed once per process
//! and passed by reference to callers. A grammar that fails to initialize
//! is remembered as unavailable so callers can fall back to non-parsing
//! extraction; nothing here panics on unsupported input.

use std::collections::HashMap;
use tracing::warn;
use tree_sitter::{Parser, Tree};

/// The closed set of grammars the signature extractor understands.
///
/// JavaScript sources are parsed with the TypeScript grammar; TSX covers
/// the embedded-markup dialect (and JSX).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    TypeScript,
    Tsx,
    Python,
    Rust,
    Cpp,
    Java,
    CSharp,
    Ruby,
    Php,
}

impl Language {
    /// All supported languages.
    pub const ALL: [Language; 9] = [
        Language::TypeScript,
        Language::Tsx,
        Language::Python,
        Language::Rust,
        Language::Cpp,
        Language::Java,
        Language::CSharp,
        Language::Ruby,
        Language::Php,
    ];

    /// Map a lowercase file extension (without dot) to its language.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "ts" | "mts" | "cts" | "js" | "mjs" | "cjs" => Some(Language::TypeScript),
            "tsx" | "jsx" => Some(Language::Tsx),
            "py" | "pyi" => Some(Language::Python),
            "rs" => Some(Language::Rust),
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "h" | "c" => Some(Language::Cpp),
            "java" => Some(Language::Java),
            "cs" => Some(Language::CSharp),
            "rb" => Some(Language::Ruby),
            "php" => Some(Language::Php),
            _ => None,
        }
    }

    /// Map a file path to its language via the extension.
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        Self::from_extension(&ext)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::CSharp => "csharp",
            Language::Ruby => "ruby",
            Language::Php => "php",
        }
    }

    fn grammar(&self) -> tree_sitter::Language {
        match self {
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
            Language::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            Language::Java => tree_sitter_java::LANGUAGE.into(),
            Language::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
            Language::Ruby => tree_sitter_ruby::LANGUAGE.into(),
            Language::Php => tree_sitter_php::LANGUAGE_PHP.into(),
        }
    }
}

/// Per-process parser cache.
///
/// Entries are created on first use and reused for the rest of the
/// process lifetime. A `None` entry records a grammar that failed to
/// initialize, so the failure is not retried per file.
pub struct GrammarRegistry {
    parsers: HashMap<Language, Option<Parser>>,
}

impl GrammarRegistry {
    pub fn new() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// Whether a working parser exists (or can be created) for `language`.
    pub fn has_grammar(&mut self, language: Language) -> bool {
        self.parser_for(language).is_some()
    }

    /// Parse `source`, returning `None` when the grammar is unavailable or
    /// the parse itself fails. Callers must have a non-parsing fallback.
    pub fn parse(&mut self, source: &str, language: Language) -> Option<Tree> {
        self.parser_for(language)?.parse(source, None)
    }

    fn parser_for(&mut self, language: Language) -> Option<&mut Parser> {
        self.parsers
            .entry(language)
            .or_insert_with(|| {
                let mut parser = Parser::new();
                match parser.set_language(&language.grammar()) {
                    Ok(()) => Some(parser),
                    Err(err) => {
                        warn!(language = language.name(), %err, "grammar unavailable");
                        None
                    }
                }
            })
            .as_mut()
    }
}

impl Default for GrammarRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension_known_languages() {
        assert_eq!(Language::from_extension("ts"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("js"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("tsx"), Some(Language::Tsx));
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension("rs"), Some(Language::Rust));
        assert_eq!(Language::from_extension("cs"), Some(Language::CSharp));
        assert_eq!(Language::from_extension("rb"), Some(Language::Ruby));
    }

    #[test]
    fn test_from_extension_unknown_returns_none() {
        assert_eq!(Language::from_extension("md"), None);
        assert_eq!(Language::from_extension("toml"), None);
        assert_eq!(Language::from_extension(""), None);
    }

    #[test]
    fn test_from_path_uses_extension() {
        use std::path::Path;
        assert_eq!(
            Language::from_path(Path::new("src/Index.TS")),
            Some(Language::TypeScript)
        );
        assert_eq!(Language::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_parse_returns_tree_for_every_language() {
        let mut registry = GrammarRegistry::new();
        for language in Language::ALL {
            assert!(registry.has_grammar(language), "{}", language.name());
            let tree = registry.parse("", language);
            assert!(tree.is_some(), "{}", language.name());
        }
    }

    #[test]
    fn test_parser_is_cached_across_calls() {
        let mut registry = GrammarRegistry::new();
        registry.parse("fn a() {}", Language::Rust);
        registry.parse("fn b() {}", Language::Rust);
        assert_eq!(registry.parsers.len(), 1);
    }
}
