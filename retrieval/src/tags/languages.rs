//! Supported languages and their tree-sitter grammars/tag queries (design docs §4.2
//! supplement).

use std::path::Path;

use tree_sitter_tags::TagsConfiguration;

use crate::error::{RetrievalError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedLanguage {
    Rust,
    Python,
    Go,
    Java,
    TypeScript,
    Tsx,
}

impl SupportedLanguage {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "rs" => Some(Self::Rust),
            "py" => Some(Self::Python),
            "go" => Some(Self::Go),
            "java" => Some(Self::Java),
            "ts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension().and_then(|e| e.to_str()).and_then(Self::from_extension)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Python => "python",
            Self::Go => "go",
            Self::Java => "java",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
        }
    }

    fn grammar(&self) -> tree_sitter::Language {
        match self {
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::Go => tree_sitter_go::LANGUAGE.into(),
            Self::Java => tree_sitter_java::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// The `.scm` tag query shipped for this language, by naming convention
    /// `queries/<lang>-tags.scm`.
    fn tags_query(&self) -> &'static str {
        match self {
            Self::Rust => include_str!("queries/rust-tags.scm"),
            Self::Python => include_str!("queries/python-tags.scm"),
            Self::Go => include_str!("queries/go-tags.scm"),
            Self::Java => include_str!("queries/java-tags.scm"),
            Self::TypeScript | Self::Tsx => include_str!("queries/typescript-tags.scm"),
        }
    }

    /// Whether this language has a known docstring convention (design docs §4.2:
    /// docstrings are only extracted for languages that specify one).
    pub fn has_docstring_convention(&self) -> bool {
        matches!(self, Self::Python | Self::Rust | Self::Go | Self::Java)
    }

    pub fn tags_configuration(&self) -> Result<TagsConfiguration> {
        TagsConfiguration::new(self.grammar(), self.tags_query(), "")
            .map_err(|e| RetrievalError::UnsupportedLanguage(format!("{}: {e}", self.name())))
    }

    /// A fresh parser for this language's full syntax tree, used by the tree-context
    /// renderer (which needs real node ancestry, unlike `tree-sitter-tags`' captures).
    pub fn parser(&self) -> Result<tree_sitter::Parser> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&self.grammar())
            .map_err(|e| RetrievalError::UnsupportedLanguage(format!("{}: {e}", self.name())))?;
        Ok(parser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_extension_covers_all_five_languages() {
        assert_eq!(SupportedLanguage::from_extension("rs"), Some(SupportedLanguage::Rust));
        assert_eq!(SupportedLanguage::from_extension("go"), Some(SupportedLanguage::Go));
        assert_eq!(SupportedLanguage::from_extension("py"), Some(SupportedLanguage::Python));
        assert_eq!(SupportedLanguage::from_extension("java"), Some(SupportedLanguage::Java));
        assert_eq!(SupportedLanguage::from_extension("tsx"), Some(SupportedLanguage::Tsx));
        assert_eq!(SupportedLanguage::from_extension("unknown"), None);
    }

    #[test]
    fn from_path_dispatches_on_extension() {
        assert_eq!(SupportedLanguage::from_path(Path::new("main.rs")), Some(SupportedLanguage::Rust));
    }

    #[test]
    fn tags_configuration_builds_for_every_language() {
        for lang in [
            SupportedLanguage::Rust,
            SupportedLanguage::Python,
            SupportedLanguage::Go,
            SupportedLanguage::Java,
            SupportedLanguage::TypeScript,
            SupportedLanguage::Tsx,
        ] {
            assert!(lang.tags_configuration().is_ok(), "failed to build config for {}", lang.name());
        }
    }
}
