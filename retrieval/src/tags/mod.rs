//! Parsing and tag extraction (design docs §4.2, C2).

pub mod extractor;
pub mod languages;

pub use extractor::TagExtractor;
pub use languages::SupportedLanguage;
