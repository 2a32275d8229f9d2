//! Crate-wide error taxonomy (design docs §7).

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no tag query available for language {0}")]
    UnsupportedLanguage(String),

    #[error("tags cache error: {0}")]
    Cache(String),

    #[error("edit engine error: {0}")]
    Edit(#[from] codemap_apply_patch::EditError),

    #[error("tag graph construction failed: {0}")]
    GraphBuild(String),

    #[error("ranking failed: {0}")]
    Rank(String),

    #[error("entity {0:?} already requested recently")]
    RepeatRequest(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, RetrievalError>;
