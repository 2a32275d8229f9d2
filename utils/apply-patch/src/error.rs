use std::path::PathBuf;

/// Error taxonomy for the structural search/replace edit engine.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Marker counts mismatch, or an inner ellipsis-bridged search matched zero or more than
    /// one location in the file.
    #[error("ambiguous ellipsis match: {0}")]
    AmbiguousEllipsis(String),
}

pub type Result<T> = std::result::Result<T, EditError>;
