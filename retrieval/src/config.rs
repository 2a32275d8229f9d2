//! `RunConfig`: the single flat, immutable configuration value threaded through
//! every orchestration entry point (design docs §3/§10). Loaded from defaults,
//! optionally overlaid by a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Current tags-cache schema version. Bumping this changes the cache directory
/// name (`.aider.tags.cache.v<N>`), invalidating all prior entries.
pub const CACHE_VERSION: u32 = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Token budget for a single rendered repo map.
    pub map_tokens: usize,
    /// Tags-cache schema version; see [`CACHE_VERSION`].
    pub cache_version: u32,
    /// Use the legacy Personalized-PageRank ranker instead of weight-and-diffuse.
    pub use_old_ranking: bool,
    /// Keep built tag graphs in memory, keyed by the file set that produced them.
    pub cache_graphs: bool,
    /// Per-edge diffusion multiplier for the weight-and-diffuse ranker.
    pub diffusion_mult: f64,
    /// Optional fixed text prepended to a successfully rendered map.
    pub repo_content_prefix: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            map_tokens: 1024,
            cache_version: CACHE_VERSION,
            use_old_ranking: false,
            cache_graphs: false,
            diffusion_mult: 0.2,
            repo_content_prefix: None,
        }
    }
}

impl RunConfig {
    /// Loads a config from a TOML file, falling back to defaults for any field the
    /// file does not set.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| crate::error::RetrievalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text)
            .map_err(|e| crate::error::RetrievalError::Other(format!("invalid config at {}: {e}", path.display())))
    }

    /// The cache directory name for this config's schema version, e.g.
    /// `.aider.tags.cache.v4`.
    pub fn cache_dir_name(&self) -> String {
        format!(".aider.tags.cache.v{}", self.cache_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.map_tokens, 1024);
        assert_eq!(cfg.cache_version, CACHE_VERSION);
        assert!(!cfg.use_old_ranking);
        assert_eq!(cfg.cache_dir_name(), ".aider.tags.cache.v4");
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "map_tokens = 2048\n").unwrap();
        let cfg = RunConfig::load(&path).unwrap();
        assert_eq!(cfg.map_tokens, 2048);
        assert!(!cfg.use_old_ranking);
    }
}
