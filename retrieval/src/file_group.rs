//! FileGroup (design docs §4.1): enumerates, filters, and validates files under a
//! root, and owns the mtime-keyed tags cache.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetrievalError};

/// Injected file-tracking source. The default non-VCS implementation walks the tree;
/// a git-backed implementation can be substituted without touching the filter/sort tail.
pub trait VcsTracker {
    fn tracked_files(&self, with_tests: bool) -> Result<Vec<PathBuf>>;
}

/// Walks the filesystem tree under `root`, honoring `.gitignore`-style hidden-directory
/// exclusion (`.git`, `target`, `node_modules`) as a practical stand-in for full
/// gitignore parsing.
pub struct WalkTracker {
    pub root: PathBuf,
}

impl VcsTracker for WalkTracker {
    fn tracked_files(&self, _with_tests: bool) -> Result<Vec<PathBuf>> {
        let mut out = Vec::new();
        for entry in walkdir::WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|e| !is_excluded_dir(e))
        {
            let entry = entry.map_err(|e| crate::error::RetrievalError::Other(e.to_string()))?;
            if entry.file_type().is_file() {
                out.push(entry.path().to_path_buf());
            }
        }
        Ok(out)
    }
}

fn is_excluded_dir(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    matches!(
        entry.file_name().to_str(),
        Some(".git") | Some("target") | Some("node_modules") | Some(".aider.tags.cache.v1")
    )
}

fn is_test_path(path: &Path) -> bool {
    path.components().any(|c| {
        let s = c.as_os_str().to_string_lossy();
        s == "tests" || s == "test"
    }) || path
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.ends_with("_test") || s.ends_with(".test") || s.starts_with("test_"))
}

/// The default source-file predicate: known source extensions, tests excluded unless
/// requested.
pub fn default_predicate(path: &Path, with_tests: bool) -> bool {
    if !with_tests && is_test_path(path) {
        return false;
    }
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("rs") | Some("py") | Some("go") | Some("java") | Some("ts") | Some("tsx")
    )
}

struct CacheEntry {
    mtime: SystemTime,
    payload: serde_json::Value,
}

/// On-disk shape of a single cache entry (design docs §3: "Tags cache"): `mtime` is
/// stored as a float, matching the reference implementation's schema.
#[derive(Serialize, Deserialize)]
struct DiskCacheEntry {
    mtime: f64,
    data: serde_json::Value,
}

pub struct FileGroup {
    pub root: PathBuf,
    tracker: Box<dyn VcsTracker>,
    predicate: fn(&Path, bool) -> bool,
    warned_files: HashSet<PathBuf>,
    cache: HashMap<String, CacheEntry>,
    pub files_for_modification: HashSet<PathBuf>,
}

impl FileGroup {
    pub fn new(root: PathBuf) -> Self {
        let tracker = Box::new(WalkTracker { root: root.clone() });
        Self {
            root,
            tracker,
            predicate: default_predicate,
            warned_files: HashSet::new(),
            cache: HashMap::new(),
            files_for_modification: HashSet::new(),
        }
    }

    pub fn with_tracker(root: PathBuf, tracker: Box<dyn VcsTracker>) -> Self {
        Self {
            root,
            tracker,
            predicate: default_predicate,
            warned_files: HashSet::new(),
            cache: HashMap::new(),
            files_for_modification: HashSet::new(),
        }
    }

    /// Resolves a relative (or already-absolute) path against the repo root.
    pub fn abs_root_path(&self, rel_or_abs: &str) -> PathBuf {
        let path = Path::new(rel_or_abs);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn rel_fname(&self, abs: &Path) -> String {
        abs.strip_prefix(&self.root)
            .unwrap_or(abs)
            .to_string_lossy()
            .replace('\\', "/")
    }

    /// Enumerates, filters, sorts, and dedups all tracked files under the root.
    pub fn get_all_filenames(&self, with_tests: bool) -> Result<Vec<PathBuf>> {
        let tracked = self.tracker.tracked_files(with_tests)?;
        let mut set: HashSet<PathBuf> = tracked
            .into_iter()
            .filter(|p| (self.predicate)(p, with_tests))
            .collect();
        let mut out: Vec<PathBuf> = set.drain().collect();
        out.sort();
        Ok(out)
    }

    /// Drops entries that fail the predicate, are not regular files, or do not exist.
    /// Missing/irregular entries are logged once per path.
    pub fn validate_fnames(&mut self, fnames: &[PathBuf], with_tests: bool) -> Vec<PathBuf> {
        let mut out: HashSet<PathBuf> = HashSet::new();
        for fname in fnames {
            if !fname.is_file() {
                if !self.warned_files.contains(fname) {
                    tracing::warn!(path = %fname.display(), "skipping missing or non-regular file");
                    self.warned_files.insert(fname.clone());
                }
                continue;
            }
            if !(self.predicate)(fname, with_tests) {
                continue;
            }
            out.insert(fname.clone());
        }
        let mut out: Vec<PathBuf> = out.into_iter().collect();
        out.sort();
        out
    }

    /// The single caching entry point. `fn_name` disambiguates multiple cached
    /// functions keyed on the same path. On a mtime miss, `f` is invoked to
    /// (re)compute the payload.
    pub fn cached_function_call(
        &mut self,
        path: &Path,
        fn_name: &str,
        f: impl FnOnce(&Path) -> Result<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let mtime = match std::fs::metadata(path).and_then(|m| m.modified()) {
            Ok(m) => m,
            Err(_) => return Ok(serde_json::Value::Array(Vec::new())),
        };
        let key = format!("{}::{}", path.display(), fn_name);
        if let Some(entry) = self.cache.get(&key) {
            if entry.mtime == mtime {
                return Ok(entry.payload.clone());
            }
        }
        let payload = f(path)?;
        self.cache.insert(key, CacheEntry { mtime, payload: payload.clone() });
        Ok(payload)
    }

    /// Heuristically detects relative filenames mentioned in free text.
    pub fn get_file_mentions(&self, text: &str, known_rel_fnames: &[String]) -> HashSet<String> {
        let known: HashSet<&str> = known_rel_fnames.iter().map(|s| s.as_str()).collect();
        let basenames: HashMap<&str, Vec<&str>> = {
            let mut m: HashMap<&str, Vec<&str>> = HashMap::new();
            for k in &known {
                if let Some(base) = k.rsplit('/').next() {
                    m.entry(base).or_default().push(k);
                }
            }
            m
        };

        let mut mentioned: HashSet<String> = HashSet::new();
        for raw_word in text.split_whitespace() {
            let word = raw_word.trim_matches(|c: char| {
                c.is_ascii_punctuation() && c != '/' && c != '.' && c != '_' && c != '-'
            });
            if word.is_empty() {
                continue;
            }
            if known.contains(word) {
                mentioned.insert(word.to_string());
                continue;
            }
            let has_structural = word.contains(['/', '.', '_', '-']);
            if has_structural {
                if let Some(candidates) = basenames.get(word) {
                    if candidates.len() == 1 {
                        mentioned.insert(candidates[0].to_string());
                    }
                }
            }
        }

        known
            .into_iter()
            .filter(|k| mentioned.iter().any(|m| k.contains(m.as_str())))
            .map(|s| s.to_string())
            .collect()
    }

    /// Path of the on-disk tags cache file under the well-known cache subdirectory
    /// (design docs §3/§6: `.aider.tags.cache.v<N>`).
    pub fn cache_file_path(&self, cache_dir_name: &str) -> PathBuf {
        self.root.join(cache_dir_name).join("tags_cache.json")
    }

    /// Loads a previously persisted cache, if present. Unreadable or malformed files
    /// are silently ignored (the cache is advisory, never authoritative).
    pub fn load_cache(&mut self, cache_dir_name: &str) {
        let path = self.cache_file_path(cache_dir_name);
        let Ok(text) = std::fs::read_to_string(&path) else { return };
        let Ok(on_disk) = serde_json::from_str::<HashMap<String, DiskCacheEntry>>(&text) else {
            return;
        };
        for (key, entry) in on_disk {
            let mtime = SystemTime::UNIX_EPOCH
                + std::time::Duration::from_secs_f64(entry.mtime.max(0.0));
            self.cache.insert(key, CacheEntry { mtime, payload: entry.data });
        }
    }

    /// Persists the in-memory cache to disk, creating the cache directory if needed.
    pub fn save_cache(&self, cache_dir_name: &str) -> Result<()> {
        let dir = self.root.join(cache_dir_name);
        std::fs::create_dir_all(&dir)
            .map_err(|source| RetrievalError::Io { path: dir.clone(), source })?;

        let mut on_disk: HashMap<String, DiskCacheEntry> = HashMap::new();
        for (key, entry) in &self.cache {
            let mtime = entry
                .mtime
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_secs_f64())
                .unwrap_or(0.0);
            on_disk.insert(key.clone(), DiskCacheEntry { mtime, data: entry.payload.clone() });
        }

        let path = self.cache_file_path(cache_dir_name);
        let text = serde_json::to_string(&on_disk)
            .map_err(|e| RetrievalError::Cache(e.to_string()))?;
        std::fs::write(&path, text).map_err(|source| RetrievalError::Io { path, source })?;
        Ok(())
    }

    /// Lists repo-relative paths under `abs_dir` exactly `level` separators deeper
    /// (any depth when `level` is `None`).
    pub fn get_rel_fnames_in_directory(
        &self,
        abs_dir: &Path,
        all_files: &[PathBuf],
        level: Option<usize>,
    ) -> Vec<String> {
        let mut out = Vec::new();
        for f in all_files {
            let Ok(rest) = f.strip_prefix(abs_dir) else { continue };
            let depth = rest.components().count();
            if depth == 0 {
                continue;
            }
            if let Some(l) = level {
                if depth != l {
                    continue;
                }
            }
            out.push(self.rel_fname(f));
        }
        out.sort();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_predicate_excludes_tests_unless_requested() {
        let path = Path::new("src/foo_test.rs");
        assert!(!default_predicate(path, false));
        assert!(default_predicate(path, true));
    }

    #[test]
    fn default_predicate_filters_on_extension() {
        assert!(default_predicate(Path::new("main.rs"), false));
        assert!(!default_predicate(Path::new("README.md"), false));
    }

    #[test]
    fn validate_fnames_drops_missing_files_and_warns_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut fg = FileGroup::new(dir.path().to_path_buf());
        let present = dir.path().join("a.rs");
        std::fs::write(&present, "fn a() {}").unwrap();
        let missing = dir.path().join("missing.rs");
        let valid = fg.validate_fnames(&[present.clone(), missing.clone()], false);
        assert_eq!(valid, vec![present]);
        assert!(fg.warned_files.contains(&missing));
    }

    #[test]
    fn cached_function_call_reuses_payload_until_mtime_changes() {
        let dir = tempfile::tempdir().unwrap();
        let mut fg = FileGroup::new(dir.path().to_path_buf());
        let path = dir.path().join("a.rs");
        std::fs::write(&path, "one").unwrap();

        let mut calls = 0;
        let mut call = |fg: &mut FileGroup, calls: &mut i32| {
            fg.cached_function_call(&path, "tags", |p| {
                *calls += 1;
                Ok(serde_json::Value::String(std::fs::read_to_string(p).unwrap()))
            })
            .unwrap()
        };
        let first = call(&mut fg, &mut calls);
        let second = call(&mut fg, &mut calls);
        assert_eq!(first, second);
        assert_eq!(calls, 1);
    }

    #[test]
    fn cache_survives_a_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut fg = FileGroup::new(dir.path().to_path_buf());
        let path = dir.path().join("a.rs");
        std::fs::write(&path, "one").unwrap();
        fg.cached_function_call(&path, "tags", |p| {
            Ok(serde_json::Value::String(std::fs::read_to_string(p).unwrap()))
        })
        .unwrap();

        fg.save_cache(".aider.tags.cache.v4").unwrap();

        let mut reloaded = FileGroup::new(dir.path().to_path_buf());
        reloaded.load_cache(".aider.tags.cache.v4");
        let result = reloaded
            .cached_function_call(&path, "tags", |p| {
                Ok(serde_json::Value::String(std::fs::read_to_string(p).unwrap()))
            })
            .unwrap();
        assert_eq!(result, serde_json::Value::String("one".to_string()));
    }

    #[test]
    fn get_file_mentions_matches_known_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let fg = FileGroup::new(dir.path().to_path_buf());
        let known = vec!["src/lib.rs".to_string(), "src/main.rs".to_string()];
        let mentioned = fg.get_file_mentions("please check src/lib.rs for bugs.", &known);
        assert!(mentioned.contains("src/lib.rs"));
        assert!(!mentioned.contains("src/main.rs"));
    }
}
