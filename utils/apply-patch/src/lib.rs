//! Structural search/replace edit engine (§4.7 / §7 / §8 of the design docs).
//!
//! Applies a `search`/`replace` pair to file content with three increasingly
//! tolerant strategies, and, on total failure, surfaces a close-match hint so the
//! caller can repair its next patch attempt. Every successful edit is an atomic
//! whole-file write; there is no partial mutation.

mod close_match;
mod error;
mod strategies;

use std::fs;
use std::path::Path;

pub use error::{EditError, Result};
pub use strategies::{from_lines, is_blank, normalize_block, replace_part, to_lines};

/// Applies `search`/`replace` to in-memory `content`. Returns the new content on
/// success, or a close-match hint (possibly empty) on failure.
///
/// This is the pure, I/O-free core; [`edit_file`] wraps it with the actual file
/// read/write.
pub fn edit_content(content: &str, search: &str, replace: &str) -> Result<(Option<String>, String)> {
    match replace_part(content, search, replace)? {
        Some(new_content) => Ok((Some(new_content), String::new())),
        None => {
            let whole_lines = to_lines(&normalize_block(content));
            let search_lines = to_lines(&normalize_block(search));
            let hint = close_match::find_close_match(&whole_lines, &search_lines).unwrap_or_default();
            Ok((None, hint))
        }
    }
}

/// Applies a structural edit to the file at `path`, creating it if `search` is blank.
///
/// Returns `(applied, close_match)`: `close_match` is empty on success or when no
/// sufficiently similar region was found on failure.
pub fn edit_file(path: &Path, search: &str, replace: &str) -> Result<(bool, String)> {
    let exists = path.exists();
    let content = if exists {
        fs::read_to_string(path).map_err(|source| EditError::Io {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        String::new()
    };

    let (new_content, hint) = edit_content(&content, search, replace)?;

    match new_content {
        Some(new_content) if new_content != content => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|source| EditError::Io {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
            }
            fs::write(path, &new_content).map_err(|source| EditError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::debug!(path = %path.display(), "edit_file applied");
            Ok((true, String::new()))
        }
        Some(_) => {
            // New content identical to the old: nothing to write, but the match
            // succeeded (e.g. search == replace). Treat as applied with no diff.
            Ok((true, String::new()))
        }
        None => {
            tracing::debug!(path = %path.display(), "edit_file found no match");
            Ok((false, hint))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn s1_exact_edit() {
        let content = "def f():\n    return 1\n";
        let (new_content, hint) =
            edit_content(content, "    return 1\n", "    return 2\n").unwrap();
        assert_eq!(new_content.as_deref(), Some("def f():\n    return 2\n"));
        assert_eq!(hint, "");
    }

    #[test]
    fn s2_whitespace_tolerant_edit() {
        let content = "class A:\n    def m(self):\n        x = 1\n";
        let search = "def m(self):\n    x = 1\n";
        let replace = "def m(self):\n    x = 2\n";
        let (new_content, _) = edit_content(content, search, replace).unwrap();
        assert_eq!(
            new_content.as_deref(),
            Some("class A:\n    def m(self):\n        x = 2\n")
        );
    }

    #[test]
    fn s3_close_match_hint_on_failure() {
        let content = "foo\nbar\nbaz\n";
        let search = "fooo\nbar\nbaz\n";
        let (new_content, hint) = edit_content(content, search, "replacement\n").unwrap();
        assert!(new_content.is_none());
        assert_eq!(hint, "foo\nbar\nbaz");
    }

    #[test]
    fn blank_search_appends_to_new_file() {
        let (new_content, _) = edit_content("", "", "hello\n").unwrap();
        assert_eq!(new_content.as_deref(), Some("hello\n"));
    }

    #[test]
    fn ellipsis_bridged_edit() {
        let content = "fn a() {\n    1\n}\n\nfn b() {\n    2\n}\n\nfn c() {\n    3\n}\n";
        let search = "fn a() {\n...\nfn c() {\n    3\n}\n";
        let replace = "fn a() {\n...\nfn c() {\n    4\n}\n";
        let (new_content, _) = edit_content(content, search, replace).unwrap();
        assert_eq!(
            new_content.as_deref(),
            Some("fn a() {\n    1\n}\n\nfn b() {\n    2\n}\n\nfn c() {\n    4\n}\n")
        );
    }

    #[test]
    fn ellipsis_unequal_markers_is_ambiguous() {
        let content = "a\nb\nc\n";
        let search = "a\n...\nc\n";
        let replace = "a\nc\n";
        let err = edit_content(content, search, replace).unwrap_err();
        assert!(matches!(err, EditError::AmbiguousEllipsis(_)));
    }

    #[test]
    fn edit_file_creates_new_file_on_blank_search() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("new.txt");
        let (applied, hint) = edit_file(&path, "", "hello\n").unwrap();
        assert!(applied);
        assert_eq!(hint, "");
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn edit_file_round_trip_via_inverse_patch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.rs");
        fs::write(&path, "fn f() -> i32 {\n    1\n}\n").unwrap();

        let (applied, _) = edit_file(&path, "    1\n", "    2\n").unwrap();
        assert!(applied);
        assert_eq!(fs::read_to_string(&path).unwrap(), "fn f() -> i32 {\n    2\n}\n");

        let (applied, _) = edit_file(&path, "    2\n", "    1\n").unwrap();
        assert!(applied);
        assert_eq!(fs::read_to_string(&path).unwrap(), "fn f() -> i32 {\n    1\n}\n");
    }
}
