//! `Tag`: the atomic unit of the code map (design docs §3), grounded on
//! `motleycoder/codemap/tag.py`'s field set.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TagKind {
    Def,
    Ref,
    File,
}

impl TagKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TagKind::Def => "def",
            TagKind::Ref => "ref",
            TagKind::File => "file",
        }
    }
}

impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed symbol occurrence: a definition, a reference, or (for `file`-kind tags) a
/// whole-file root node. Immutable after construction; hashable/orderable by its full
/// tuple so that sorting tags is total and deterministic (required by the Renderer's
/// `to_tree` ordering and the binary-search packing's stable ranking).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub kind: TagKind,
    pub name: String,
    pub parent_names: Vec<String>,
    pub fname: PathBuf,
    pub rel_fname: String,
    pub line: i64,
    pub end_line: i64,
    pub byte_range: (usize, usize),
    pub text: String,
    pub docstring: String,
    pub language: Option<String>,
    /// Populated during graph build: for `ref` tags, the number of candidate
    /// definitions discovered for this name.
    pub n_defs: u32,
}

impl Tag {
    /// The dotted full name: `parent_names` + `name` for defs, bare `name` for refs.
    pub fn full_name(&self) -> String {
        if self.kind == TagKind::Def && !self.parent_names.is_empty() {
            let mut parts = self.parent_names.clone();
            parts.push(self.name.clone());
            parts.join(".")
        } else {
            self.name.clone()
        }
    }

    /// A sentinel tag representing a bare file, used as a standalone graph root when a
    /// file produced no other tags.
    pub fn file_node(fname: &Path, rel_fname: &str, language: Option<String>) -> Self {
        Self {
            kind: TagKind::File,
            name: String::new(),
            parent_names: Vec::new(),
            fname: fname.to_path_buf(),
            rel_fname: rel_fname.to_string(),
            line: 0,
            end_line: 0,
            byte_range: (0, 0),
            text: String::new(),
            docstring: String::new(),
            language,
            n_defs: 0,
        }
    }

    /// The full tuple a `Tag` is hashed, compared, and ordered by (design docs §3).
    /// Two synthesized `ref` tags for the same identifier in the same file share
    /// `name`/`line`/`byte_range`, so `parent_names`, `text`, `docstring`, and
    /// `language` must all be included or such tags collide in `HashSet`/`HashMap`
    /// keys and in `TagGraph`'s node index.
    #[allow(clippy::type_complexity)]
    fn sort_key(
        &self,
    ) -> (String, TagKind, i64, i64, String, (usize, usize), &Vec<String>, &str, &str, &Option<String>)
    {
        (
            self.rel_fname.clone(),
            self.kind,
            self.line,
            self.end_line,
            self.name.clone(),
            self.byte_range,
            &self.parent_names,
            &self.text,
            &self.docstring,
            &self.language,
        )
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key() && self.fname == other.fname
    }
}
impl Eq for Tag {}

impl std::hash::Hash for Tag {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.rel_fname.hash(state);
        self.kind.hash(state);
        self.line.hash(state);
        self.end_line.hash(state);
        self.name.hash(state);
        self.byte_range.hash(state);
        self.parent_names.hash(state);
        self.text.hash(state);
        self.docstring.hash(state);
        self.language.hash(state);
        self.fname.hash(state);
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Tag {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def_tag(name: &str, parents: &[&str]) -> Tag {
        Tag {
            kind: TagKind::Def,
            name: name.to_string(),
            parent_names: parents.iter().map(|s| s.to_string()).collect(),
            fname: PathBuf::from("/repo/a.rs"),
            rel_fname: "a.rs".to_string(),
            line: 0,
            end_line: 1,
            byte_range: (0, 10),
            text: "fn a() {}".to_string(),
            docstring: String::new(),
            language: Some("rust".to_string()),
            n_defs: 0,
        }
    }

    #[test]
    fn full_name_includes_parent_chain_for_defs() {
        let t = def_tag("method", &["Outer", "Inner"]);
        assert_eq!(t.full_name(), "Outer.Inner.method");
    }

    #[test]
    fn full_name_is_bare_for_refs() {
        let mut t = def_tag("method", &["Outer"]);
        t.kind = TagKind::Ref;
        assert_eq!(t.full_name(), "method");
    }

    #[test]
    fn tags_are_hashable_and_orderable() {
        use std::collections::HashSet;
        let a = def_tag("a", &[]);
        let b = def_tag("b", &[]);
        let mut set = HashSet::new();
        set.insert(a.clone());
        assert!(set.contains(&a));
        assert!(!set.contains(&b));
        assert!(a < b);
    }
}
