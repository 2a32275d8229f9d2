//! Tag extraction (design docs §4.2): parses a file, runs its tag query, and produces
//! the crate's own [`Tag`] records (as distinct from tree-sitter-tags' own `Tag` type).

use std::path::Path;

use tree_sitter_tags::TagsContext;

use crate::error::{RetrievalError, Result};
use crate::tag::{Tag, TagKind};

use super::languages::SupportedLanguage;

pub struct TagExtractor {
    context: TagsContext,
}

impl Default for TagExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TagExtractor {
    pub fn new() -> Self {
        Self { context: TagsContext::new() }
    }

    /// Extracts tags for one file. Returns an empty list for unsupported extensions
    /// rather than an error (design docs §4.2: "if unsupported, return empty").
    pub fn extract_file(&mut self, abs_path: &Path, rel_fname: &str) -> Result<Vec<Tag>> {
        let Some(language) = SupportedLanguage::from_path(abs_path) else {
            return Ok(Vec::new());
        };
        let source = std::fs::read_to_string(abs_path).map_err(|source| RetrievalError::Io {
            path: abs_path.to_path_buf(),
            source,
        })?;
        self.extract(&source, abs_path, rel_fname, language)
    }

    pub fn extract(
        &mut self,
        source: &str,
        abs_path: &Path,
        rel_fname: &str,
        language: SupportedLanguage,
    ) -> Result<Vec<Tag>> {
        let config = language.tags_configuration()?;
        let source_bytes = source.as_bytes();

        let (raw_tags, _errors) = self
            .context
            .generate_tags(&config, source_bytes, None)
            .map_err(|e| RetrievalError::GraphBuild(format!("tag generation failed: {e:?}")))?;

        let mut defs: Vec<Tag> = Vec::new();
        let mut refs: Vec<Tag> = Vec::new();

        for raw in raw_tags {
            let raw = raw.map_err(|e| RetrievalError::GraphBuild(format!("tag error: {e:?}")))?;
            let name = std::str::from_utf8(&source_bytes[raw.name_range.clone()])
                .unwrap_or_default()
                .to_string();
            if name.is_empty() {
                continue;
            }
            // 0-based line number: count newlines strictly before the byte offset
            // rather than `.lines().count()`, which is off by one for any offset that
            // falls exactly at the start of a line (the prefix's trailing `\n` still
            // counts as "one more line").
            let start_line = source[..raw.range.start].bytes().filter(|&b| b == b'\n').count() as i64;
            let end_line = if raw.range.end <= source.len() {
                source[..raw.range.end].bytes().filter(|&b| b == b'\n').count() as i64
            } else {
                start_line
            };
            let docstring = if language.has_docstring_convention() && raw.is_definition {
                extract_leading_comment(source, raw.range.start)
            } else {
                String::new()
            };

            let tag = Tag {
                kind: if raw.is_definition { TagKind::Def } else { TagKind::Ref },
                name,
                parent_names: Vec::new(),
                fname: abs_path.to_path_buf(),
                rel_fname: rel_fname.to_string(),
                line: start_line,
                end_line,
                byte_range: (raw.range.start, raw.range.end),
                text: source[raw.range.start..raw.range.end.min(source.len())].to_string(),
                docstring,
                language: Some(language.name().to_string()),
                n_defs: 0,
            };
            if raw.is_definition {
                defs.push(tag);
            } else {
                refs.push(tag);
            }
        }

        assign_parent_names(&mut defs);

        let mut all = defs;
        if all.is_empty() {
            // produces no refs anyway; keep whatever the query found
        }
        if refs.is_empty() && !all.is_empty() {
            refs = synthesize_reference_tags(source, abs_path, rel_fname, &language);
        }
        all.extend(refs);
        Ok(all)
    }
}

/// Approximates "walk ancestors, collect name nodes, keep only ancestors that are
/// themselves definitions" using byte-range containment among already-extracted
/// `def` tags (the tag query does not expose tree-sitter node ancestry directly).
fn assign_parent_names(defs: &mut [Tag]) {
    let snapshot: Vec<(usize, usize, String)> =
        defs.iter().map(|t| (t.byte_range.0, t.byte_range.1, t.name.clone())).collect();
    for (i, tag) in defs.iter_mut().enumerate() {
        let (s, e) = tag.byte_range;
        let mut enclosing: Vec<(usize, usize, String)> = snapshot
            .iter()
            .enumerate()
            .filter(|(j, (os, oe, _))| *j != i && *os <= s && *oe >= e && !(*os == s && *oe == e))
            .map(|(_, t)| t.clone())
            .collect();
        enclosing.sort_by_key(|(os, oe, _)| (*os, std::cmp::Reverse(*oe)));
        tag.parent_names = enclosing.into_iter().map(|(_, _, name)| name).collect();
    }
}

/// Fallback reference extraction (design docs §4.2): when a file produced defs but no
/// refs, tokenize identifiers and synthesize `ref` tags with empty byte ranges and
/// line `-1`.
fn synthesize_reference_tags(
    source: &str,
    abs_path: &Path,
    rel_fname: &str,
    language: &SupportedLanguage,
) -> Vec<Tag> {
    let mut out = Vec::new();
    let mut chars = source.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if !(c.is_alphabetic() || c == '_') {
            continue;
        }
        let mut end = start + c.len_utf8();
        while let Some(&(i, c2)) = chars.peek() {
            if c2.is_alphanumeric() || c2 == '_' {
                end = i + c2.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        out.push(Tag {
            kind: TagKind::Ref,
            name: source[start..end].to_string(),
            parent_names: Vec::new(),
            fname: abs_path.to_path_buf(),
            rel_fname: rel_fname.to_string(),
            line: -1,
            end_line: -1,
            byte_range: (0, 0),
            text: String::new(),
            docstring: String::new(),
            language: Some(language.name().to_string()),
            n_defs: 0,
        });
    }
    out
}

fn extract_leading_comment(source: &str, def_start: usize) -> String {
    let before = &source[..def_start.min(source.len())];
    let mut lines: Vec<&str> = before.lines().collect();
    let mut doc_lines = Vec::new();
    while let Some(line) = lines.pop() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with("///") || trimmed.starts_with("//!") {
            doc_lines.push(trimmed.trim_start_matches("///").trim_start_matches("//!").trim());
        } else if trimmed.starts_with('#') || trimmed.starts_with("//") {
            doc_lines.push(trimmed.trim_start_matches('#').trim_start_matches("//").trim());
        } else {
            break;
        }
    }
    doc_lines.reverse();
    doc_lines.join("\n")
}

#[path = "extractor.test.rs"]
#[cfg(test)]
mod tests;
