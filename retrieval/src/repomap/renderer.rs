//! Renderer (design docs §4.4, C4): compact multi-file code excerpts keyed on "lines
//! of interest", with per-(file, line-set) memoization. Ported from
//! `motleycoder/codemap/render.py` and `graph.py`'s tag-representation methods.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;

use crate::tag::Tag;

use super::graph::{ParentChain, TagGraph};
use super::tree_context::TreeContext;
use crate::tags::languages::SupportedLanguage;

const MAX_LINE_LENGTH: usize = 100;

/// Data file mapping `language -> [builtin identifier, ...]`, suppressed from the
/// "referenced entities" summary (design docs §4.4/§6).
static BUILTINS_BY_LANG: Lazy<HashMap<String, Vec<String>>> = Lazy::new(|| {
    serde_json::from_str(include_str!("builtins_by_lang.json")).unwrap_or_default()
});

fn is_builtin(tag: &Tag) -> bool {
    tag.language
        .as_ref()
        .and_then(|lang| BUILTINS_BY_LANG.get(lang))
        .is_some_and(|names| names.contains(&tag.name))
}

/// Either a real tag, or a bare file marker (design docs §4.4: "a mix with
/// tuple-encoded file-only entries") used by the legacy ranker for untagged files.
#[derive(Debug, Clone)]
pub enum RenderEntry {
    Tag(Tag),
    FileOnly(String),
}

impl RenderEntry {
    fn rel_fname(&self) -> &str {
        match self {
            RenderEntry::Tag(t) => &t.rel_fname,
            RenderEntry::FileOnly(f) => f,
        }
    }

    fn sort_key(&self) -> (&str, i64) {
        match self {
            RenderEntry::Tag(t) => (&t.rel_fname, t.line),
            RenderEntry::FileOnly(f) => (f.as_str(), -1),
        }
    }
}

pub struct Renderer {
    /// Absolute filename -> full source text, populated during graph build.
    pub code_map: HashMap<PathBuf, String>,
    tree_cache: HashMap<(String, Vec<i64>), String>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self { code_map: HashMap::new(), tree_cache: HashMap::new() }
    }

    /// Renders a multi-file tree view over `entries`, in `(rel_fname, line)` order,
    /// optionally forcing extra per-file line numbers into the view.
    pub fn to_tree(
        &mut self,
        entries: &[RenderEntry],
        render_file_name: bool,
        additional_lines: &HashMap<String, Vec<i64>>,
    ) -> String {
        if entries.is_empty() {
            return String::new();
        }

        let mut sorted: Vec<RenderEntry> = entries.to_vec();
        sorted.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let mut output = String::new();
        let mut cur_fname: Option<String> = None;
        let mut cur_abs_fname: Option<PathBuf> = None;
        let mut lois: Option<Vec<i64>> = None;

        // A trailing `None` flushes the final file's pending lines-of-interest,
        // mirroring the reference implementation's dummy sentinel tag.
        for entry in sorted.iter().map(Some).chain(std::iter::once(None)) {
            let this_fname = entry.map(|e| e.rel_fname().to_string());
            if this_fname != cur_fname {
                if let Some(mut loi) = lois.take() {
                    output.push('\n');
                    if render_file_name {
                        if let Some(f) = &cur_fname {
                            output.push_str(f);
                            output.push_str(":\n");
                        }
                    }
                    if let (Some(f), Some(abs)) = (&cur_fname, &cur_abs_fname) {
                        if let Some(extra) = additional_lines.get(f) {
                            loi.extend(extra.iter().copied());
                        }
                        let code = self.code_map.get(abs).cloned().unwrap_or_default();
                        output.push_str(&self.render_tree(f, &loi, &code, true));
                    }
                } else if let Some(f) = &cur_fname {
                    if render_file_name {
                        output.push('\n');
                        output.push_str(f);
                        output.push('\n');
                    }
                }

                match entry {
                    Some(RenderEntry::Tag(t)) => {
                        lois = Some(Vec::new());
                        cur_abs_fname = Some(t.fname.clone());
                    }
                    _ => lois = None,
                }
                cur_fname = this_fname;
            }

            if let (Some(l), Some(RenderEntry::Tag(t))) = (lois.as_mut(), entry) {
                l.push(t.line);
            }
        }

        Self::truncate_lines(&output)
    }

    fn render_tree(&mut self, rel_fname: &str, lois: &[i64], code: &str, line_number: bool) -> String {
        let mut sorted_lois: Vec<i64> = lois.to_vec();
        sorted_lois.sort_unstable();
        sorted_lois.dedup();

        let key = (rel_fname.to_string(), sorted_lois.clone());
        if let Some(cached) = self.tree_cache.get(&key) {
            return cached.clone();
        }

        let mut code = code.to_string();
        if !code.is_empty() && !code.ends_with('\n') {
            code.push('\n');
        }

        let mut ctx = TreeContext::new(&code, line_number);
        if let Some(language) = SupportedLanguage::from_path(Path::new(rel_fname)) {
            if let Ok(mut parser) = language.parser() {
                if let Some(tree) = parser.parse(&code, None) {
                    ctx.walk_tree(&tree);
                }
            }
        }

        let lois_usize: Vec<usize> =
            sorted_lois.iter().filter(|&&l| l >= 0).map(|&l| l as usize).collect();
        ctx.add_lois(lois_usize);
        ctx.add_context();
        let rendered = ctx.format();

        self.tree_cache.insert(key, rendered.clone());
        rendered
    }

    /// One tag's body plus a parent-chain header, optionally with a "referenced
    /// entities" summary of its outgoing `include_in_summary` children (design docs
    /// §4.4).
    pub fn get_tag_representation(
        &mut self,
        graph: &TagGraph,
        tag: &Tag,
        parent_details: bool,
        max_lines: usize,
        force_full: bool,
    ) -> Option<String> {
        if !graph.contains(tag) {
            return None;
        }

        let mut header_lines = vec![format!("{}:", tag.rel_fname)];
        if !parent_details {
            if !tag.parent_names.is_empty() {
                header_lines.push(format!("{}.{}:", tag.parent_names.join("."), tag.name));
            }
        } else {
            match graph.get_parents(tag) {
                ParentChain::Fallback(s) => header_lines.push(s),
                ParentChain::Tags(parents) if !parents.is_empty() => {
                    let entries: Vec<RenderEntry> =
                        parents.into_iter().map(RenderEntry::Tag).collect();
                    header_lines = vec![self.to_tree(&entries, true, &HashMap::new())];
                }
                ParentChain::Tags(_) => {}
            }
        }

        let mut tag_repr_lines = header_lines;
        tag_repr_lines.push(Self::text_with_line_numbers(tag));
        let tag_repr = tag_repr_lines.join("\n");
        let n_lines = tag_repr.lines().count();

        if force_full || n_lines <= max_lines {
            let children: Vec<Tag> = graph
                .successors_with_summary_flag(tag, true)
                .into_iter()
                .filter(|c| {
                    !(c.fname == tag.fname
                        && c.byte_range.0 >= tag.byte_range.0
                        && c.byte_range.1 <= tag.byte_range.1)
                })
                .filter(|c| !is_builtin(c))
                .cloned()
                .collect();

            let mut out = vec![tag_repr];
            if !children.is_empty() {
                let entries: Vec<RenderEntry> =
                    children.into_iter().map(RenderEntry::Tag).collect();
                let children_summary = self.to_tree(&entries, true, &HashMap::new());
                if n_lines + children_summary.lines().count() < max_lines {
                    out.push("Referenced entities summary:".to_string());
                    out.push(children_summary);
                }
            }
            Some(out.join("\n"))
        } else {
            let children: Vec<Tag> = graph
                .successors_with_summary_flag(tag, true)
                .into_iter()
                .filter(|c| !is_builtin(c))
                .cloned()
                .collect();
            let mut entries = vec![RenderEntry::Tag(tag.clone())];
            entries.extend(children.into_iter().map(RenderEntry::Tag));
            Some(self.to_tree(&entries, true, &HashMap::new()))
        }
    }

    /// Renders a whole file: for files with no tags at all, a raw numbered dump
    /// truncated at `max_lines`; otherwise root-level `def` spans plus raw filler
    /// lines for everything in between (design docs §4.4).
    pub fn get_file_representation(
        &mut self,
        graph: &TagGraph,
        abs_fname: &Path,
        rel_fname: &str,
        content: &str,
        max_lines: usize,
    ) -> String {
        let tags: Vec<Tag> = graph.nodes().filter(|t| t.fname == abs_fname).cloned().collect();
        let file_lines: Vec<&str> = content.split('\n').collect();

        if tags.is_empty() {
            let repr = file_lines
                .iter()
                .take(max_lines)
                .enumerate()
                .map(|(i, line)| Self::render_line(line, (i as i64) + 1))
                .collect::<Vec<_>>()
                .join("\n");
            if file_lines.len() > max_lines {
                return format!("{repr}\n... and {} more lines", file_lines.len() - max_lines);
            }
            return repr;
        }

        let root_tags: Vec<&Tag> = tags.iter().filter(|t| t.parent_names.is_empty()).collect();
        let mut extra_lines: Vec<i64> = Vec::new();
        let mut i: i64 = 0;
        while (i as usize) < file_lines.len() {
            if let Some(tag) = root_tags.iter().find(|t| t.line <= i && i <= t.end_line) {
                i = tag.end_line + 1;
            } else {
                extra_lines.push(i);
                i += 1;
            }
        }

        let mut additional = HashMap::new();
        additional.insert(rel_fname.to_string(), extra_lines);
        let entries: Vec<RenderEntry> = tags.into_iter().map(RenderEntry::Tag).collect();
        self.to_tree(&entries, true, &additional)
    }

    pub(crate) fn text_with_line_numbers(tag: &Tag) -> String {
        tag.text
            .split('\n')
            .enumerate()
            .map(|(i, line)| Self::render_line(line, (i as i64) + 1 + tag.line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_line(line: &str, number: i64) -> String {
        format!("{number:>3}│{line}")
    }

    fn truncate_lines(output: &str) -> String {
        if output.is_empty() {
            return String::new();
        }
        let truncated: String = output
            .split('\n')
            .map(|line| {
                if line.chars().count() > MAX_LINE_LENGTH {
                    line.chars().take(MAX_LINE_LENGTH).collect::<String>()
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!("{truncated}\n")
    }
}

#[cfg(test)]
#[path = "renderer.test.rs"]
mod tests;
