//! RepoMap orchestrator (design docs §4.7, C7): ties the file group, tag graph, ranker,
//! renderer, and token budgeter into the single "give me a map that fits" entry point.
//! Grounded in `motleycoder/codemap/repomap.py`.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::error::{Result, RetrievalError};
use crate::file_group::FileGroup;
use crate::tag::Tag;
use crate::tags::extractor::TagExtractor;

use super::budget::TokenBudgeter;
use super::graph::{build_tag_graph, TagGraph};
use super::rank::{rank_tags_legacy_pagerank, rank_weight_and_diffuse, ArgRecord};
use super::renderer::{RenderEntry, Renderer};

/// The only external I/O the core initiates itself (design docs §5): an LLM call
/// deriving free-text search-term fragments from a chat message. Kept as a typed
/// structured-output contract — the prompt template that drives it is out of scope
/// (design docs §1); this trait is the seam an agent loop's LLM adapter plugs into.
pub trait SearchTermAdapter {
    fn search_terms_from_message(&self, message: &str) -> Result<Vec<String>>;
}

/// Caps how many search-term fragments a single LLM call can contribute to ranking
/// (design docs §4.6: "a capped set of search-term fragments").
const MAX_SEARCH_TERMS: usize = 10;

pub struct RepoMap {
    file_group: FileGroup,
    config: RunConfig,
    renderer: Renderer,
    budgeter: TokenBudgeter,
    /// Superset-match cache (design docs §9 Open Question): a graph built from a
    /// larger file set is reused for any request whose files are a subset of it,
    /// trading a little precision (extra files' tags stay in the reused graph) for
    /// far fewer rebuilds across successive requests in the same session.
    graph_cache: Vec<(HashSet<PathBuf>, TagGraph)>,
}

impl RepoMap {
    pub fn new(root: PathBuf, config: RunConfig) -> Result<Self> {
        let mut file_group = FileGroup::new(root);
        file_group.load_cache(&config.cache_dir_name());
        Ok(Self {
            file_group,
            config,
            renderer: Renderer::new(),
            budgeter: TokenBudgeter::new()?,
            graph_cache: Vec::new(),
        })
    }

    pub fn file_group(&self) -> &FileGroup {
        &self.file_group
    }

    pub fn file_group_mut(&mut self) -> &mut FileGroup {
        &mut self.file_group
    }

    pub fn save_cache(&self) -> Result<()> {
        self.file_group.save_cache(&self.config.cache_dir_name())
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Builds a tag graph over every known file under the root, optionally including
    /// test files (design docs §4.7: `inspect_entity` searches with tests, the default
    /// map build does not).
    pub fn get_tag_graph_for_repo(&mut self, with_tests: bool) -> Result<TagGraph> {
        let all = self.file_group.get_all_filenames(with_tests)?;
        self.get_tag_graph(&all)
    }

    /// Drops any cached graph that was built from a file set containing `abs_path`,
    /// since an edit to that file invalidates every graph that includes it (design
    /// docs §6, ported from `file_edit_tool.py`'s `invalidate_tag_graphs`).
    pub fn invalidate_graph_cache(&mut self, abs_path: &Path) {
        self.graph_cache.retain(|(files, _)| !files.contains(abs_path));
    }

    /// Extracts and caches tags for one file, constructing a fresh [`TagExtractor`]
    /// inside the cache closure rather than holding one as a struct field — `self`
    /// can't be borrowed both by `file_group` and by the closure it's given.
    pub fn tags_from_filename(&mut self, abs: &Path, rel: &str) -> Result<Vec<Tag>> {
        let rel_owned = rel.to_string();
        let value = self.file_group.cached_function_call(abs, "tags", move |p| {
            let mut extractor = TagExtractor::new();
            let tags = extractor.extract_file(p, &rel_owned)?;
            serde_json::to_value(tags).map_err(|e| RetrievalError::Cache(e.to_string()))
        })?;
        serde_json::from_value(value).map_err(|e| RetrievalError::Cache(e.to_string()))
    }

    pub fn get_tag_graph(&mut self, fnames: &[PathBuf]) -> Result<TagGraph> {
        let requested: HashSet<PathBuf> = fnames.iter().cloned().collect();

        if self.config.cache_graphs {
            if let Some((_, graph)) =
                self.graph_cache.iter().find(|(set, _)| set.is_superset(&requested))
            {
                return Ok(graph.clone());
            }
        }

        let mut tags = Vec::new();
        for fname in fnames {
            let rel = self.file_group.rel_fname(fname);
            if let Ok(content) = std::fs::read_to_string(fname) {
                self.renderer.code_map.insert(fname.clone(), content);
            }
            tags.extend(self.tags_from_filename(fname, &rel)?);
        }
        let graph = build_tag_graph(tags);

        if self.config.cache_graphs {
            self.graph_cache.push((requested, graph.clone()));
        }
        Ok(graph)
    }

    /// Scores every def tag in `graph` and returns them sorted highest-first.
    pub fn get_ranked_tags(&self, graph: &TagGraph, args: &ArgRecord) -> Vec<Tag> {
        let scores = if self.config.use_old_ranking {
            rank_tags_legacy_pagerank(graph, args)
        } else {
            rank_weight_and_diffuse(graph, args, self.config.diffusion_mult)
        };
        let mut ranked: Vec<Tag> = scores.keys().cloned().collect();
        ranked.sort_by(|a, b| {
            scores[b].partial_cmp(&scores[a]).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.cmp(b))
        });
        ranked
    }

    /// Binary searches over how many top-ranked tags to include, returning the
    /// richest rendering that still fits `self.config.map_tokens`. A render that
    /// panics (the reference implementation catches a `RecursionError` from overly
    /// deep tree-context walks) is treated like "too expensive" and the search backs
    /// off rather than propagating the panic.
    fn find_best_tag_tree(&mut self, ranked: &[Tag]) -> String {
        let mut lo = 0usize;
        let mut hi = ranked.len();
        let mut best = String::new();

        while lo <= hi {
            let mid = lo + (hi - lo) / 2;
            let entries: Vec<RenderEntry> =
                ranked[..mid].iter().cloned().map(RenderEntry::Tag).collect();

            let attempt = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                self.renderer.to_tree(&entries, true, &HashMap::new())
            }));

            let rendered = match attempt {
                Ok(s) => s,
                Err(_) => {
                    if mid == 0 {
                        break;
                    }
                    hi = mid - 1;
                    continue;
                }
            };

            let tokens = self.budgeter.count_tokens(&rendered);
            if tokens <= self.config.map_tokens {
                best = rendered;
                if mid == hi {
                    break;
                }
                lo = mid + 1;
            } else {
                if mid == 0 {
                    break;
                }
                hi = mid - 1;
            }
        }

        best
    }

    /// Builds a repo map over the union of `chat_fnames` and `other_fnames`, scored
    /// and biased by `args`, packed into the configured token budget. Returns `None`
    /// when there is nothing to show (no files, or nothing fits even empty).
    pub fn get_repo_map(
        &mut self,
        chat_fnames: &HashSet<PathBuf>,
        other_fnames: &HashSet<PathBuf>,
        args: &ArgRecord,
    ) -> Result<Option<String>> {
        let mut all: Vec<PathBuf> = chat_fnames.iter().chain(other_fnames.iter()).cloned().collect();
        all.sort();
        all.dedup();
        if all.is_empty() {
            return Ok(None);
        }

        let graph = self.get_tag_graph(&all)?;
        let ranked = self.get_ranked_tags(&graph, args);
        let rendered = self.find_best_tag_tree(&ranked);
        if rendered.trim().is_empty() {
            return Ok(None);
        }

        let mut out = String::new();
        if args.add_prefix {
            if let Some(prefix) = &self.config.repo_content_prefix {
                out.push_str(prefix);
            }
        }
        out.push_str(&rendered);
        Ok(Some(out))
    }

    /// The top-level "build me a map relevant to this chat message" entry point
    /// (design docs §6). Derives mentioned file names, identifier mentions, filename
    /// matches from those identifiers, and (if `llm` is given) a capped set of
    /// search-term fragments via its structured-output call. Falls back progressively
    /// when the tightly-scoped map comes back empty: first widening to every file with
    /// no chat bias, then dropping all bias but the literal search terms.
    pub fn repo_map_from_message(
        &mut self,
        message: &str,
        mentioned_entities: Option<&HashSet<String>>,
        llm: Option<&dyn SearchTermAdapter>,
        chat_fnames: &HashSet<PathBuf>,
        all_fnames: &HashSet<PathBuf>,
    ) -> Result<Option<String>> {
        let all_rel: Vec<String> =
            all_fnames.iter().map(|f| self.file_group.rel_fname(f)).collect();

        let mut mentioned_fnames = self.file_group.get_file_mentions(message, &all_rel);
        let mentioned_idents = get_ident_mentions(message);
        mentioned_fnames.extend(get_ident_filename_matches(&mentioned_idents, &all_rel, 2));

        let search_terms: HashSet<String> = match llm {
            Some(llm) => llm
                .search_terms_from_message(message)?
                .into_iter()
                .take(MAX_SEARCH_TERMS)
                .collect(),
            None => HashSet::new(),
        };

        let other_fnames: HashSet<PathBuf> =
            all_fnames.difference(chat_fnames).cloned().collect();

        let mut args = ArgRecord::new();
        args.chat_fnames = chat_fnames.clone();
        args.other_fnames = other_fnames.clone();
        args.mentioned_fnames = mentioned_fnames;
        args.mentioned_idents = mentioned_idents;
        args.mentioned_entities = mentioned_entities.cloned().unwrap_or_default();
        args.search_terms = search_terms;

        if let Some(map) = self.get_repo_map(chat_fnames, &other_fnames, &args)? {
            return Ok(Some(map));
        }

        let mut widened = args.clone();
        widened.chat_fnames.clear();
        widened.other_fnames = all_fnames.clone();
        if let Some(map) = self.get_repo_map(&HashSet::new(), all_fnames, &widened)? {
            return Ok(Some(map));
        }

        let mut minimal = ArgRecord::new();
        minimal.search_terms = args.search_terms;
        self.get_repo_map(&HashSet::new(), all_fnames, &minimal)
    }
}

/// Tokenizes free text into bare identifiers, as a cheap proxy for "what symbols is
/// the user talking about" (design docs §4.1 supplement, ported from
/// `file_group.py`'s `get_ident_mentions`).
pub fn get_ident_mentions(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Matches identifiers against file stems (case-insensitively), discarding idents no
/// longer than `max_ident_len` as too noisy to be meaningful (ported from
/// `file_group.py`'s `get_ident_filename_matches`).
pub fn get_ident_filename_matches(
    idents: &HashSet<String>,
    all_rel_fnames: &[String],
    max_ident_len: usize,
) -> HashSet<String> {
    let long_idents: HashSet<String> = idents
        .iter()
        .filter(|i| i.len() > max_ident_len)
        .map(|i| i.to_lowercase())
        .collect();
    if long_idents.is_empty() {
        return HashSet::new();
    }
    all_rel_fnames
        .iter()
        .filter(|f| {
            Path::new(f)
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|stem| long_idents.contains(&stem.to_lowercase()))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "orchestrator.test.rs"]
mod tests;
