//! Ranking (design docs §4.5, C5): scores every `def` tag in a [`TagGraph`] so the
//! orchestrator can pack the highest-value ones into a token budget. Two interchangeable
//! algorithms are offered, selected by `RunConfig.use_old_ranking`: the default
//! weight-and-diffuse scorer, and a legacy personalized-PageRank scorer kept for parity
//! with the reference implementation's `rank.py`.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use petgraph::graph::DiGraph;

use crate::tag::Tag;

use super::graph::{only_defs, TagGraph};
use super::pagerank::PageRanker;

/// Caller-supplied hints that bias ranking toward what's relevant to the current request
/// (design docs §6: `ArgRecord`).
#[derive(Debug, Clone, Default)]
pub struct ArgRecord {
    pub chat_fnames: HashSet<PathBuf>,
    pub other_fnames: HashSet<PathBuf>,
    pub mentioned_fnames: HashSet<String>,
    pub mentioned_idents: HashSet<String>,
    pub mentioned_entities: HashSet<String>,
    pub search_terms: HashSet<String>,
    pub add_prefix: bool,
}

impl ArgRecord {
    pub fn new() -> Self {
        Self { add_prefix: true, ..Default::default() }
    }
}

/// Sample median, for use as a fallback score on untagged files so they interleave
/// sensibly with scored defs rather than always sorting last.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Per-absolute-filename personalization mass: `100 / n` split over the chat files,
/// zero elsewhere (design docs §4.5).
pub fn weights_from_abs_fnames(
    chat_fnames: &HashSet<PathBuf>,
    all_fnames: &[PathBuf],
) -> HashMap<PathBuf, f64> {
    if all_fnames.is_empty() {
        return HashMap::new();
    }
    let personalize = 100.0 / all_fnames.len() as f64;
    chat_fnames
        .iter()
        .filter(|f| all_fnames.contains(f))
        .map(|f| (f.clone(), personalize))
        .collect()
}

/// Same idea as [`weights_from_abs_fnames`] but keyed by relative path, for
/// `mentioned_fnames`.
pub fn weights_from_rel_fnames(
    mentioned_fnames: &HashSet<String>,
    all_rel_fnames: &[String],
) -> HashMap<String, f64> {
    if all_rel_fnames.is_empty() {
        return HashMap::new();
    }
    let personalize = 100.0 / all_rel_fnames.len() as f64;
    mentioned_fnames
        .iter()
        .filter(|f| all_rel_fnames.contains(f))
        .map(|f| (f.clone(), personalize))
        .collect()
}

/// Per-def weight for defs whose file is in `mentioned`, normalized by what's typical
/// in the codebase: each matching file's defs share `median(per-file def count) /
/// (that file's def count)` (ported from `rank.py::weights_from_fnames`).
fn weights_from_fnames<K: Eq + std::hash::Hash + Clone>(
    defs: &TagGraph,
    key_of: impl Fn(&Tag) -> K,
    mentioned: &HashSet<K>,
) -> HashMap<Tag, f64> {
    let mut fname_counts: HashMap<K, usize> = HashMap::new();
    for tag in defs.nodes() {
        let key = key_of(tag);
        if mentioned.contains(&key) {
            *fname_counts.entry(key).or_insert(0) += 1;
        }
    }
    if fname_counts.is_empty() {
        return HashMap::new();
    }

    let counts: Vec<f64> = fname_counts.values().map(|&c| c as f64).collect();
    let typical_count = median(&counts);

    let mut weights = HashMap::new();
    for tag in defs.nodes() {
        if let Some(&count) = fname_counts.get(&key_of(tag)) {
            weights.insert(tag.clone(), typical_count / count as f64);
        }
    }
    weights
}

/// Default ranker (design docs §4.5): additively scores each def tag against `args`,
/// then diffuses a fraction of each tag's (pre-diffusion) weight to the defs it
/// references, capturing "this def matters because something important calls it"
/// without the cost of iterating PageRank to convergence. Transcribed from
/// `rank.py::rank_tags_new`.
pub fn rank_weight_and_diffuse(
    graph: &TagGraph,
    args: &ArgRecord,
    diffusion_mult: f64,
) -> HashMap<Tag, f64> {
    let defs = only_defs(graph);

    let mentioned_entities_clean: HashSet<String> = args
        .mentioned_entities
        .iter()
        .map(|name| name.rsplit('.').next().unwrap_or(name).to_string())
        .collect();

    let mut weights: HashMap<Tag, f64> = defs.nodes().map(|t| (t.clone(), 0.0)).collect();

    // Mentioned idents / entities.
    for tag in defs.nodes() {
        if args.chat_fnames.contains(&tag.fname) && mentioned_entities_clean.contains(&tag.name) {
            *weights.entry(tag.clone()).or_insert(0.0) += 3.0;
        } else if args.mentioned_idents.contains(&tag.name) {
            *weights.entry(tag.clone()).or_insert(0.0) += 1.0;
        }
    }

    // Mentioned files.
    for (tag, weight) in weights_from_fnames(&defs, |t| t.rel_fname.clone(), &args.mentioned_fnames)
    {
        *weights.entry(tag).or_insert(0.0) += 0.2 * weight;
    }

    // Chat files.
    for (tag, weight) in weights_from_fnames(&defs, |t| t.fname.clone(), &args.chat_fnames) {
        *weights.entry(tag).or_insert(0.0) += 0.5 * weight;
    }

    // Search terms: distribute `median(matches per term) / matches for this term`
    // among the defs whose text contains that term.
    let mut tag_matches: HashMap<&str, Vec<Tag>> = HashMap::new();
    for term in &args.search_terms {
        for tag in defs.nodes() {
            if tag.text.contains(term.as_str()) {
                tag_matches.entry(term.as_str()).or_default().push(tag.clone());
            }
        }
    }
    if !tag_matches.is_empty() {
        let counts: Vec<f64> = tag_matches.values().map(|tags| tags.len() as f64).collect();
        let typical_search_count = median(&counts);
        for tags in tag_matches.values() {
            let share = typical_search_count / tags.len() as f64;
            for tag in tags {
                *weights.entry(tag.clone()).or_insert(0.0) += share;
            }
        }
    }

    // Diffuse: every edge u -> v adds u's pre-diffusion weight (read from a snapshot,
    // so diffusion is order-independent) times `diffusion_mult` to v, undivided.
    let snapshot = weights.clone();
    for tag in defs.nodes() {
        let before = snapshot.get(tag).copied().unwrap_or(0.0);
        for (target, _meta) in defs.out_edges(tag) {
            *weights.entry(target.clone()).or_insert(0.0) += before * diffusion_mult;
        }
    }

    weights
}

/// Legacy ranker (design docs §4.5): personalized PageRank run over a file-level
/// projection of the def graph, then redistributed down to individual defs in
/// proportion to how often each is referenced from outside its own file. Kept for
/// parity with the reference implementation's PPR-based `rank.py`.
pub fn rank_tags_legacy_pagerank(graph: &TagGraph, args: &ArgRecord) -> HashMap<Tag, f64> {
    let defs = only_defs(graph);
    let def_tags: Vec<&Tag> = defs.nodes().collect();
    if def_tags.is_empty() {
        return HashMap::new();
    }

    let all_fnames: Vec<PathBuf> = {
        let mut v: Vec<PathBuf> = def_tags.iter().map(|t| t.fname.clone()).collect();
        v.sort();
        v.dedup();
        v
    };
    let all_rel_fnames: Vec<String> = {
        let mut v: Vec<String> = def_tags.iter().map(|t| t.rel_fname.clone()).collect();
        v.sort();
        v.dedup();
        v
    };

    let abs_weights = weights_from_abs_fnames(&args.chat_fnames, &all_fnames);
    let rel_weights = weights_from_rel_fnames(&args.mentioned_fnames, &all_rel_fnames);

    let mut personalization: HashMap<String, f64> = HashMap::new();
    for fname in &all_rel_fnames {
        let mut mass = 0.0;
        if let Some(tag) = def_tags.iter().find(|t| &t.rel_fname == fname) {
            mass += abs_weights.get(&tag.fname).copied().unwrap_or(0.0);
        }
        mass += rel_weights.get(fname).copied().unwrap_or(0.0);
        if mass > 0.0 {
            personalization.insert(fname.clone(), mass);
        }
    }

    // Aggregate cross-file reference counts between files into a single weighted edge.
    let mut edge_counts: HashMap<(String, String), f64> = HashMap::new();
    for tag in &def_tags {
        for (target, _meta) in defs.out_edges(tag) {
            if target.rel_fname == tag.rel_fname {
                continue;
            }
            *edge_counts.entry((tag.rel_fname.clone(), target.rel_fname.clone())).or_insert(0.0) +=
                1.0;
        }
    }

    let mut file_graph: DiGraph<String, f64> = DiGraph::new();
    let mut node_of: HashMap<String, _> = HashMap::new();
    for fname in &all_rel_fnames {
        let idx = file_graph.add_node(fname.clone());
        node_of.insert(fname.clone(), idx);
    }
    for ((src, dst), count) in edge_counts {
        file_graph.add_edge(node_of[&src], node_of[&dst], count.sqrt());
    }

    let file_ranks = PageRanker::default().rank(&file_graph, |w: &f64| *w, &personalization);

    // Redistribute each file's rank across its defs, weighted by in-graph reference count.
    let mut in_degree: HashMap<&Tag, f64> = def_tags.iter().map(|&t| (t, 0.0)).collect();
    for tag in &def_tags {
        for (target, _meta) in defs.out_edges(tag) {
            if let Some(entry) = def_tags.iter().find(|t| **t == target) {
                *in_degree.entry(entry).or_insert(0.0) += 1.0;
            }
        }
    }

    let mut result = HashMap::new();
    for fname in &all_rel_fnames {
        let file_rank = file_ranks.get(fname).copied().unwrap_or(0.0);
        let file_defs: Vec<&Tag> =
            def_tags.iter().filter(|t| &t.rel_fname == fname).copied().collect();
        let total_in: f64 = file_defs.iter().map(|t| in_degree[*t] + 1.0).sum();
        for tag in file_defs {
            let share = (in_degree[tag] + 1.0) / total_in;
            result.insert(tag.clone(), file_rank * share);
        }
    }
    result
}

#[cfg(test)]
#[path = "rank.test.rs"]
mod tests;
