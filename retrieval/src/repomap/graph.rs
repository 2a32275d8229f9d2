//! TagGraph builder (design docs §4.3, C3): a directed multigraph over [`Tag`]s.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::tag::{Tag, TagKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeMeta {
    pub include_in_summary: bool,
}

/// Either the chain of ancestor definition tags, or (when the graph has no matching
/// `def` ancestor despite a nonempty `parent_names`) the dotted fallback string. Mirrors
/// the type-ambiguous return of the reference implementation's `get_parents`.
#[derive(Debug, Clone)]
pub enum ParentChain {
    Tags(Vec<Tag>),
    Fallback(String),
}

#[derive(Clone)]
pub struct TagGraph {
    graph: DiGraph<Tag, EdgeMeta>,
    index_of: HashMap<Tag, NodeIndex>,
}

impl TagGraph {
    pub fn nodes(&self) -> impl Iterator<Item = &Tag> {
        self.graph.node_weights()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Outgoing edges whose target has `include_in_summary == value`.
    pub fn successors_with_summary_flag(&self, tag: &Tag, value: bool) -> Vec<&Tag> {
        let Some(&idx) = self.index_of.get(tag) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .filter(|e| e.weight().include_in_summary == value)
            .map(|e| &self.graph[e.target()])
            .collect()
    }

    pub fn out_edges(&self, tag: &Tag) -> Vec<(&Tag, EdgeMeta)> {
        let Some(&idx) = self.index_of.get(tag) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (&self.graph[e.target()], *e.weight()))
            .collect()
    }

    /// Ancestor def chain for `tag`, or the dotted fallback string if the graph has no
    /// matching ancestor despite a nonempty `parent_names` (design docs §4.3 note).
    pub fn get_parents(&self, tag: &Tag) -> ParentChain {
        if tag.parent_names.is_empty() {
            return ParentChain::Tags(Vec::new());
        }
        let Some(&idx) = self.index_of.get(tag) else {
            return ParentChain::Fallback(format!("{}.{}:", tag.parent_names.join("."), tag.name));
        };
        let parents: Vec<Tag> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| self.graph[e.source()].clone())
            .filter(|t| t.kind == TagKind::Def)
            .collect();
        if parents.is_empty() {
            tracing::warn!(tag = %tag.full_name(), "no parent found for tag with nonempty parent names");
            return ParentChain::Fallback(format!("{}.{}:", tag.parent_names.join("."), tag.name));
        }
        ParentChain::Tags(parents)
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.index_of.contains_key(tag)
    }

    /// Finds tags by name (dotted `Parent.method` form matches both the parent and
    /// the bare method name), optionally narrowed to files whose relative path
    /// contains `file_hint` as a substring (design docs §4.7, `get_tags_from_entity_name`).
    pub fn get_tags_from_entity_name(&self, name: Option<&str>, file_hint: Option<&str>) -> Vec<&Tag> {
        self.graph
            .node_weights()
            .filter(|t| match name {
                None => true,
                Some(n) => t.kind == TagKind::Def && (t.full_name() == n || t.name == n),
            })
            .filter(|t| match file_hint {
                None => true,
                Some(hint) => t.rel_fname.contains(hint),
            })
            .collect()
    }
}

fn index_by_tag(graph: &DiGraph<Tag, EdgeMeta>) -> HashMap<Tag, NodeIndex> {
    graph.node_indices().map(|idx| (graph[idx].clone(), idx)).collect()
}

/// Builds the raw containment/reference multigraph over all tags (design docs §4.3,
/// steps 1-5).
pub fn build_tag_graph(tags: Vec<Tag>) -> TagGraph {
    let mut graph: DiGraph<Tag, EdgeMeta> = DiGraph::new();
    for tag in tags {
        graph.add_node(tag);
    }

    // Step 1: defs indexed by name.
    let mut def_map: HashMap<String, Vec<NodeIndex>> = HashMap::new();
    for idx in graph.node_indices() {
        let tag = &graph[idx];
        if tag.kind == TagKind::Def {
            def_map.entry(tag.name.clone()).or_default().push(idx);
        }
    }

    // Step 3: containment edges def -> ref (same file, byte range contained).
    let def_indices: Vec<NodeIndex> =
        graph.node_indices().filter(|&i| graph[i].kind == TagKind::Def).collect();
    let all_indices: Vec<NodeIndex> = graph.node_indices().collect();
    for &d in &def_indices {
        let (d_start, d_end) = graph[d].byte_range;
        let d_fname = graph[d].fname.clone();
        for &r in &all_indices {
            if r == d {
                continue;
            }
            let rt = &graph[r];
            if rt.kind == TagKind::Ref
                && rt.fname == d_fname
                && rt.byte_range.0 >= d_start
                && rt.byte_range.1 <= d_end
                && rt.byte_range != (0, 0)
            {
                graph.add_edge(d, r, EdgeMeta { include_in_summary: false });
            }
        }
    }

    // Step 4: ref -> matching defs, incrementing n_defs.
    let ref_indices: Vec<NodeIndex> =
        graph.node_indices().filter(|&i| graph[i].kind == TagKind::Ref).collect();
    for &r in &ref_indices {
        let name = graph[r].name.clone();
        let Some(candidates) = def_map.get(&name).cloned() else { continue };
        let mut n = 0u32;
        for d in candidates {
            if d == r {
                continue;
            }
            graph.add_edge(r, d, EdgeMeta { include_in_summary: false });
            n += 1;
        }
        graph[r].n_defs += n;
    }

    // Step 5: parent containment edges for every tag with nonempty parent_names.
    for &idx in &all_indices {
        let parent_names = graph[idx].parent_names.clone();
        if parent_names.is_empty() {
            continue;
        }
        let fname = graph[idx].fname.clone();
        let grandparents = &parent_names[..parent_names.len() - 1];
        let last = parent_names[parent_names.len() - 1].clone();
        let Some(candidates) = def_map.get(&last).cloned() else { continue };
        for c in candidates {
            if graph[c].fname == fname && graph[c].parent_names == grandparents {
                graph.add_edge(c, idx, EdgeMeta { include_in_summary: false });
            }
        }
    }

    let index_of = index_by_tag(&graph);
    TagGraph { graph, index_of }
}

/// `only_defs` projection (design docs §4.3): retain `def` nodes, copy `def->def`
/// edges, and for each `def u -> ref v` edge add `u -> w` for every def `w` that `v`
/// references, with `include_in_summary = v.n_defs <= 2`.
pub fn only_defs(raw: &TagGraph) -> TagGraph {
    let mut graph: DiGraph<Tag, EdgeMeta> = DiGraph::new();
    let mut old_to_new: HashMap<NodeIndex, NodeIndex> = HashMap::new();

    for idx in raw.graph.node_indices() {
        if raw.graph[idx].kind == TagKind::Def {
            let new_idx = graph.add_node(raw.graph[idx].clone());
            old_to_new.insert(idx, new_idx);
        }
    }

    // def -> def edges copied verbatim.
    for idx in raw.graph.node_indices() {
        if raw.graph[idx].kind != TagKind::Def {
            continue;
        }
        let Some(&u) = old_to_new.get(&idx) else { continue };
        for edge in raw.graph.edges_directed(idx, Direction::Outgoing) {
            let target = edge.target();
            if raw.graph[target].kind == TagKind::Def {
                if let Some(&w) = old_to_new.get(&target) {
                    graph.add_edge(u, w, EdgeMeta { include_in_summary: true });
                }
            }
        }
    }

    // def u -> ref v -> def w projection.
    for idx in raw.graph.node_indices() {
        if raw.graph[idx].kind != TagKind::Def {
            continue;
        }
        let Some(&u) = old_to_new.get(&idx) else { continue };
        for edge in raw.graph.edges_directed(idx, Direction::Outgoing) {
            let v = edge.target();
            if raw.graph[v].kind == TagKind::Def {
                continue;
            }
            let v_n_defs = raw.graph[v].n_defs;
            for v_edge in raw.graph.edges_directed(v, Direction::Outgoing) {
                let w = v_edge.target();
                if raw.graph[w].kind == TagKind::Def && w != idx {
                    if let Some(&w_new) = old_to_new.get(&w) {
                        graph.add_edge(u, w_new, EdgeMeta { include_in_summary: v_n_defs <= 2 });
                    }
                }
            }
        }
    }

    let index_of = index_by_tag(&graph);
    TagGraph { graph, index_of }
}

#[path = "graph.test.rs"]
#[cfg(test)]
mod tests;
