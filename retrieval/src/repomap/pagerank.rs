//! Personalized PageRank (design docs §4.5, legacy ranker): power iteration over a
//! weighted digraph. Ported from the teacher's `repomap/pagerank.rs`, generalized over
//! the edge-weight type so the legacy ranker can feed it `(f64, String)`-labeled edges.

use std::collections::HashMap;

use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

pub struct PageRanker {
    damping_factor: f64,
    max_iterations: usize,
    tolerance: f64,
}

impl Default for PageRanker {
    fn default() -> Self {
        Self { damping_factor: 0.85, max_iterations: 100, tolerance: 1e-6 }
    }
}

impl PageRanker {
    pub fn new(damping_factor: f64, max_iterations: usize, tolerance: f64) -> Self {
        Self { damping_factor, max_iterations, tolerance }
    }

    /// Runs personalized PageRank over `graph`, with `weight_fn` extracting each edge's
    /// nonnegative weight. `personalization` gives each node's restart mass; nodes not
    /// present fall back to a uniform share over all nodes.
    pub fn rank<E>(
        &self,
        graph: &DiGraph<String, E>,
        weight_fn: impl Fn(&E) -> f64,
        personalization: &HashMap<String, f64>,
    ) -> HashMap<String, f64> {
        let n = graph.node_count();
        if n == 0 {
            return HashMap::new();
        }

        let personalization_sum: f64 = personalization.values().sum();
        let uniform = 1.0 / n as f64;

        let personalize = |name: &str| -> f64 {
            if personalization_sum > 0.0 {
                personalization.get(name).copied().unwrap_or(0.0) / personalization_sum
            } else {
                uniform
            }
        };

        // Precompute each node's total outgoing weight, for normalizing its contribution.
        let out_weights: HashMap<_, f64> = graph
            .node_indices()
            .map(|idx| {
                let total: f64 = graph
                    .edges_directed(idx, Direction::Outgoing)
                    .map(|e| weight_fn(e.weight()))
                    .sum();
                (idx, total)
            })
            .collect();

        let mut scores: HashMap<_, f64> = graph.node_indices().map(|idx| (idx, uniform)).collect();

        for _ in 0..self.max_iterations {
            let mut next: HashMap<_, f64> = graph
                .node_indices()
                .map(|idx| (idx, (1.0 - self.damping_factor) * personalize(&graph[idx])))
                .collect();

            for idx in graph.node_indices() {
                let out_total = out_weights[&idx];
                if out_total <= 0.0 {
                    continue;
                }
                let contribution = self.damping_factor * scores[&idx] / out_total;
                for edge in graph.edges_directed(idx, Direction::Outgoing) {
                    *next.entry(edge.target()).or_insert(0.0) += contribution * weight_fn(edge.weight());
                }
            }

            let delta: f64 = graph
                .node_indices()
                .map(|idx| (next[&idx] - scores[&idx]).abs())
                .sum();
            scores = next;
            if delta < self.tolerance {
                break;
            }
        }

        graph.node_indices().map(|idx| (graph[idx].clone(), scores[&idx])).collect()
    }
}

#[cfg(test)]
#[path = "pagerank.test.rs"]
mod tests;
