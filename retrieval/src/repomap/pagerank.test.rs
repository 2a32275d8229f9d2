use super::*;

fn uniform_weight(_: &f64) -> f64 {
    1.0
}

#[test]
fn empty_graph_ranks_to_nothing() {
    let graph: DiGraph<String, f64> = DiGraph::new();
    let ranks = PageRanker::default().rank(&graph, uniform_weight, &HashMap::new());
    assert!(ranks.is_empty());
}

#[test]
fn scores_sum_to_roughly_one() {
    let mut graph: DiGraph<String, f64> = DiGraph::new();
    let a = graph.add_node("a".to_string());
    let b = graph.add_node("b".to_string());
    let c = graph.add_node("c".to_string());
    graph.add_edge(a, b, 1.0);
    graph.add_edge(b, c, 1.0);
    graph.add_edge(c, a, 1.0);

    let ranks = PageRanker::default().rank(&graph, uniform_weight, &HashMap::new());
    let total: f64 = ranks.values().sum();
    assert!((total - 1.0).abs() < 1e-3, "total = {total}");
}

#[test]
fn a_node_with_more_incoming_links_ranks_higher() {
    let mut graph: DiGraph<String, f64> = DiGraph::new();
    let hub = graph.add_node("hub".to_string());
    let a = graph.add_node("a".to_string());
    let b = graph.add_node("b".to_string());
    let leaf = graph.add_node("leaf".to_string());
    graph.add_edge(a, hub, 1.0);
    graph.add_edge(b, hub, 1.0);
    graph.add_edge(a, leaf, 1.0);

    let ranks = PageRanker::default().rank(&graph, uniform_weight, &HashMap::new());
    assert!(ranks["hub"] > ranks["leaf"]);
}

#[test]
fn personalization_boosts_the_preferred_node() {
    let mut graph: DiGraph<String, f64> = DiGraph::new();
    let a = graph.add_node("a".to_string());
    let b = graph.add_node("b".to_string());
    graph.add_edge(a, b, 1.0);
    graph.add_edge(b, a, 1.0);

    let mut personalization = HashMap::new();
    personalization.insert("a".to_string(), 10.0);
    personalization.insert("b".to_string(), 1.0);

    let ranks = PageRanker::default().rank(&graph, uniform_weight, &personalization);
    assert!(ranks["a"] > ranks["b"]);
}

#[test]
fn edge_weight_function_is_honored() {
    let mut graph: DiGraph<String, f64> = DiGraph::new();
    let a = graph.add_node("a".to_string());
    let b = graph.add_node("b".to_string());
    let c = graph.add_node("c".to_string());
    graph.add_edge(a, b, 1.0);
    graph.add_edge(a, c, 9.0);

    let ranks = PageRanker::default().rank(&graph, |w: &f64| *w, &HashMap::new());
    assert!(ranks["c"] > ranks["b"]);
}
