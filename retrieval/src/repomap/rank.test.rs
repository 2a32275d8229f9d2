use super::*;
use crate::tag::TagKind;

fn def_tag(rel: &str, name: &str) -> Tag {
    Tag {
        kind: TagKind::Def,
        name: name.to_string(),
        parent_names: Vec::new(),
        fname: PathBuf::from(format!("/repo/{rel}")),
        rel_fname: rel.to_string(),
        line: 0,
        end_line: 1,
        byte_range: (0, 10),
        text: format!("fn {name}() {{}}"),
        docstring: String::new(),
        language: Some("rust".to_string()),
        n_defs: 0,
    }
}

fn ref_tag(rel: &str, name: &str, byte_range: (usize, usize)) -> Tag {
    Tag {
        kind: TagKind::Ref,
        name: name.to_string(),
        parent_names: Vec::new(),
        fname: PathBuf::from(format!("/repo/{rel}")),
        rel_fname: rel.to_string(),
        line: 5,
        end_line: 5,
        byte_range,
        text: name.to_string(),
        docstring: String::new(),
        language: Some("rust".to_string()),
        n_defs: 0,
    }
}

#[test]
fn median_of_odd_length_picks_middle() {
    assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
}

#[test]
fn median_of_even_length_averages_middle_two() {
    assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
}

#[test]
fn median_of_empty_is_zero() {
    assert_eq!(median(&[]), 0.0);
}

#[test]
fn weights_from_abs_fnames_ignores_files_outside_the_repo() {
    let chat: HashSet<PathBuf> = [PathBuf::from("/outside/x.rs")].into_iter().collect();
    let all = vec![PathBuf::from("/repo/a.rs")];
    assert!(weights_from_abs_fnames(&chat, &all).is_empty());
}

#[test]
fn chat_files_get_more_weight_than_untouched_ones() {
    let a = def_tag("a.rs", "helper_a");
    let b = def_tag("b.rs", "helper_b");
    let graph = super::super::graph::build_tag_graph(vec![a.clone(), b.clone()]);

    let mut args = ArgRecord::new();
    args.chat_fnames.insert(PathBuf::from("/repo/a.rs"));

    let weights = rank_weight_and_diffuse(&graph, &args, 0.2);
    assert!(weights[&a] > weights[&b]);
}

#[test]
fn diffusion_boosts_a_def_referenced_from_a_chat_file() {
    let caller = def_tag("a.rs", "caller");
    let callee = def_tag("b.rs", "callee");
    let reference = ref_tag("a.rs", "callee", (100, 110));

    let mut caller_full = caller.clone();
    caller_full.byte_range = (0, 200);

    let graph =
        super::super::graph::build_tag_graph(vec![caller_full.clone(), callee.clone(), reference]);

    let mut args = ArgRecord::new();
    args.chat_fnames.insert(PathBuf::from("/repo/a.rs"));

    let weights = rank_weight_and_diffuse(&graph, &args, 0.2);
    let other = def_tag("c.rs", "unrelated");
    let graph_with_other =
        super::super::graph::build_tag_graph(vec![caller_full, callee.clone(), other.clone()]);
    let baseline = rank_weight_and_diffuse(&graph_with_other, &ArgRecord::new(), 0.2);

    assert!(weights[&callee] > baseline[&other]);
}

#[test]
fn legacy_ranker_returns_empty_for_a_graph_with_no_defs() {
    let graph = super::super::graph::build_tag_graph(Vec::new());
    let ranks = rank_tags_legacy_pagerank(&graph, &ArgRecord::new());
    assert!(ranks.is_empty());
}

#[test]
fn legacy_ranker_favors_the_chat_file() {
    let a = def_tag("a.rs", "helper_a");
    let b = def_tag("b.rs", "helper_b");
    let graph = super::super::graph::build_tag_graph(vec![a.clone(), b.clone()]);

    let mut args = ArgRecord::new();
    args.chat_fnames.insert(PathBuf::from("/repo/a.rs"));

    let weights = rank_tags_legacy_pagerank(&graph, &args);
    assert!(weights[&a] >= weights[&b]);
}
