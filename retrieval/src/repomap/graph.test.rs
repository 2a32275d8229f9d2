use std::path::PathBuf;

use super::*;

fn tag(kind: TagKind, name: &str, parents: &[&str], range: (usize, usize), fname: &str) -> Tag {
    Tag {
        kind,
        name: name.to_string(),
        parent_names: parents.iter().map(|s| s.to_string()).collect(),
        fname: PathBuf::from(fname),
        rel_fname: fname.to_string(),
        line: 0,
        end_line: 1,
        byte_range: range,
        text: String::new(),
        docstring: String::new(),
        language: Some("rust".to_string()),
        n_defs: 0,
    }
}

#[test]
fn ref_connects_to_matching_defs_and_increments_n_defs() {
    let def = tag(TagKind::Def, "foo", &[], (0, 50), "a.rs");
    let r = tag(TagKind::Ref, "foo", &[], (60, 63), "b.rs");
    let graph = build_tag_graph(vec![def.clone(), r.clone()]);
    let foo_def = graph.nodes().find(|t| t.kind == TagKind::Def).unwrap().clone();
    let foo_ref = graph.nodes().find(|t| t.kind == TagKind::Ref).unwrap().clone();
    assert_eq!(foo_ref.n_defs, 1);
    let out = graph.out_edges(&foo_ref);
    assert!(out.iter().any(|(t, _)| t.name == foo_def.name));
}

#[test]
fn def_contains_same_file_ref_within_its_byte_range() {
    let outer = tag(TagKind::Def, "outer", &[], (0, 100), "a.rs");
    let inner_ref = tag(TagKind::Ref, "bar", &[], (10, 13), "a.rs");
    let graph = build_tag_graph(vec![outer.clone(), inner_ref.clone()]);
    let outer_node = graph.nodes().find(|t| t.name == "outer").unwrap().clone();
    let out = graph.out_edges(&outer_node);
    assert!(out.iter().any(|(t, _)| t.name == "bar"));
}

#[test]
fn only_defs_keeps_def_to_def_edges_and_drops_refs() {
    let parent = tag(TagKind::Def, "Outer", &[], (0, 200), "a.rs");
    let child = tag(TagKind::Def, "method", &["Outer"], (10, 30), "a.rs");
    let raw = build_tag_graph(vec![parent, child]);
    let projected = only_defs(&raw);
    assert!(projected.nodes().all(|t| t.kind == TagKind::Def));
    assert_eq!(projected.node_count(), 2);
}

#[test]
fn get_parents_returns_fallback_string_when_no_matching_def_exists() {
    let orphan = tag(TagKind::Def, "method", &["Ghost"], (0, 10), "a.rs");
    let graph = build_tag_graph(vec![orphan.clone()]);
    match graph.get_parents(&orphan) {
        ParentChain::Fallback(s) => assert_eq!(s, "Ghost.method:"),
        ParentChain::Tags(_) => panic!("expected fallback"),
    }
}

#[test]
fn get_parents_returns_tags_when_parent_def_present() {
    let parent = tag(TagKind::Def, "Outer", &[], (0, 200), "a.rs");
    let child = tag(TagKind::Def, "method", &["Outer"], (10, 30), "a.rs");
    let graph = build_tag_graph(vec![parent, child.clone()]);
    let child_node = graph.nodes().find(|t| t.name == "method").unwrap().clone();
    match graph.get_parents(&child_node) {
        ParentChain::Tags(parents) => assert_eq!(parents[0].name, "Outer"),
        ParentChain::Fallback(_) => panic!("expected tags"),
    }
}
