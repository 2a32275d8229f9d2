use super::*;
use std::path::PathBuf;

fn tag(rel: &str, name: &str, line: i64, end_line: i64, text: &str) -> Tag {
    Tag {
        kind: crate::tag::TagKind::Def,
        name: name.to_string(),
        parent_names: Vec::new(),
        fname: PathBuf::from(format!("/repo/{rel}")),
        rel_fname: rel.to_string(),
        line,
        end_line,
        byte_range: (0, text.len()),
        text: text.to_string(),
        docstring: String::new(),
        language: Some("rust".to_string()),
        n_defs: 0,
    }
}

#[test]
fn to_tree_returns_empty_string_for_no_entries() {
    let mut r = Renderer::new();
    assert_eq!(r.to_tree(&[], true, &HashMap::new()), "");
}

#[test]
fn to_tree_renders_file_header_once_per_file() {
    let mut r = Renderer::new();
    let code = "fn one() {}\nfn two() {}\n";
    r.code_map.insert(PathBuf::from("/repo/a.rs"), code.to_string());

    let entries = vec![
        RenderEntry::Tag(tag("a.rs", "one", 0, 0, "fn one() {}")),
        RenderEntry::Tag(tag("a.rs", "two", 1, 1, "fn two() {}")),
    ];
    let out = r.to_tree(&entries, true, &HashMap::new());
    assert_eq!(out.matches("a.rs").count(), 1);
}

#[test]
fn to_tree_separates_multiple_files() {
    let mut r = Renderer::new();
    r.code_map.insert(PathBuf::from("/repo/a.rs"), "fn one() {}\n".to_string());
    r.code_map.insert(PathBuf::from("/repo/b.rs"), "fn two() {}\n".to_string());

    let entries = vec![
        RenderEntry::Tag(tag("a.rs", "one", 0, 0, "fn one() {}")),
        RenderEntry::Tag(tag("b.rs", "two", 0, 0, "fn two() {}")),
    ];
    let out = r.to_tree(&entries, true, &HashMap::new());
    assert!(out.contains("a.rs"));
    assert!(out.contains("b.rs"));
}

#[test]
fn get_tag_representation_returns_none_for_tag_outside_graph() {
    let mut r = Renderer::new();
    let graph = super::super::graph::build_tag_graph(Vec::new());
    let t = tag("a.rs", "missing", 0, 0, "fn missing() {}");
    assert!(r.get_tag_representation(&graph, &t, false, 50, false).is_none());
}

#[test]
fn get_tag_representation_includes_rel_fname_header() {
    let mut r = Renderer::new();
    let t = tag("a.rs", "one", 0, 0, "fn one() {}");
    let graph = super::super::graph::build_tag_graph(vec![t.clone()]);
    let repr = r.get_tag_representation(&graph, &t, false, 50, false).unwrap();
    assert!(repr.starts_with("a.rs:"));
}

#[test]
fn get_file_representation_dumps_untagged_file_numbered() {
    let mut r = Renderer::new();
    let graph = super::super::graph::build_tag_graph(Vec::new());
    let content = "line one\nline two\nline three\n";
    let repr =
        r.get_file_representation(&graph, Path::new("/repo/a.rs"), "a.rs", content, 100);
    assert!(repr.contains("line one"));
    assert!(repr.contains("1│"));
}

#[test]
fn get_file_representation_truncates_long_untagged_files() {
    let mut r = Renderer::new();
    let graph = super::super::graph::build_tag_graph(Vec::new());
    let content = (0..20).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
    let repr = r.get_file_representation(&graph, Path::new("/repo/a.rs"), "a.rs", &content, 5);
    assert!(repr.contains("more lines"));
}

#[test]
fn truncate_lines_caps_at_max_line_length() {
    let long_line = "x".repeat(200);
    let out = Renderer::truncate_lines(&long_line);
    assert_eq!(out.lines().next().unwrap().chars().count(), MAX_LINE_LENGTH);
}

#[test]
fn is_builtin_detects_known_rust_identifiers() {
    let mut t = tag("a.rs", "HashMap", 0, 0, "");
    t.language = Some("rust".to_string());
    assert!(is_builtin(&t));
    t.name = "MyCustomType".to_string();
    assert!(!is_builtin(&t));
}
