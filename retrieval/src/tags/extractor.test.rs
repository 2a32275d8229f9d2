use std::path::Path;

use super::*;

#[test]
fn extracts_rust_function_definition() {
    let mut ex = TagExtractor::new();
    let source = "fn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n";
    let tags = ex
        .extract(source, Path::new("/repo/a.rs"), "a.rs", SupportedLanguage::Rust)
        .unwrap();
    assert!(tags.iter().any(|t| t.kind == TagKind::Def && t.name == "add"));
}

#[test]
fn nested_impl_method_gets_struct_as_parent() {
    let mut ex = TagExtractor::new();
    let source = "struct Foo;\nimpl Foo {\n    fn bar(&self) {}\n}\n";
    let tags = ex
        .extract(source, Path::new("/repo/a.rs"), "a.rs", SupportedLanguage::Rust)
        .unwrap();
    let bar = tags.iter().find(|t| t.name == "bar" && t.kind == TagKind::Def).unwrap();
    assert!(!bar.parent_names.is_empty());
}

#[test]
fn top_level_definition_starting_at_column_zero_is_line_zero() {
    let mut ex = TagExtractor::new();
    let source = "fn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n";
    let tags = ex
        .extract(source, Path::new("/repo/a.rs"), "a.rs", SupportedLanguage::Rust)
        .unwrap();
    let add = tags.iter().find(|t| t.kind == TagKind::Def && t.name == "add").unwrap();
    assert_eq!(add.line, 0);
    assert_eq!(add.end_line, 2);
}

#[test]
fn unsupported_extension_returns_empty() {
    let mut ex = TagExtractor::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.md");
    std::fs::write(&path, "# hello").unwrap();
    let tags = ex.extract_file(&path, "notes.md").unwrap();
    assert!(tags.is_empty());
}
