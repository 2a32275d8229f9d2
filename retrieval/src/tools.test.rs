use super::*;
use crate::config::RunConfig;

fn write_file(dir: &std::path::Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn tools_in(dir: &std::path::Path) -> Tools {
    let repo_map = RepoMap::new(dir.to_path_buf(), RunConfig::default()).unwrap();
    Tools::new(repo_map)
}

#[test]
fn add_files_skips_unreadable_paths() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.rs", "fn a() {}");
    let mut tools = tools_in(dir.path());

    let result = tools.add_files(&["a.rs".to_string(), "missing.rs".to_string()]);
    assert!(result.contains("a.rs"));
    assert!(!result.contains("missing.rs"));
    assert_eq!(tools.get_modifiable_files(), vec!["a.rs".to_string()]);
}

#[test]
fn add_files_reports_when_nothing_was_added() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = tools_in(dir.path());
    let result = tools.add_files(&["missing.rs".to_string()]);
    assert_eq!(result, "No files were added to the list of modifiable files.");
}

#[test]
fn edit_file_creates_a_new_file_from_a_blank_search() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = tools_in(dir.path());
    let result = tools.edit_file("new.rs", "", "fn created() {}\n").unwrap();
    assert!(result.starts_with("Successfully"));
    assert_eq!(std::fs::read_to_string(dir.path().join("new.rs")).unwrap(), "fn created() {}\n");
}

#[test]
fn edit_file_reports_no_exact_match_without_panicking() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.rs", "fn a() {}\n");
    let mut tools = tools_in(dir.path());
    let result = tools.edit_file("a.rs", "fn nonexistent() {}\n", "fn b() {}\n").unwrap();
    assert!(result.contains("SearchReplaceNoExactMatch"));
}

#[test]
fn get_full_text_reports_a_missing_entity() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.rs", "fn a() {}\n");
    let mut tools = tools_in(dir.path());
    let result = tools.get_full_text(Some("ghost"), None, None).unwrap();
    assert!(result.contains("not found"));
}

#[test]
fn get_full_text_rejects_a_repeated_identical_request() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.rs", "fn a() {}\n");
    let mut tools = tools_in(dir.path());
    tools.get_full_text(Some("a"), None, None).unwrap();
    let second = tools.get_full_text(Some("a"), None, None).unwrap();
    assert!(second.contains("already requested"));
}

#[test]
fn inspect_entity_requires_a_name_or_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = tools_in(dir.path());
    let result = tools.inspect_entity(None, None).unwrap();
    assert!(result.contains("Please supply"));
}

#[test]
fn inspect_entity_finds_a_defined_function() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.rs", "pub fn widget() {\n    1 + 1;\n}\n");
    let mut tools = tools_in(dir.path());
    let result = tools.inspect_entity(Some("widget"), None).unwrap();
    assert!(result.contains("widget"));
}

#[test]
fn return_to_user_reports_success_on_a_clean_test_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = tools_in(dir.path());
    let result = tools.return_to_user(|| None);
    assert_eq!(result, "Tests passed!");
}

#[test]
fn return_to_user_escalates_after_max_iterations() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = tools_in(dir.path());
    tools.return_to_user(|| Some("fail 1".to_string()));
    tools.return_to_user(|| Some("fail 2".to_string()));
    let result = tools.return_to_user(|| Some("fail 3".to_string()));
    assert!(result.contains("Maximum output handler iterations exceeded"));
}
