use super::*;
use crate::config::RunConfig;

fn write_file(dir: &std::path::Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn get_ident_mentions_splits_on_non_word_chars() {
    let idents = get_ident_mentions("please look at handle_request() and Config::new");
    assert!(idents.contains("handle_request"));
    assert!(idents.contains("Config"));
    assert!(idents.contains("new"));
}

#[test]
fn ident_filename_matches_ignore_short_identifiers() {
    let mut idents = HashSet::new();
    idents.insert("rank".to_string());
    idents.insert("it".to_string());
    let all = vec!["src/rank.rs".to_string(), "src/it.rs".to_string()];
    let matches = get_ident_filename_matches(&idents, &all, 2);
    assert!(matches.contains("src/rank.rs"));
    assert!(!matches.contains("src/it.rs"));
}

#[test]
fn get_repo_map_is_none_for_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo_map = RepoMap::new(dir.path().to_path_buf(), RunConfig::default()).unwrap();
    let result = repo_map
        .get_repo_map(&HashSet::new(), &HashSet::new(), &ArgRecord::new())
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn get_repo_map_renders_a_small_rust_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "lib.rs", "pub fn helper() {\n    1 + 1;\n}\n");

    let mut repo_map = RepoMap::new(dir.path().to_path_buf(), RunConfig::default()).unwrap();
    let mut other = HashSet::new();
    other.insert(path);

    let map = repo_map.get_repo_map(&HashSet::new(), &other, &ArgRecord::new()).unwrap();
    assert!(map.is_some());
    assert!(map.unwrap().contains("helper"));
}

#[test]
fn repo_map_from_message_falls_back_when_nothing_is_mentioned() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "lib.rs", "pub fn widget() {}\n");

    let mut repo_map = RepoMap::new(dir.path().to_path_buf(), RunConfig::default()).unwrap();
    let mut all = HashSet::new();
    all.insert(path);

    let map = repo_map
        .repo_map_from_message("totally unrelated free text", None, None, &HashSet::new(), &all)
        .unwrap();
    assert!(map.is_some());
}

struct FixedSearchTerms(Vec<String>);

impl SearchTermAdapter for FixedSearchTerms {
    fn search_terms_from_message(&self, _message: &str) -> crate::error::Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

#[test]
fn repo_map_from_message_threads_llm_search_terms_and_mentioned_entities() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "lib.rs", "pub fn widget() {\n    1 + 1;\n}\n");

    let mut repo_map = RepoMap::new(dir.path().to_path_buf(), RunConfig::default()).unwrap();
    let mut all = HashSet::new();
    all.insert(path);

    let mut entities = HashSet::new();
    entities.insert("widget".to_string());
    let llm = FixedSearchTerms(vec!["1 + 1".to_string()]);

    let map = repo_map
        .repo_map_from_message("anything", Some(&entities), Some(&llm), &HashSet::new(), &all)
        .unwrap();
    assert!(map.is_some());
}

#[test]
fn graph_cache_reuses_a_superset_graph() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.rs", "pub fn a() {}\n");
    let b = write_file(dir.path(), "b.rs", "pub fn b() {}\n");

    let mut config = RunConfig::default();
    config.cache_graphs = true;
    let mut repo_map = RepoMap::new(dir.path().to_path_buf(), config).unwrap();

    let full = repo_map.get_tag_graph(&[a.clone(), b.clone()]).unwrap();
    let subset = repo_map.get_tag_graph(&[a.clone()]).unwrap();
    assert_eq!(full.node_count(), subset.node_count());
}
