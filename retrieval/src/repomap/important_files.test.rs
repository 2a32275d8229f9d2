use super::*;

#[test]
fn recognizes_common_manifests() {
    assert!(is_important("Cargo.toml"));
    assert!(is_important("package.json"));
    assert!(is_important("README.md"));
}

#[test]
fn recognizes_manifests_nested_in_a_directory() {
    assert!(is_important("crates/retrieval/Cargo.toml"));
}

#[test]
fn recognizes_github_actions_workflows() {
    assert!(is_important(".github/workflows/ci.yml"));
    assert!(is_important(".github/workflows/release.yaml"));
}

#[test]
fn rejects_an_unremarkable_source_file() {
    assert!(!is_important("src/main.rs"));
    assert!(!is_important(".github/workflows/ci.txt"));
}

#[test]
fn filter_important_files_partitions_preserving_order() {
    let paths = vec!["src/lib.rs", "Cargo.toml", "src/main.rs", "README.md"];
    let (important, rest) = filter_important_files(&paths);
    assert_eq!(important, vec!["Cargo.toml", "README.md"]);
    assert_eq!(rest, vec!["src/lib.rs", "src/main.rs"]);
}
