use pretty_assertions::assert_eq;

use super::*;

#[test]
fn to_lines_and_from_lines_round_trip() {
    let block = normalize_block("a\nb\nc");
    let lines = to_lines(&block);
    assert_eq!(lines, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
    assert_eq!(from_lines(&lines), block);
}

#[test]
fn normalize_block_leaves_blank_alone() {
    assert_eq!(normalize_block(""), "");
    assert_eq!(normalize_block("   "), "   ");
}

#[test]
fn perfect_replace_finds_first_window() {
    let whole = to_lines("a\nb\nc\nb\n");
    let part = to_lines("b\n");
    assert_eq!(perfect_replace(&whole, &part), Some(1));
}

#[test]
fn replace_with_leading_whitespace_preserves_asymmetric_first_line() {
    // first line already correctly indented in the file, inner lines need re-indent
    let whole = to_lines("    if x:\n        y = 1\n        z = 2\n");
    let part = to_lines("if x:\n    y = 1\n    z = 2\n");
    let replace = to_lines("if x:\n    y = 9\n    z = 2\n");
    let result = replace_with_leading_whitespace(&whole, &part, &replace).unwrap();
    assert_eq!(from_lines(&result), "    if x:\n        y = 9\n        z = 2\n");
}

#[test]
fn replace_with_leading_whitespace_rejects_nonuniform_tail_offsets() {
    let whole = to_lines("  a\n    b\n      c\n");
    let part = to_lines("a\nb\nc\n");
    let replace = to_lines("a\nb\nc2\n");
    assert!(replace_with_leading_whitespace(&whole, &part, &replace).is_none());
}

#[test]
fn replace_with_dotdotdots_appends_when_search_piece_empty() {
    let whole = "a\nb\n";
    let search = "...\n";
    let replace = "...\nc\n";
    // A single marker with nothing before it in either block: both pieces before the
    // marker are empty, and the piece after the marker is empty in search / non-empty
    // in replace, so it should append.
    let result = replace_with_dotdotdots(whole, search, replace).unwrap();
    assert_eq!(result.as_deref(), Some("a\nb\nc\n"));
}

#[test]
fn replace_with_dotdotdots_is_none_when_no_markers_present() {
    assert_eq!(replace_with_dotdotdots("a\n", "a\n", "b\n").unwrap(), None);
}

#[test]
fn replace_part_strips_line_number_prefixes_before_matching() {
    let whole = "1│fn f() {\n2│    1\n3│}\n";
    // whole itself isn't really rendered-map text in this test; what matters is that a
    // search block pasted back with rendered-map prefixes still matches real content.
    let raw = "fn f() {\n    1\n}\n";
    let search = "2│    1\n";
    let replace = "    2\n";
    let result = replace_part(raw, search, replace).unwrap();
    assert_eq!(result.as_deref(), Some("fn f() {\n    2\n}\n"));
    // and stripping is idempotent on content that never had prefixes
    let _ = whole;
}
