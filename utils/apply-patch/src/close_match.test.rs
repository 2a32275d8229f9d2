use super::*;

fn lines(s: &str) -> Vec<String> {
    s.lines().map(|l| l.to_string()).collect()
}

#[test]
fn finds_best_window_above_threshold() {
    let whole = lines("foo\nbar\nbaz\n");
    let search = lines("fooo\nbar\nbaz\n");
    let hint = find_close_match(&whole, &search).unwrap();
    assert_eq!(hint, "foo\nbar\nbaz");
}

#[test]
fn returns_none_below_threshold() {
    let whole = lines("alpha\nbeta\ngamma\ndelta\n");
    let search = lines("completely\nunrelated\ncontent\nhere\n");
    assert!(find_close_match(&whole, &search).is_none());
}

#[test]
fn extends_context_by_up_to_five_lines() {
    let whole = lines("1\n2\n3\n4\n5\n6\nfooo\nbar\nbaz\n7\n8\n9\n10\n11\n12\n");
    let search = lines("foo\nbar\nbaz\n");
    let hint = find_close_match(&whole, &search).unwrap();
    // 5 lines of context before (2..6) and after (7..11), plus the 3-line match itself
    assert!(hint.starts_with('2'));
    assert!(hint.contains("fooo"));
}
