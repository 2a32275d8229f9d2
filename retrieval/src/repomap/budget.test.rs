use super::*;

#[test]
fn counts_tokens_for_nonempty_text() {
    let budgeter = TokenBudgeter::new().unwrap();
    assert!(budgeter.count_tokens("fn main() {}") > 0);
}

#[test]
fn empty_text_has_zero_tokens() {
    let budgeter = TokenBudgeter::new().unwrap();
    assert_eq!(budgeter.count_tokens(""), 0);
}

#[test]
fn longer_text_counts_at_least_as_many_tokens() {
    let budgeter = TokenBudgeter::new().unwrap();
    let short = budgeter.count_tokens("hello");
    let long = budgeter.count_tokens("hello hello hello hello hello");
    assert!(long >= short);
}
