use super::*;

fn parse_rust(source: &str) -> Tree {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&tree_sitter_rust::LANGUAGE.into()).unwrap();
    parser.parse(source, None).unwrap()
}

#[test]
fn shows_loi_and_enclosing_function_header() {
    let source = "fn outer() {\n    let a = 1;\n    let b = 2;\n    let c = 3;\n}\n";
    let mut ctx = TreeContext::new(source, true);
    let tree = parse_rust(source);
    ctx.walk_tree(&tree);
    ctx.add_lois([2]);
    ctx.add_context();
    let rendered = ctx.format();
    assert!(rendered.contains("fn outer"));
    assert!(rendered.contains("let b = 2;"));
}

#[test]
fn empty_lois_render_nothing() {
    let source = "fn a() {}\n";
    let ctx = TreeContext::new(source, true);
    assert_eq!(ctx.format(), "");
}

#[test]
fn skipped_ranges_get_a_dots_marker() {
    let source = "fn a() {}\nfn b() {}\nfn c() {}\nfn d() {}\nfn e() {}\n";
    let mut ctx = TreeContext::new(source, false);
    let tree = parse_rust(source);
    ctx.walk_tree(&tree);
    ctx.add_lois([0, 4]);
    ctx.add_context();
    let rendered = ctx.format();
    assert!(rendered.contains('⋮'));
}

#[test]
fn single_line_gap_is_closed() {
    let source = "a\nb\nc\nd\ne\n";
    let mut ctx = TreeContext::new(source, false);
    ctx.add_lois([0, 2]);
    ctx.add_context();
    let rendered = ctx.format();
    assert!(!rendered.contains('⋮'));
    assert_eq!(rendered, "a\nb\nc\n");
}
