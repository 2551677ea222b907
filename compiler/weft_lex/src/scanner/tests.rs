#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use weft_core::{eof, run_parser, DefaultPositionMap, ErrorDetail, ExceptionKind, ParseContext};

use super::*;

fn whole(scanner: &Scanner, source: &str) -> bool {
    run_parser(source, &scanner.followed_by(&eof("EOF")), "scan").is_ok()
}

fn detail(scanner: &Scanner, source: &str) -> ErrorDetail {
    let e = run_parser(source, scanner, "scan").unwrap_err();
    e.detail().cloned().unwrap()
}

#[test]
fn test_labels_encode_blanks() {
    assert_eq!(encode(' '), "SPACE");
    assert_eq!(encode('\n'), "LF");
    assert_eq!(encode('x'), "x");

    let d = detail(&is_char('\t'), "x");
    assert_eq!(d.expecting, vec!["HTAB".to_owned()]);
    assert_eq!(d.encountered.as_deref(), Some("x"));
    assert_eq!(detail(&not_char(' '), " ").expecting, vec!["^SPACE".to_owned()]);
    assert_eq!(detail(&among(&['a', 'b']), "c").expecting, vec!["[a,b]".to_owned()]);
    assert_eq!(detail(&not_among(&['a', '\r']), "a").expecting, vec!["^[a,CR]".to_owned()]);
    assert_eq!(detail(&any_char(), "").expecting, vec!["any character".to_owned()]);
}

#[test]
fn test_degenerate_char_sets() {
    assert!(!whole(&among(&[]), "a"));
    assert!(whole(&among(&['a']), "a"));
    assert!(whole(&not_among(&[]), "a"));
    assert!(!whole(&not_among(&['a']), "a"));
}

#[test]
fn test_pattern_match_is_one_step() {
    let source = "hello world";
    let pmap = DefaultPositionMap::with_defaults(source);
    let mut ctx = ParseContext::for_chars(source, "scan", &pmap);
    is_string("hello").parse(&mut ctx).unwrap();
    assert_eq!((ctx.at(), ctx.step()), (5, 1));
    many_chars(&weft_pattern::chars::is_alpha()).parse(&mut ctx).unwrap();
    assert_eq!((ctx.at(), ctx.step()), (5, 1));
    is_whitespaces().parse(&mut ctx).unwrap();
    assert_eq!((ctx.at(), ctx.step()), (6, 2));
}

#[test]
fn test_strings() {
    assert!(whole(&is_string("select"), "select"));
    assert!(whole(&is_string_ci("select"), "SeLeCt"));
    assert!(!whole(&is_string("select"), "SELECT"));
    assert!(whole(&many_pattern(&pattern::is_string("ab")), "ababab"));
    assert!(whole(&many_pattern(&pattern::is_string("ab")), ""));
}

#[test]
fn test_line_comments() {
    let comment_then_newline = is_java_line_comment().then(&is_char('\n'));
    assert!(whole(&comment_then_newline, "// note\n"));
    assert!(whole(&is_sql_line_comment(), "-- note"));
    assert!(whole(&is_haskell_line_comment(), "--"));
    assert_eq!(detail(&is_line_comment("#"), "x").expecting, vec!["#".to_owned()]);
}

#[test]
fn test_block_comments() {
    assert!(whole(&is_java_block_comment(), "/* a * b / c */"));
    assert!(whole(&is_java_block_comment(), "/**/"));
    assert!(!whole(&is_java_block_comment(), "/* open"));
    assert!(whole(&is_haskell_block_comment(), "{- a - } -}"));
    assert!(whole(&is_block_comment("(*", "*)"), "(* x *)"));
    assert!(!whole(&is_block_comment("(*", "*)"), "(* x *) y"));

    let digits = is_block_comment_with("<", ">", &pattern::in_range('0', '9'));
    assert!(whole(&digits, "<123>"));
    assert!(!whole(&digits, "<1a>"));

    let by = is_block_comment_by(&is_char('['), &is_char(']'), &any_char());
    assert!(whole(&by, "[a[b]"));
}

#[test]
fn test_nestable_block_comment() {
    let nested = is_nestable_block_comment("/*", "*/");
    assert!(whole(&nested, "/* a /* b */ c */"));
    assert!(whole(&nested, "/**/"));
    assert!(!whole(&nested, "/* a /* b */"));
    assert!(!whole(&is_java_block_comment(), "/* a /* b */ c */"));
}

#[test]
fn test_nestable_block_comment_rejects_a_close_that_consumes_nothing() {
    let close = is_pattern(&pattern::always(), "nothing");
    let nested = is_nestable_block_comment_by(&is_char('<'), &close, &any_char());
    let e = run_parser("<x", &nested, "scan").unwrap_err();
    assert_eq!(e.kind(), ExceptionKind::Internal);
    assert!(e.to_string().contains("closing comment scanner not consuming input"));
    assert!(e.frames().iter().any(|f| f.parser == "nestable block comment"));
}

#[test]
fn test_literals() {
    assert!(whole(&is_sql_string(), "'it''s'"));
    assert!(!whole(&is_sql_string(), "'open"));
    assert!(whole(&is_quoted_string(), r#""say \"hi\"""#));
    assert!(!whole(&is_quoted_string(), r#""a"b""#));
    assert!(whole(&is_quoted_char(), "'a'"));
    assert!(whole(&is_quoted_char(), r"'\''"));
    assert!(!whole(&is_quoted_char(), "'ab'"));
    assert!(whole(&is_quoted_by('[', ']'), "[a b [c]"));
    let by = is_quoted_by_with(&is_string("<<"), &is_string(">>"), &not_char('>'));
    assert!(whole(&by, "<<abc>>"));
}

#[test]
fn test_delimiters() {
    assert!(whole(&java_delimiter(), "  // line\n /* block */\t"));
    assert!(whole(&java_delimiter(), ""));
    assert!(whole(&haskell_delimiter(), " {- x -} -- y"));
    assert!(whole(&sql_delimiter(), "-- a\n/* b */ "));
    assert!(whole(&std_delimiter("#", "(*", "*)"), "# a\n (* b *)"));
    assert!(!whole(&java_delimiter(), " x"));
}

#[test]
fn test_delimited_rejects_a_glued_word() {
    let keyword = delimited(&is_string("if"));
    assert!(whole(&keyword.then(&is_char(' ')), "if "));
    assert!(whole(&keyword, "if"));
    let d = detail(&keyword, "iffy");
    assert_eq!(d.unexpected, vec!["alphanumeric".to_owned()]);
    assert_eq!(d.index, 2);
}

proptest! {
    #[test]
    fn quoted_string_accepts_escaped_text(body in "[a-z \"\\\\]{0,12}") {
        let escaped = body.replace('\\', "\\\\").replace('"', "\\\"");
        let source = format!("\"{escaped}\"");
        prop_assert!(whole(&is_quoted_string(), &source));
    }

    #[test]
    fn any_char_consumes_everything(text in "\\PC{0,16}") {
        prop_assert!(whole(&any_char().skip_many(), &text));
    }
}
