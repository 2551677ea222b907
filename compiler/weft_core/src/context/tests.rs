use pretty_assertions::assert_eq;
use weft_pos::DefaultPositionMap;

use super::*;
use crate::exception::ExceptionKind;
use crate::test_helpers::with_chars;

fn toks() -> Vec<Tok> {
    vec![
        Tok::new(0, 2, Token::word("ab")),
        Tok::new(3, 1, Token::Char('+')),
        Tok::new(5, 2, Token::Long(42)),
    ]
}

fn show(token: &Token) -> String {
    format!("'{token}'")
}

#[test]
fn test_advance_counts_steps_and_bytes() {
    with_chars("aé b", |ctx| {
        ctx.advance();
        assert_eq!((ctx.at(), ctx.step()), (1, 1));
        ctx.advance();
        assert_eq!((ctx.at(), ctx.step()), (3, 2));
        ctx.advance_by(2);
        assert_eq!((ctx.at(), ctx.step()), (5, 3));
        ctx.advance_by(0);
        assert_eq!(ctx.step(), 3);
        assert!(ctx.is_eof());
    });
}

#[test]
fn test_snapshot_restore() {
    with_chars("abc", |ctx| {
        let start = ctx.snapshot();
        ctx.advance();
        ctx.advance();
        assert!(start.consumed(ctx));
        assert_eq!(start.steps_since(ctx), 2);
        assert!(start.committed(ctx, 2));
        assert!(!start.committed(ctx, 3));
        ctx.restore(start);
        assert_eq!(ctx.snapshot(), start);
        assert!(!start.consumed(ctx));
    });
}

#[test]
fn test_char_window() {
    let source = "xxabcxx";
    let pmap = DefaultPositionMap::with_defaults(source);
    let mut ctx = ParseContext::for_char_range(source, 2, 5, "window", &pmap);
    assert_eq!(ctx.index(), 2);
    assert_eq!(ctx.rest().ok(), Some("abc"));
    ctx.advance_by(3);
    assert!(ctx.is_eof());
    assert_eq!(ctx.peek_char().ok(), Some(None));
}

#[test]
fn test_char_encountered() {
    with_chars("\tz", |ctx| {
        assert_eq!(ctx.encountered().render().encountered.as_deref(), Some("\\t"));
        ctx.advance_by(2);
        let err = ctx.encountered().render();
        assert_eq!(err.encountered.as_deref(), Some(EOF_MARKER));
        assert_eq!(err.index, 2);
    });
}

#[test]
fn test_token_index_and_eof() {
    let tokens = toks();
    let pmap = DefaultPositionMap::with_defaults("ab + 42");
    let mut ctx = ParseContext::for_tokens("ab + 42", &tokens, 7, DEFAULT_EOF_TITLE, &show, "tokens", &pmap);
    assert_eq!(ctx.index(), 0);
    ctx.advance();
    assert_eq!((ctx.at(), ctx.index()), (1, 3));
    ctx.advance();
    ctx.advance();
    assert!(ctx.is_eof());
    assert_eq!(ctx.index(), 7);
    assert_eq!(ctx.encountered().render().encountered.as_deref(), Some("EOF"));
}

#[test]
fn test_token_encountered_is_shown_and_memoized() {
    let tokens = toks();
    let pmap = DefaultPositionMap::with_defaults("ab + 42");
    let mut ctx = ParseContext::for_tokens("ab + 42", &tokens, 7, "end of input", &show, "tokens", &pmap);
    ctx.advance();
    let first = ctx.encountered();
    let again = ctx.encountered();
    assert_eq!(first.render().encountered.as_deref(), Some("'+'"));
    assert!(first.ptr_eq(&again));
    ctx.advance_by(2);
    assert_eq!(ctx.encountered().render().encountered.as_deref(), Some("end of input"));
}

#[test]
fn test_wrong_input_kind_is_a_fault() {
    let tokens = toks();
    let pmap = DefaultPositionMap::with_defaults("ab + 42");
    let ctx = ParseContext::for_tokens("ab + 42", &tokens, 7, DEFAULT_EOF_TITLE, &show, "tokens", &pmap);
    match ctx.peek_char() {
        Err(Failure::Fault(e)) => assert_eq!(e.kind(), ExceptionKind::Internal),
        other => panic!("expected a fault, got {other:?}"),
    }
    with_chars("a", |ctx| {
        assert!(matches!(ctx.current_token(), Err(Failure::Fault(_))));
    });
}

#[test]
fn test_fail_helpers_fill_the_error_slot() {
    with_chars("x", |ctx| {
        assert!(ctx.error().is_none());
        assert!(ctx.fail_expecting_encountered("digit").is_fail());
        let detail = ctx.error().map(ParseError::render).unwrap_or_default();
        assert_eq!(detail.expecting, vec!["digit".to_owned()]);
        assert_eq!(detail.encountered.as_deref(), Some("x"));

        let _ = ctx.fail_message("bad");
        let detail = ctx.error().map(ParseError::render).unwrap_or_default();
        assert_eq!(detail.messages, vec!["bad".to_owned()]);
        assert!(detail.expecting.is_empty());
    });
}
