//! Small char-level parsers for tests; the real scanners live in `weft_lex`.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use weft_pos::DefaultPositionMap;

use crate::context::ParseContext;
use crate::exception::ParserException;
use crate::parser::Parser;
use crate::run::run_parser;

/// One char satisfying `pred`, expecting `label` otherwise.
pub(crate) fn char_where(
    label: &str,
    pred: impl Fn(char) -> bool + Send + Sync + 'static,
) -> Parser<char> {
    let label: Arc<str> = label.into();
    Parser::from_fn(move |ctx| match ctx.peek_char()? {
        Some(c) if pred(c) => {
            ctx.advance();
            Ok(c)
        }
        _ => Err(ctx.fail_expecting_encountered(Arc::clone(&label))),
    })
}

pub(crate) fn ch(c: char) -> Parser<char> {
    char_where(&format!("'{c}'"), move |x| x == c)
}

pub(crate) fn digit() -> Parser<char> {
    char_where("digit", |c| c.is_ascii_digit())
}

pub(crate) fn lower() -> Parser<char> {
    char_where("[a-z]", |c| c.is_ascii_lowercase())
}

/// `s` as a single step.
pub(crate) fn word(s: &'static str) -> Parser<&'static str> {
    Parser::from_fn(move |ctx| {
        if ctx.rest()?.starts_with(s) {
            ctx.advance_by(s.len());
            Ok(s)
        } else {
            Err(ctx.fail_expecting_encountered(s))
        }
    })
}

pub(crate) fn number() -> Parser<i64> {
    digit()
        .many_min(1)
        .map(|ds| ds.into_iter().fold(0, |n, d| n * 10 + i64::from(d.to_digit(10).unwrap())))
}

pub(crate) fn parse<T: 'static>(p: &Parser<T>, source: &str) -> Result<T, ParserException> {
    run_parser(source, p, "test")
}

pub(crate) fn parse_ok<T: 'static>(p: &Parser<T>, source: &str) -> T {
    parse(p, source).unwrap()
}

pub(crate) fn parse_err<T: 'static + std::fmt::Debug>(p: &Parser<T>, source: &str) -> ParserException {
    parse(p, source).unwrap_err()
}

/// Run `f` on a fresh char context over `source`.
pub(crate) fn with_chars<R>(source: &str, f: impl FnOnce(&mut ParseContext<'_>) -> R) -> R {
    let pmap = DefaultPositionMap::with_defaults(source);
    let mut ctx = ParseContext::for_chars(source, "test", &pmap);
    f(&mut ctx)
}
