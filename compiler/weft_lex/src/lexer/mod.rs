//! Lexers: scanners paired with tokenizers.
//!
//! A lexer is a `Parser<Tok>`. However many chars its scanner consumes, a
//! lexer counts as one step, so lookahead over lexers counts tokens.

use weft_core::{plus, Parser, Tok};
use weft_pattern::lexical::{is_dec_integer, is_decimal, is_hex_integer, is_integer, is_oct_integer, is_word};

use crate::scanner::{delimited, is_pattern, is_quoted_by, is_quoted_char, is_quoted_string, is_sql_string, Scanner};
use crate::tokenizer::{
    for_char, for_decimal, for_decimal_long, for_hex_long, for_integer, for_oct_long, for_quoted,
    for_simple_string, for_sql_string, for_word, Tokenizer,
};

/// Run `scanner` and tokenize what it matched.
///
/// A tokenizer error is an internal fault: the scanner accepted text its
/// tokenizer cannot handle.
pub fn lex<S: 'static>(scanner: &Parser<S>, tokenizer: Tokenizer) -> Parser<Tok> {
    let scanner = scanner.clone();
    Parser::from_fn(move |ctx| {
        let (begin, step) = (ctx.at(), ctx.step());
        scanner.parse(ctx)?;
        let len = ctx.at() - begin;
        let token = tokenizer(ctx.source()?, begin, len).map_err(|e| {
            tracing::debug!(begin, len, error = %e, "tokenizer rejected scanned text");
            ctx.fault(&e.to_string())
        })?;
        ctx.set_step(step + 1);
        Ok(Tok::new(begin, len, token))
    })
}

/// Tokens separated, and optionally surrounded, by `delim`.
pub fn lexeme(delim: &Scanner, lexer: &Parser<Tok>) -> Parser<Vec<Tok>> {
    delim.optional().then(&lexer.sep_end_by(delim))
}

pub fn lex_char_literal() -> Parser<Tok> {
    lex(&is_quoted_char(), for_char()).rename("char literal")
}

pub fn lex_simple_string_literal() -> Parser<Tok> {
    lex(&is_quoted_string(), for_simple_string()).rename("double quoted string literal")
}

pub fn lex_sql_string_literal() -> Parser<Tok> {
    lex(&is_sql_string(), for_sql_string()).rename("sql style string literal")
}

/// `open`, anything but `close`, `close`, as a [`weft_core::QuotedToken`].
pub fn lex_quoted_string(open: char, close: char) -> Parser<Tok> {
    lex(&is_quoted_by(open, close), for_quoted(&open.to_string(), &close.to_string()))
        .rename("quoted string literal")
}

pub fn lex_decimal() -> Parser<Tok> {
    lex(&delimited(&is_pattern(&is_decimal(), "decimal number")), for_decimal()).rename("decimal literal")
}

pub fn lex_integer() -> Parser<Tok> {
    lex(&delimited(&is_pattern(&is_integer(), "integer")), for_integer()).rename("integer literal")
}

pub fn lex_decimal_long() -> Parser<Tok> {
    lex(&delimited(&is_pattern(&is_dec_integer(), "decInteger")), for_decimal_long())
        .rename("decimal integer literal")
}

pub fn lex_oct_long() -> Parser<Tok> {
    lex(&delimited(&is_pattern(&is_oct_integer(), "octInteger")), for_oct_long()).rename("oct integer literal")
}

pub fn lex_hex_long() -> Parser<Tok> {
    lex(&delimited(&is_pattern(&is_hex_integer(), "hexInteger")), for_hex_long()).rename("hex integer literal")
}

/// Hex, decimal or octal, in that order.
pub fn lex_long() -> Parser<Tok> {
    plus(vec![lex_hex_long(), lex_decimal_long(), lex_oct_long()]).rename("long integer literal")
}

pub fn lex_word() -> Parser<Tok> {
    lex(&delimited(&is_pattern(&is_word(), "word")), for_word()).rename("word")
}
