//! Tokenizers: turning the text a scanner matched into a token payload.
//!
//! A [`Tokenizer`] sees the whole source plus the matched range, so it can
//! look at the text without copying it first.

use std::sync::Arc;

use weft_core::{QuotedToken, Token, TokenKind, TypedToken};

use crate::error::TokenizeError;

/// `(source, begin, len) -> token`, with `begin` and `len` in bytes.
pub type Tokenizer = Arc<dyn Fn(&str, usize, usize) -> Result<Token, TokenizeError> + Send + Sync>;

fn slice(source: &str, begin: usize, len: usize) -> Result<&str, TokenizeError> {
    source
        .get(begin..begin + len)
        .ok_or(TokenizeError::Range { begin, len })
}

/// The same token whatever was matched.
pub fn for_value(token: Token) -> Tokenizer {
    Arc::new(move |_, _, _| Ok(token.clone()))
}

/// The matched text, tagged with `kind`.
pub fn for_typed_token(kind: TokenKind) -> Tokenizer {
    Arc::new(move |source, begin, len| {
        Ok(Token::Typed(TypedToken {
            kind,
            text: slice(source, begin, len)?.to_owned(),
        }))
    })
}

pub fn for_word() -> Tokenizer {
    for_typed_token(TokenKind::Word)
}

pub fn for_reserved() -> Tokenizer {
    for_typed_token(TokenKind::Reserved)
}

pub fn for_integer() -> Tokenizer {
    for_typed_token(TokenKind::Integer)
}

pub fn for_decimal() -> Tokenizer {
    for_typed_token(TokenKind::Decimal)
}

/// The matched text as a plain string token.
pub fn for_string() -> Tokenizer {
    Arc::new(|source, begin, len| Ok(Token::Str(slice(source, begin, len)?.to_owned())))
}

/// A char literal: `'a'`, or an escape such as `'\n'`.
pub fn for_char() -> Tokenizer {
    Arc::new(|source, begin, len| {
        let text = slice(source, begin, len)?;
        let chars: Vec<char> = text.chars().collect();
        match chars.as_slice() {
            [_, c, _] => Ok(Token::Char(*c)),
            [_, '\\', c, _] => Ok(Token::Char(unescape(*c))),
            _ => Err(TokenizeError::IllegalChar(text.to_owned())),
        }
    })
}

/// `'...'` with `''` standing for one quote.
pub fn for_sql_string() -> Tokenizer {
    Arc::new(|source, begin, len| {
        let text = slice(source, begin, len)?;
        let body = strip(text, "'", "'")?;
        Ok(Token::Str(body.replace("''", "'")))
    })
}

/// `"..."` with backslash escapes; `\n`, `\r` and `\t` are control chars,
/// any other escaped char stands for itself.
pub fn for_simple_string() -> Tokenizer {
    Arc::new(|source, begin, len| {
        let text = slice(source, begin, len)?;
        let body = strip(text, "\"", "\"")?;
        let mut out = String::with_capacity(body.len());
        let mut chars = body.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(unescape(escaped));
                    }
                }
                c => out.push(c),
            }
        }
        Ok(Token::Str(out))
    })
}

/// A base-10 integer as [`Token::Long`].
pub fn for_decimal_long() -> Tokenizer {
    Arc::new(|source, begin, len| to_long(slice(source, begin, len)?, 10))
}

/// A base-8 integer; the leading `0` is just another digit.
pub fn for_oct_long() -> Tokenizer {
    Arc::new(|source, begin, len| to_long(slice(source, begin, len)?, 8))
}

/// A `0x`/`0X` prefixed base-16 integer.
pub fn for_hex_long() -> Tokenizer {
    Arc::new(|source, begin, len| {
        let text = slice(source, begin, len)?;
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        to_long(digits, 16)
    })
}

/// A quoted range that keeps its delimiters apart from the quoted text.
pub fn for_quoted(open: &str, close: &str) -> Tokenizer {
    let (open, close) = (open.to_owned(), close.to_owned());
    Arc::new(move |source, begin, len| {
        let text = slice(source, begin, len)?;
        let quoted = strip(text, &open, &close)?;
        Ok(Token::Quoted(QuotedToken {
            open: open.clone(),
            quoted: quoted.to_owned(),
            close: close.clone(),
        }))
    })
}

fn strip<'s>(text: &'s str, open: &str, close: &str) -> Result<&'s str, TokenizeError> {
    text.strip_prefix(open)
        .and_then(|rest| rest.strip_suffix(close))
        .ok_or_else(|| TokenizeError::Unquoted {
            text: text.to_owned(),
            open: open.to_owned(),
            close: close.to_owned(),
        })
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        other => other,
    }
}

fn to_long(text: &str, radix: u32) -> Result<Token, TokenizeError> {
    let mut n: i64 = 0;
    for c in text.chars() {
        let digit = c.to_digit(radix).ok_or_else(|| TokenizeError::InvalidDigit {
            digit: c,
            text: text.to_owned(),
        })?;
        n = n
            .checked_mul(i64::from(radix))
            .and_then(|n| n.checked_add(i64::from(digit)))
            .ok_or_else(|| TokenizeError::Overflow(text.to_owned()))?;
    }
    Ok(Token::Long(n))
}
