//! Token payloads produced by lexers and consumed by token-level parsers.

use std::fmt;

/// A token tagged with the source range it was lexed from.
#[derive(Clone, Debug, PartialEq)]
pub struct Tok {
    /// Byte offset of the token in the source.
    pub index: usize,
    /// Byte length of the token text.
    pub length: usize,
    pub token: Token,
}

impl Tok {
    pub fn new(index: usize, length: usize, token: Token) -> Self {
        Tok { index, length, token }
    }
}

/// Classification of a [`TypedToken`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Integer,
    Decimal,
    Word,
    Reserved,
}

/// A token whose payload is its own text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypedToken {
    pub kind: TokenKind,
    pub text: String,
}

/// A quoted range that keeps its delimiters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QuotedToken {
    pub open: String,
    pub quoted: String,
    pub close: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Typed(TypedToken),
    Char(char),
    Long(i64),
    Str(String),
    Quoted(QuotedToken),
    Eof,
}

impl Token {
    pub fn word(text: impl Into<String>) -> Self {
        Token::Typed(TypedToken {
            kind: TokenKind::Word,
            text: text.into(),
        })
    }

    pub fn reserved(text: impl Into<String>) -> Self {
        Token::Typed(TypedToken {
            kind: TokenKind::Reserved,
            text: text.into(),
        })
    }

    /// The typed payload, if it has the given kind.
    pub fn typed(&self, kind: TokenKind) -> Option<&str> {
        match self {
            Token::Typed(t) if t.kind == kind => Some(&t.text),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Typed(t) => f.write_str(&t.text),
            Token::Char(c) => write!(f, "{c}"),
            Token::Long(n) => write!(f, "{n}"),
            Token::Str(s) => f.write_str(s),
            Token::Quoted(q) => write!(f, "{}{}{}", q.open, q.quoted, q.close),
            Token::Eof => f.write_str("EOF"),
        }
    }
}
