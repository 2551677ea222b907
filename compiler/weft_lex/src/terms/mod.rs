//! Token-level parsers for the tokens the lexers here produce.

use weft_core::{from_token, is_token, plus, zero, Parser, Tok, Token, TokenKind};

use crate::error::WordsError;
use crate::words::{CaseSensitivity, Words};

/// A [`Words`] table together with parsers for its tokens.
#[derive(Clone)]
pub struct Terms {
    words: Words,
}

impl Terms {
    pub fn new(words: Words) -> Self {
        Terms { words }
    }

    pub fn operators(names: &[&str]) -> Self {
        Terms::new(Words::operators(names))
    }

    pub fn case_sensitive(operators: &[&str], keywords: &[&str]) -> Result<Self, WordsError> {
        Words::new(operators, keywords, CaseSensitivity::Sensitive).map(Terms::new)
    }

    pub fn case_insensitive(operators: &[&str], keywords: &[&str]) -> Result<Self, WordsError> {
        Words::new(operators, keywords, CaseSensitivity::Insensitive).map(Terms::new)
    }

    pub fn words(&self) -> &Words {
        &self.words
    }

    pub fn lexer(&self) -> Parser<Tok> {
        self.words.lexer()
    }

    /// Any of the named operators or keywords, expecting `[a,b]`.
    pub fn parser(&self, names: &[&str]) -> Result<Parser<Tok>, WordsError> {
        self.parser_labelled(names, &format!("[{}]", names.join(",")))
    }

    /// Any of the named operators or keywords, expecting `label`. No names
    /// means a parser that never succeeds.
    pub fn parser_labelled(&self, names: &[&str], label: &str) -> Result<Parser<Tok>, WordsError> {
        if names.is_empty() {
            return Ok(zero());
        }
        let alts = names
            .iter()
            .map(|name| self.token_parser(name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(plus(alts).label(label))
    }

    /// One named operator or keyword, named and labelled after itself.
    pub fn token(&self, name: &str) -> Result<Parser<Tok>, WordsError> {
        Ok(self.token_parser(name)?.label(name).rename(name))
    }

    fn token_parser(&self, name: &str) -> Result<Parser<Tok>, WordsError> {
        let expected = self.words.token(name)?.clone();
        Ok(is_token(move |tok| tok.token == expected))
    }
}

/// A typed token of `kind`, mapped through `f(index, length, text)`.
pub fn on_typed<T: 'static>(
    kind: TokenKind,
    f: impl Fn(usize, usize, &str) -> T + Send + Sync + 'static,
) -> Parser<T> {
    from_token(move |tok| tok.token.typed(kind).map(|text| f(tok.index, tok.length, text)))
}

pub fn on_word<T: 'static>(f: impl Fn(usize, usize, &str) -> T + Send + Sync + 'static) -> Parser<T> {
    on_typed(TokenKind::Word, f).rename("word")
}

pub fn on_integer<T: 'static>(f: impl Fn(usize, usize, &str) -> T + Send + Sync + 'static) -> Parser<T> {
    on_typed(TokenKind::Integer, f).rename("integer")
}

pub fn on_decimal<T: 'static>(f: impl Fn(usize, usize, &str) -> T + Send + Sync + 'static) -> Parser<T> {
    on_typed(TokenKind::Decimal, f).rename("decimal")
}

pub fn on_char<T: 'static>(f: impl Fn(usize, usize, char) -> T + Send + Sync + 'static) -> Parser<T> {
    from_token(move |tok| match tok.token {
        Token::Char(c) => Some(f(tok.index, tok.length, c)),
        _ => None,
    })
    .rename("char")
}

pub fn on_string<T: 'static>(f: impl Fn(usize, usize, &str) -> T + Send + Sync + 'static) -> Parser<T> {
    from_token(move |tok| match &tok.token {
        Token::Str(s) => Some(f(tok.index, tok.length, s)),
        _ => None,
    })
    .rename("string")
}

pub fn on_long<T: 'static>(f: impl Fn(usize, usize, i64) -> T + Send + Sync + 'static) -> Parser<T> {
    from_token(move |tok| match tok.token {
        Token::Long(n) => Some(f(tok.index, tok.length, n)),
        _ => None,
    })
    .rename("long")
}

/// A quoted token, as `f(index, length, open, quoted, close)`.
pub fn on_quoted<T: 'static>(
    f: impl Fn(usize, usize, &str, &str, &str) -> T + Send + Sync + 'static,
) -> Parser<T> {
    from_token(move |tok| match &tok.token {
        Token::Quoted(q) => Some(f(tok.index, tok.length, &q.open, &q.quoted, &q.close)),
        _ => None,
    })
    .rename("quoted")
}
