//! Operator and keyword tables.
//!
//! Every operator and keyword maps to one reserved-word token, so a token
//! parser can recognize it by equality. The tables also build the lexer
//! that produces those tokens:
//!
//! - [`Operators`] lexes each operator with a string scanner, longer
//!   operators first, so `<=` never lexes as `<` `=`.
//! - [`Keywords`] scans a whole word, then looks it up; words that are not
//!   keywords go to a fallback (a plain word token by default).
//! - [`Words`] is both, operators tried first.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use weft_core::{plus, Parser, Tok, Token};
use weft_pattern::lexical::is_word;

use crate::error::{TokenizeError, WordsError};
use crate::lexer::lex;
use crate::scanner::{is_char, is_pattern, is_string, Scanner};
use crate::tokenizer::{for_value, Tokenizer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaseSensitivity {
    Sensitive,
    Insensitive,
}

impl CaseSensitivity {
    fn key(self, text: &str) -> String {
        match self {
            CaseSensitivity::Sensitive => text.to_owned(),
            CaseSensitivity::Insensitive => text.to_lowercase(),
        }
    }
}

/// Classifies a scanned word that is not a keyword.
pub type UnknownWord = Arc<dyn Fn(&str) -> Token + Send + Sync>;

/// The default [`UnknownWord`]: a word token.
pub fn word_token() -> UnknownWord {
    Arc::new(|text: &str| Token::word(text))
}

/// `[a-zA-Z_][0-9a-zA-Z_]*`, the word scanner tables use by default.
pub fn default_word_scanner() -> Scanner {
    is_pattern(&is_word(), "word")
}

/// Operators and their tokens.
#[derive(Clone)]
pub struct Operators {
    tokens: FxHashMap<String, Token>,
    lexers: Vec<Parser<Tok>>,
}

impl Operators {
    /// Duplicates are ignored.
    pub fn new(names: &[&str]) -> Self {
        let mut tokens = FxHashMap::default();
        let mut lexers = Vec::with_capacity(names.len());
        for name in Self::sort(names) {
            let mut chars = name.chars();
            let scanner = match (chars.next(), chars.next()) {
                (Some(c), None) => is_char(c),
                _ => is_string(name),
            };
            let token = Token::reserved(name);
            lexers.push(lex(&scanner, for_value(token.clone())));
            tokens.insert(name.to_owned(), token);
        }
        Operators { tokens, lexers }
    }

    /// Longer names first; among equal lengths the given order is kept.
    /// Empty names are dropped, they could never be lexed.
    fn sort<'n>(names: &[&'n str]) -> Vec<&'n str> {
        let mut seen = FxHashSet::default();
        let mut sorted: Vec<&str> = names.iter().copied().filter(|n| !n.is_empty() && seen.insert(*n)).collect();
        sorted.sort_by_key(|n| std::cmp::Reverse(n.len()));
        sorted
    }

    pub fn get(&self, name: &str) -> Option<&Token> {
        self.tokens.get(name)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// One operator, longest match among shared prefixes.
    pub fn lexer(&self) -> Parser<Tok> {
        plus(self.lexers.clone())
    }
}

/// Keywords and their tokens.
#[derive(Clone)]
pub struct Keywords {
    tokens: Arc<FxHashMap<String, Token>>,
    case: CaseSensitivity,
    lexer: Parser<Tok>,
}

impl Keywords {
    /// Keywords scanned with [`default_word_scanner`].
    pub fn new(names: &[&str], case: CaseSensitivity, unknown: UnknownWord) -> Self {
        Self::with_scanner(&default_word_scanner(), names, case, unknown)
    }

    /// Keywords over words recognized by `word`.
    ///
    /// Names equal under `case` collapse into the first of them, which
    /// becomes the keyword's token text.
    pub fn with_scanner(word: &Scanner, names: &[&str], case: CaseSensitivity, unknown: UnknownWord) -> Self {
        let mut tokens = FxHashMap::default();
        for name in names {
            tokens
                .entry(case.key(name))
                .or_insert_with(|| Token::reserved(*name));
        }
        let tokens = Arc::new(tokens);
        let lookup = Arc::clone(&tokens);
        let tokenizer: Tokenizer = Arc::new(move |source, begin, len| {
            let text = source
                .get(begin..begin + len)
                .ok_or(TokenizeError::Range { begin, len })?;
            Ok(match lookup.get(&case.key(text)) {
                Some(token) => token.clone(),
                None => unknown(text),
            })
        });
        Keywords {
            tokens,
            case,
            lexer: lex(word, tokenizer),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Token> {
        self.tokens.get(&self.case.key(name))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// One word: a keyword token, or whatever the fallback makes of it.
    pub fn lexer(&self) -> Parser<Tok> {
        self.lexer.clone()
    }
}

/// Operators and keywords together.
#[derive(Clone)]
pub struct Words {
    operators: Operators,
    keywords: Option<Keywords>,
    lexer: Parser<Tok>,
}

impl Words {
    /// Operators only.
    pub fn operators(names: &[&str]) -> Self {
        let operators = Operators::new(names);
        let lexer = operators.lexer();
        Words {
            operators,
            keywords: None,
            lexer,
        }
    }

    /// Operators plus keywords over the default word scanner; other words
    /// become word tokens.
    pub fn new(operators: &[&str], keywords: &[&str], case: CaseSensitivity) -> Result<Self, WordsError> {
        Self::with_scanner(&default_word_scanner(), operators, keywords, case, word_token())
    }

    /// A keyword spelled exactly like an operator is rejected; the check is
    /// case sensitive whatever `case` says.
    pub fn with_scanner(
        word: &Scanner,
        operators: &[&str],
        keywords: &[&str],
        case: CaseSensitivity,
        unknown: UnknownWord,
    ) -> Result<Self, WordsError> {
        if let Some(dup) = operators.iter().find(|op| keywords.contains(*op)) {
            return Err(WordsError::Duplicated((*dup).to_owned()));
        }
        let operators = Operators::new(operators);
        let keywords = Keywords::with_scanner(word, keywords, case, unknown);
        let lexer = plus(vec![operators.lexer(), keywords.lexer()]);
        tracing::debug!(
            operators = operators.len(),
            keywords = keywords.len(),
            ?case,
            "word table built"
        );
        Ok(Words {
            operators,
            keywords: Some(keywords),
            lexer,
        })
    }

    /// The token of operator or keyword `name`; operators take precedence.
    pub fn token(&self, name: &str) -> Result<&Token, WordsError> {
        self.operators
            .get(name)
            .or_else(|| self.keywords.as_ref().and_then(|k| k.get(name)))
            .ok_or_else(|| WordsError::Unavailable(name.to_owned()))
    }

    pub fn lexer(&self) -> Parser<Tok> {
        self.lexer.clone()
    }
}
