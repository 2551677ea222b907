//! Lexing on top of `weft_core`.
//!
//! The layers, bottom up:
//!
//! | Layer | Module | Output |
//! |-------|--------|--------|
//! | Scanners | [`scanner`] | `Parser<()>` over chars |
//! | Tokenizers | [`tokenizer`] | matched text to [`weft_core::Token`] |
//! | Lexers | [`lexer`] | `Parser<Tok>`, one step per token |
//! | Word tables | [`words`] | operator and keyword lexers |
//! | Terms | [`terms`] | token-level parsers for those tokens |
//!
//! A typical grammar lexes with [`lexer::lexeme`], then hands the tokens to
//! a token grammar through [`weft_core::parse_tokens`]:
//!
//! ```ignore
//! let terms = Terms::operators(&["+", "-"]);
//! let lexer = lexeme(&is_whitespaces(), &(terms.lexer() | lex_long()));
//! let number = on_long(|_, _, n| n);
//! let sum = number.sep_by1(&terms.parser(&["+"])?).map(|ns| ns.iter().sum::<i64>());
//! let calc = parse_tokens(&lexer, &sum, "EOF", |t| t.to_string(), "sum");
//! ```

mod error;
pub mod lexer;
pub mod scanner;
pub mod terms;
pub mod tokenizer;
pub mod words;

pub use error::{TokenizeError, WordsError};
pub use lexer::{lex, lexeme};
pub use scanner::Scanner;
pub use terms::Terms;
pub use tokenizer::Tokenizer;
pub use words::{CaseSensitivity, Keywords, Operators, Words};
