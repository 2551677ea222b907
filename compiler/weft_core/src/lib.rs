//! Backtracking parser combinators.
//!
//! Grammars are values: a [`Parser<T>`] is built once from primitives and
//! combinators, then applied to any number of inputs through the entry
//! points in [`run`]. Parsers work either on chars directly or on tokens
//! produced by a lexer (itself a char-level parser), and one grammar can
//! mix both through [`parse_tokens`] and [`scan_chars`].
//!
//! # Architecture
//!
//! | Module | Role |
//! |--------|------|
//! | [`context`] | the mutable cursor and error slot of one parse |
//! | [`error`] | lazily merged parse errors and their rendering |
//! | [`failure`] | the four ways an application stops short |
//! | [`parser`] | the parser algebra |
//! | [`accumulator`] | result collection for repetition |
//! | [`expr`] | operator tables and expression parsers |
//! | [`exception`] | what the entry points report |
//! | [`token`] | token payloads |
//! | [`debug`] | `WEFT_DEBUG` flags |
//!
//! # Example
//!
//! ```ignore
//! use weft_core::{run_parser, Parser};
//!
//! let digit = Parser::from_fn(|ctx| match ctx.peek_char()? {
//!     Some(c) if c.is_ascii_digit() => { ctx.advance(); Ok(c) }
//!     _ => Err(ctx.fail_expecting_encountered("digit")),
//! });
//! let number = digit.many_min(1).map(|ds| ds.into_iter().collect::<String>());
//! assert_eq!(run_parser("42", &number, "demo").ok(), Some("42".to_owned()));
//! ```

pub mod accumulator;
pub mod context;
pub mod debug;
pub mod error;
pub mod exception;
pub mod expr;
pub mod failure;
mod nested;
pub mod parser;
pub mod run;
pub mod token;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use accumulator::{Accumulator, Count, Discard, FoldLeft};
pub use context::{ParseContext, Snapshot, DEFAULT_EOF_TITLE, EOF_MARKER};
pub use debug::{is_debug_enabled, set_debug_flags, DebugFlags};
pub use error::{ErrorDetail, ParseError};
pub use exception::{ExceptionKind, ParserException, ParsingFrame};
pub use expr::{
    build_expression_parser, infixl, infixn, infixr, postfix, prefix, BinaryOp, OperatorKind, OperatorTable,
    UnaryOp,
};
pub use failure::{Failure, Reply, Signal, SignalKey, UserError};
pub use nested::{parse_tokens, scan_chars};
pub use parser::prim::{
    abort, any_token, eof, expect, fail, from_token, get_index, is_token, lazy, one, raise, ret, unexpected, zero,
    ParserSlot,
};
pub use parser::{longest, map_n, plus, sequence, shortest, Parser, Recovery, TraceEvent};
pub use run::{run_parser, run_parser_with, run_tokens};
pub use token::{QuotedToken, Tok, Token, TokenKind, TypedToken};
pub use weft_pos::{DefaultPositionMap, Pos, PositionMap};
