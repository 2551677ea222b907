//! Parse contexts.
//!
//! A [`ParseContext`] is the only mutable state of a parse: a cursor over the
//! input plus the error slot. It comes in two shapes sharing one API:
//!
//! | Shape | `at` counts | `index()` is |
//! |-------|-------------|--------------|
//! | chars | bytes of a `&str` window | `at` |
//! | tokens | positions in a `&[Tok]` | the current token's byte offset |
//!
//! # Offset and step
//!
//! `at` is the physical position; `step` counts logical progress. An atomic
//! terminal can consume many chars but advances `step` by one, and
//! alternation decides whether to backtrack by looking at `step`, not `at`.
//! Both only grow while parsers succeed, and both are put back with
//! [`restore`](ParseContext::restore) whenever a branch must behave as if
//! it consumed nothing.
//!
//! # Snapshots
//!
//! Combinators save a [`Snapshot`] before trying anything they may undo:
//!
//! ```ignore
//! let start = ctx.snapshot();
//! match p.parse(ctx) {
//!     Err(Failure::Fail) if !start.consumed(ctx) => ctx.restore(start),
//!     other => return other,
//! }
//! ```
//!
//! A snapshot is two integers. The error slot is not part of it: errors of
//! abandoned branches are merged, not thrown away.

use std::sync::Arc;

use weft_pos::PositionMap;

use crate::error::ParseError;
use crate::exception::{ExceptionKind, ParserException};
use crate::failure::Failure;
use crate::token::{Tok, Token};

/// What a char-level context reports as encountered at the end of input.
pub const EOF_MARKER: &str = "<EOF>";

/// Default end-of-input title for token-level contexts.
pub const DEFAULT_EOF_TITLE: &str = "EOF";

/// Renders a token for "X encountered".
pub type ShowToken<'a> = &'a dyn Fn(&Token) -> String;

enum Input<'a> {
    Chars {
        source: &'a str,
        end: usize,
    },
    Tokens {
        /// The text the tokens were lexed from.
        source: &'a str,
        tokens: &'a [Tok],
        end_index: usize,
        eof_title: &'a str,
        show: ShowToken<'a>,
        /// Memoized "X encountered" per position, including the end.
        encountered: Vec<Option<ParseError>>,
    },
}

/// Cursor state saved before a speculative application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub at: usize,
    pub step: usize,
}

impl Snapshot {
    /// The cursor moved since the snapshot was taken.
    #[inline]
    pub fn consumed(self, ctx: &ParseContext<'_>) -> bool {
        ctx.at != self.at
    }

    /// Logical steps taken since the snapshot.
    #[inline]
    pub fn steps_since(self, ctx: &ParseContext<'_>) -> usize {
        ctx.step.saturating_sub(self.step)
    }

    /// Consumed at least `look_ahead` steps: too far to backtrack.
    #[inline]
    pub fn committed(self, ctx: &ParseContext<'_>, look_ahead: usize) -> bool {
        self.consumed(ctx) && self.steps_since(ctx) >= look_ahead
    }
}

/// The mutable state of one parse.
pub struct ParseContext<'a> {
    input: Input<'a>,
    at: usize,
    step: usize,
    module: &'a str,
    pmap: &'a dyn PositionMap,
    error: Option<ParseError>,
}

impl<'a> ParseContext<'a> {
    /// A context over all of `source`.
    pub fn for_chars(source: &'a str, module: &'a str, pmap: &'a dyn PositionMap) -> Self {
        Self::for_char_range(source, 0, source.len(), module, pmap)
    }

    /// A context over `source[begin..end]`; offsets stay absolute.
    pub fn for_char_range(
        source: &'a str,
        begin: usize,
        end: usize,
        module: &'a str,
        pmap: &'a dyn PositionMap,
    ) -> Self {
        ParseContext {
            input: Input::Chars {
                source,
                end: end.min(source.len()),
            },
            at: begin,
            step: 0,
            module,
            pmap,
            error: None,
        }
    }

    /// A context over `tokens` lexed from `source`; `end_index` is the byte
    /// offset reported at the end of the tokens.
    pub fn for_tokens(
        source: &'a str,
        tokens: &'a [Tok],
        end_index: usize,
        eof_title: &'a str,
        show: ShowToken<'a>,
        module: &'a str,
        pmap: &'a dyn PositionMap,
    ) -> Self {
        ParseContext {
            input: Input::Tokens {
                source,
                tokens,
                end_index,
                eof_title,
                show,
                encountered: vec![None; tokens.len() + 1],
            },
            at: 0,
            step: 0,
            module,
            pmap,
            error: None,
        }
    }

    // === Cursor ===

    #[inline]
    pub fn at(&self) -> usize {
        self.at
    }

    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Byte offset of the current position in the original source.
    pub fn index(&self) -> usize {
        match &self.input {
            Input::Chars { .. } => self.at,
            Input::Tokens {
                tokens, end_index, ..
            } => tokens.get(self.at).map_or(*end_index, |t| t.index),
        }
    }

    /// Chars: the window end. Tokens: the token count.
    pub fn end(&self) -> usize {
        match &self.input {
            Input::Chars { end, .. } => *end,
            Input::Tokens { tokens, .. } => tokens.len(),
        }
    }

    pub fn is_eof(&self) -> bool {
        self.at >= self.end()
    }

    pub fn module(&self) -> &'a str {
        self.module
    }

    pub fn position_map(&self) -> &'a dyn PositionMap {
        self.pmap
    }

    #[inline]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            at: self.at,
            step: self.step,
        }
    }

    #[inline]
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.at = snapshot.at;
        self.step = snapshot.step;
    }

    #[inline]
    pub fn set_step(&mut self, step: usize) {
        self.step = step;
    }

    pub(crate) fn set_at(&mut self, at: usize) {
        self.at = at;
    }

    /// Move past the current char or token: one step.
    pub fn advance(&mut self) {
        let width = match &self.input {
            Input::Chars { source, end } => source
                .get(self.at..*end)
                .and_then(|rest| rest.chars().next())
                .map_or(0, char::len_utf8),
            Input::Tokens { .. } => 1,
        };
        self.at += width;
        self.step += 1;
    }

    /// Move `n` bytes (or tokens) ahead; one step unless `n` is zero.
    pub fn advance_by(&mut self, n: usize) {
        self.at += n;
        if n > 0 {
            self.step += 1;
        }
    }

    // === Input access ===

    /// The text being parsed, whatever the input kind. Diagnostics only.
    pub fn text(&self) -> &'a str {
        match &self.input {
            Input::Chars { source, .. } | Input::Tokens { source, .. } => *source,
        }
    }

    /// The whole source text (char level only).
    pub fn source(&self) -> Result<&'a str, Failure> {
        match &self.input {
            Input::Chars { source, .. } => Ok(*source),
            Input::Tokens { .. } => Err(self.fault("char input requested from a token context")),
        }
    }

    /// The unconsumed part of the window (char level only).
    pub fn rest(&self) -> Result<&'a str, Failure> {
        let source = self.source()?;
        Ok(source.get(self.at..self.end()).unwrap_or(""))
    }

    /// The current char; `None` at the end (char level only).
    pub fn peek_char(&self) -> Result<Option<char>, Failure> {
        Ok(self.rest()?.chars().next())
    }

    /// The current token; `None` at the end (token level only).
    pub fn current_token(&self) -> Result<Option<&'a Tok>, Failure> {
        match &self.input {
            Input::Tokens { tokens, .. } => Ok((*tokens).get(self.at)),
            Input::Chars { .. } => Err(self.fault("token input requested from a char context")),
        }
    }

    // === Errors ===

    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    pub(crate) fn take_error(&mut self) -> Option<ParseError> {
        self.error.take()
    }

    pub(crate) fn set_error(&mut self, error: Option<ParseError>) {
        self.error = error;
    }

    /// Merge `earlier` (saved before a failed branch) with the current error.
    pub(crate) fn merge_error(&mut self, earlier: Option<ParseError>) {
        let current = self.error.take();
        self.error = ParseError::merge_opt(earlier, current);
    }

    /// What the input holds at the current position.
    pub fn encountered(&mut self) -> ParseError {
        let index = self.index();
        match &mut self.input {
            Input::Chars { source, end } => {
                let what: Arc<str> = match source.get(self.at..*end).and_then(|r| r.chars().next()) {
                    Some(c) => c.escape_debug().to_string().into(),
                    None => EOF_MARKER.into(),
                };
                ParseError::encountered(index, what)
            }
            Input::Tokens {
                tokens,
                eof_title,
                show,
                encountered,
                ..
            } => {
                let (tokens, eof_title, show): (&'a [Tok], &'a str, ShowToken<'a>) =
                    (*tokens, *eof_title, *show);
                let slot = self.at.min(tokens.len());
                if let Some(Some(cached)) = encountered.get(slot) {
                    return cached.clone();
                }
                let what: Arc<str> = match tokens.get(slot) {
                    Some(tok) => show(&tok.token).into(),
                    None => eof_title.into(),
                };
                let err = ParseError::encountered(index, what);
                if let Some(cell) = encountered.get_mut(slot) {
                    *cell = Some(err.clone());
                }
                err
            }
        }
    }

    /// Fail expecting `label`.
    pub fn fail_expecting(&mut self, label: impl Into<Arc<str>>) -> Failure {
        self.error = Some(ParseError::expecting(self.index(), label.into()));
        Failure::Fail
    }

    /// Fail expecting `label`, and say what was there instead.
    pub fn fail_expecting_encountered(&mut self, label: impl Into<Arc<str>>) -> Failure {
        self.error = Some(self.encountered().set_expecting(label.into()));
        Failure::Fail
    }

    /// Fail with "`label` unexpected".
    pub fn fail_unexpected(&mut self, label: impl Into<Arc<str>>) -> Failure {
        self.error = Some(ParseError::unexpected(self.index(), label.into()));
        Failure::Fail
    }

    /// Fail with a free-form message.
    pub fn fail_message(&mut self, message: impl Into<Arc<str>>) -> Failure {
        self.error = Some(ParseError::message(self.index(), message.into()));
        Failure::Fail
    }

    /// Fail saying only what was encountered.
    pub fn fail_encountered(&mut self) -> Failure {
        self.error = Some(self.encountered());
        Failure::Fail
    }

    /// An internal fault at the current position.
    pub fn fault(&self, message: &str) -> Failure {
        let pos = self.pmap.to_pos(self.index());
        Failure::Fault(Box::new(ParserException::new(
            ExceptionKind::Internal,
            Some(message),
            None,
            self.module,
            pos,
        )))
    }
}

#[cfg(test)]
mod tests;
