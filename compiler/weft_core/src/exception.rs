//! Reportable parse failures and their frame traces.

use std::fmt;

use thiserror::Error;
use weft_pos::Pos;

use crate::error::ErrorDetail;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExceptionKind {
    /// The input does not match the grammar.
    Syntax,
    /// Grammar code rejected the input.
    User,
    /// The engine or a grammar primitive misbehaved.
    Internal,
}

/// One named parser an internal fault unwound through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsingFrame {
    pub module: String,
    pub index: usize,
    pub pos: Pos,
    pub parser: String,
}

impl fmt::Display for ParsingFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}: {}", self.module, self.pos, self.parser)
    }
}

/// A parse that did not produce a value.
///
/// The message is rendered once at construction:
/// `[message "\n"] module " - " diagnostic`.
#[derive(Clone, Debug, Error)]
#[error("{text}")]
pub struct ParserException {
    kind: ExceptionKind,
    text: String,
    detail: Option<ErrorDetail>,
    module: String,
    pos: Pos,
    frames: Vec<ParsingFrame>,
}

impl ParserException {
    pub fn new(
        kind: ExceptionKind,
        message: Option<&str>,
        detail: Option<ErrorDetail>,
        module: &str,
        pos: Pos,
    ) -> Self {
        let mut text = String::new();
        if let Some(message) = message {
            text.push_str(message);
            text.push('\n');
        }
        text.push_str(module);
        text.push_str(" - ");
        match &detail {
            Some(detail) => text.push_str(&detail.show(pos)),
            None => {
                text.push_str(&pos.to_string());
                text.push_str(":\n");
            }
        }
        ParserException {
            kind,
            text,
            detail,
            module: module.to_owned(),
            pos,
            frames: Vec::new(),
        }
    }

    pub fn kind(&self) -> ExceptionKind {
        self.kind
    }

    pub fn detail(&self) -> Option<&ErrorDetail> {
        self.detail.as_ref()
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn line(&self) -> u32 {
        self.pos.line
    }

    pub fn column(&self) -> u32 {
        self.pos.column
    }

    /// Innermost first.
    pub fn frames(&self) -> &[ParsingFrame] {
        &self.frames
    }

    pub(crate) fn push_frame(&mut self, frame: ParsingFrame) {
        self.frames.push(frame);
    }

    /// One frame per line, innermost first.
    pub fn write_trace(&self, out: &mut impl fmt::Write) -> fmt::Result {
        for frame in &self.frames {
            writeln!(out, "{frame}")?;
        }
        Ok(())
    }
}
