//! Entry points: apply a parser to a whole input and turn whatever stopped
//! it into a [`ParserException`].

use weft_pos::{DefaultPositionMap, PositionMap};

use crate::context::ParseContext;
use crate::debug::{is_debug_enabled, DebugFlags};
use crate::exception::{ExceptionKind, ParserException};
use crate::failure::{Failure, Reply};
use crate::parser::Parser;
use crate::token::{Tok, Token};

/// Parse `source` with line and column numbers counted from 1.
pub fn run_parser<T: 'static>(source: &str, parser: &Parser<T>, module: &str) -> Result<T, ParserException> {
    let pmap = DefaultPositionMap::with_defaults(source);
    run_parser_with(source, parser, &pmap, module)
}

/// Parse `source`, positioning diagnostics with `pmap`.
pub fn run_parser_with<T: 'static>(
    source: &str,
    parser: &Parser<T>,
    pmap: &dyn PositionMap,
    module: &str,
) -> Result<T, ParserException> {
    let mut ctx = ParseContext::for_chars(source, module, pmap);
    let reply = parser.parse(&mut ctx);
    finish(&mut ctx, reply)
}

/// Parse `tokens`, lexed from `source`.
pub fn run_tokens<T: 'static>(
    source: &str,
    tokens: &[Tok],
    parser: &Parser<T>,
    eof_title: &str,
    show: &dyn Fn(&Token) -> String,
    module: &str,
) -> Result<T, ParserException> {
    let pmap = DefaultPositionMap::with_defaults(source);
    let mut ctx = ParseContext::for_tokens(source, tokens, source.len(), eof_title, show, module, &pmap);
    let reply = parser.parse(&mut ctx);
    finish(&mut ctx, reply)
}

fn finish<T>(ctx: &mut ParseContext<'_>, reply: Reply<T>) -> Result<T, ParserException> {
    let exception = match reply {
        Ok(value) => return Ok(value),
        Err(Failure::Fail) => {
            let error = ctx.take_error();
            let index = error.as_ref().map_or_else(|| ctx.index(), |e| e.index());
            exception_at(ctx, ExceptionKind::Syntax, None, error.map(|e| e.render()), index)
        }
        Err(Failure::Signal(signal)) => {
            let message = format!("User exception: {}", signal.describe());
            exception_at(ctx, ExceptionKind::Syntax, Some(&message), None, ctx.index())
        }
        Err(Failure::User(user)) => {
            let index = user.index.unwrap_or_else(|| ctx.index());
            exception_at(ctx, ExceptionKind::User, Some(&user.message), None, index)
        }
        Err(Failure::Fault(fault)) => *fault,
    };
    if is_debug_enabled(DebugFlags::ERRORS) {
        tracing::debug!(
            module = ctx.module(),
            kind = ?exception.kind(),
            frames = exception.frames().len(),
            "parse failed:\n{exception}"
        );
    }
    Err(exception)
}

fn exception_at(
    ctx: &ParseContext<'_>,
    kind: ExceptionKind,
    message: Option<&str>,
    detail: Option<crate::error::ErrorDetail>,
    index: usize,
) -> ParserException {
    let pos = ctx.position_map().to_pos(index);
    ParserException::new(kind, message, detail, ctx.module(), pos)
}
