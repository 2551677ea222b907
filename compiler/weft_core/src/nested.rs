//! Parsing inside a parse: a token grammar over lexed chars, or a char
//! parser over the range another parser matched.
//!
//! Either way the nested run gets its own context. On success its steps are
//! added to the outer context; on an ordinary failure the outer cursor moves
//! to where the nested run failed, so the reported position and the
//! alternation commit rule both see the real progress.

use std::sync::Arc;

use crate::context::ParseContext;
use crate::failure::{Failure, Reply};
use crate::parser::Parser;
use crate::token::{Tok, Token};

/// Lex with `lexer`, then run `grammar` over the tokens.
///
/// `eof_title` and `show` say what "encountered" means at the token level;
/// `module` names the nested run in diagnostics.
pub fn parse_tokens<T: 'static>(
    lexer: &Parser<Vec<Tok>>,
    grammar: &Parser<T>,
    eof_title: &str,
    show: impl Fn(&Token) -> String + Send + Sync + 'static,
    module: &str,
) -> Parser<T> {
    let (lexer, grammar) = (lexer.clone(), grammar.clone());
    let eof_title: Arc<str> = eof_title.into();
    let module: Arc<str> = module.into();
    Parser::from_fn(move |ctx| {
        let tokens = lexer.parse(ctx)?;
        let source = ctx.source()?;
        let mut inner = ParseContext::for_tokens(
            source,
            &tokens,
            ctx.index(),
            &eof_title,
            &show,
            &module,
            ctx.position_map(),
        );
        let reply = grammar.parse(&mut inner);
        join(ctx, &mut inner, reply)
    })
}

/// Run `outer`, then `inner` over exactly the chars `outer` matched.
pub fn scan_chars<A: 'static, T: 'static>(outer: &Parser<A>, inner: &Parser<T>, module: &str) -> Parser<T> {
    let (outer, inner) = (outer.clone(), inner.clone());
    let module: Arc<str> = module.into();
    Parser::from_fn(move |ctx| {
        let from = ctx.at();
        outer.parse(ctx)?;
        let source = ctx.source()?;
        let mut nested = ParseContext::for_char_range(source, from, ctx.at(), &module, ctx.position_map());
        let reply = inner.parse(&mut nested);
        join(ctx, &mut nested, reply)
    })
}

fn join<T>(outer: &mut ParseContext<'_>, inner: &mut ParseContext<'_>, reply: Reply<T>) -> Reply<T> {
    match reply {
        Ok(value) => {
            outer.set_step(outer.step() + inner.step());
            Ok(value)
        }
        Err(Failure::Fail) => {
            outer.set_at(inner.index());
            outer.set_error(inner.take_error());
            Err(Failure::Fail)
        }
        Err(other) => Err(other),
    }
}
