//! Parser constructors that do not wrap another parser.

use std::sync::{Arc, OnceLock};

use super::Parser;
use crate::context::ParseContext;
use crate::failure::{Failure, Signal, SignalKey, UserError};
use crate::token::Tok;

/// Succeed with a clone of `value`, consuming nothing.
pub fn ret<T: Clone + Send + Sync + 'static>(value: T) -> Parser<T> {
    Parser::from_fn(move |_| Ok(value.clone()))
}

/// Succeed with the default value, consuming nothing.
pub fn one<T: Default + 'static>() -> Parser<T> {
    Parser::from_fn(|_| Ok(T::default()))
}

/// Fail, clearing the error: a failure that says nothing.
pub fn zero<T: 'static>() -> Parser<T> {
    Parser::from_fn(|ctx| {
        ctx.set_error(None);
        Err(Failure::Fail)
    })
}

/// Fail with a free-form message.
pub fn fail<T: 'static>(message: impl Into<Arc<str>>) -> Parser<T> {
    let message = message.into();
    Parser::from_fn(move |ctx| Err(ctx.fail_message(Arc::clone(&message))))
}

/// Fail expecting `label`.
pub fn expect<T: 'static>(label: impl Into<Arc<str>>) -> Parser<T> {
    let label = label.into();
    Parser::from_fn(move |ctx| Err(ctx.fail_expecting(Arc::clone(&label))))
}

/// Fail with "`label` unexpected".
pub fn unexpected<T: 'static>(label: impl Into<Arc<str>>) -> Parser<T> {
    let label = label.into();
    Parser::from_fn(move |ctx| Err(ctx.fail_unexpected(Arc::clone(&label))))
}

/// Raise an escape carrying `key`; see [`Parser::try_catch`].
pub fn raise<T: 'static>(key: SignalKey) -> Parser<T> {
    Parser::from_fn(move |_| Err(Failure::Signal(Box::new(Signal::new(key.clone())))))
}

/// End the parse with a [`UserError`]; not backtrackable.
pub fn abort<T: 'static>(message: impl Into<String>) -> Parser<T> {
    let message = message.into();
    Parser::from_fn(move |ctx| {
        let err = UserError::new(message.clone()).at(ctx.index());
        Err(Failure::User(Box::new(err)))
    })
}

/// Build the parser on every application. Recursion goes through here (or
/// through a [`ParserSlot`]).
pub fn lazy<T: 'static>(make: impl Fn() -> Parser<T> + Send + Sync + 'static) -> Parser<T> {
    Parser::from_fn_la(move |ctx, la| make().parse_with(ctx, la))
}

/// The current byte offset.
pub fn get_index() -> Parser<usize> {
    Parser::from_fn(|ctx| Ok(ctx.index()))
}

/// Succeed only at the end of input.
pub fn eof(label: impl Into<Arc<str>>) -> Parser<()> {
    let label = label.into();
    Parser::from_fn(move |ctx| {
        if ctx.is_eof() {
            Ok(())
        } else {
            Err(ctx.fail_expecting_encountered(Arc::clone(&label)))
        }
    })
}

/// A token that `f` accepts, mapped through `f`. Token level only.
pub fn from_token<T: 'static>(f: impl Fn(&Tok) -> Option<T> + Send + Sync + 'static) -> Parser<T> {
    Parser::from_fn(move |ctx| {
        let Some(tok) = ctx.current_token()? else {
            return Err(ctx.fail_encountered());
        };
        match f(tok) {
            Some(value) => {
                ctx.advance();
                Ok(value)
            }
            None => Err(ctx.fail_encountered()),
        }
    })
}

/// A token that satisfies `pred`. Token level only.
pub fn is_token(pred: impl Fn(&Tok) -> bool + Send + Sync + 'static) -> Parser<Tok> {
    from_token(move |tok| pred(tok).then(|| tok.clone()))
}

/// Any one token, labelled `label` at the end of input.
pub fn any_token(label: impl Into<Arc<str>>) -> Parser<Tok> {
    is_token(|_| true).label(label)
}

/// A forward reference for recursive grammars.
///
/// ```ignore
/// let expr = ParserSlot::new();
/// let atom = number | expr.parser().between(open, close);
/// expr.set(atom.infixl(plus_op));
/// ```
pub struct ParserSlot<T> {
    slot: Arc<OnceLock<Parser<T>>>,
}

impl<T> Clone for ParserSlot<T> {
    fn clone(&self) -> Self {
        ParserSlot {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: 'static> Default for ParserSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> ParserSlot<T> {
    pub fn new() -> Self {
        ParserSlot {
            slot: Arc::new(OnceLock::new()),
        }
    }

    /// Fill the slot. Returns `false` if it was already filled.
    pub fn set(&self, parser: Parser<T>) -> bool {
        self.slot.set(parser).is_ok()
    }

    /// A parser that runs whatever the slot holds at application time.
    pub fn parser(&self) -> Parser<T> {
        let slot = Arc::clone(&self.slot);
        Parser::from_fn_la(move |ctx: &mut ParseContext<'_>, la| match slot.get() {
            Some(p) => p.parse_with(ctx, la),
            None => Err(ctx.fault("parser slot used before it was set")),
        })
    }
}
