//! Repetition, separated lists and brackets.
//!
//! Every repetition runs the same loop over a fresh [`Accumulator`]:
//!
//! - the first `min` iterations must succeed;
//! - after that, an iteration that fails without consuming input ends the
//!   loop, and one that succeeds without consuming input ends it too (its
//!   value is dropped), so repeating an empty match terminates;
//! - an iteration that fails after consuming input fails the repetition;
//! - an escape leaves what was collected so far in the [`Signal`].

use super::prim::raise;
use super::{Parser, Recovery};
use crate::accumulator::{Accumulator, Count, Discard};
use crate::context::ParseContext;
use crate::failure::{Failure, Reply, SignalKey};
use weft_pattern::BoundsError;

/// Run `p` into `acc` at least `min` and at most `max` times.
pub(crate) fn repeat_into<T, A>(
    p: &Parser<T>,
    ctx: &mut ParseContext<'_>,
    mut acc: A,
    min: usize,
    max: Option<usize>,
) -> Reply<A::Output>
where
    T: 'static,
    A: Accumulator<T>,
    A::Output: 'static,
{
    let mut count = 0;
    while max.map_or(true, |max| count < max) {
        let before = ctx.snapshot();
        match p.parse(ctx) {
            Ok(value) => {
                if count >= min && !before.consumed(ctx) {
                    break;
                }
                acc.accumulate(value);
                count += 1;
            }
            Err(Failure::Fail) => {
                if count < min || before.consumed(ctx) {
                    return Err(Failure::Fail);
                }
                ctx.restore(before);
                break;
            }
            Err(Failure::Signal(mut signal)) => {
                signal.set_partial(acc.result());
                return Err(Failure::Signal(signal));
            }
            Err(other) => return Err(other),
        }
    }
    Ok(acc.result())
}

impl<T: 'static> Parser<T> {
    /// Zero or more.
    #[must_use]
    pub fn many(&self) -> Parser<Vec<T>> {
        self.many_min(0)
    }

    /// `min` or more.
    #[must_use]
    pub fn many_min(&self, min: usize) -> Parser<Vec<T>> {
        self.many_with(min, Vec::new)
    }

    /// `min` or more, collected by a fresh accumulator from `factory`.
    #[must_use]
    pub fn many_with<A>(&self, min: usize, factory: impl Fn() -> A + Send + Sync + 'static) -> Parser<A::Output>
    where
        A: Accumulator<T> + 'static,
        A::Output: 'static,
    {
        let this = self.clone();
        Parser::from_fn(move |ctx| repeat_into(&this, ctx, factory(), min, None))
    }

    /// Zero or more, results dropped.
    #[must_use]
    pub fn skip_many(&self) -> Parser<()> {
        self.many_with(0, || Discard)
    }

    /// `min` or more, counted.
    #[must_use]
    pub fn count_many(&self, min: usize) -> Parser<usize> {
        self.many_with(min, Count::default)
    }

    /// At most `max`.
    #[must_use]
    pub fn some(&self, max: usize) -> Parser<Vec<T>> {
        let this = self.clone();
        Parser::from_fn(move |ctx| repeat_into(&this, ctx, Vec::new(), 0, Some(max)))
    }

    /// Between `min` and `max`.
    pub fn some_range(&self, min: usize, max: usize) -> Result<Parser<Vec<T>>, BoundsError> {
        self.some_with(min, max, Vec::new)
    }

    /// Between `min` and `max`, collected by a fresh accumulator from
    /// `factory`.
    pub fn some_with<A>(
        &self,
        min: usize,
        max: usize,
        factory: impl Fn() -> A + Send + Sync + 'static,
    ) -> Result<Parser<A::Output>, BoundsError>
    where
        A: Accumulator<T> + 'static,
        A::Output: 'static,
    {
        BoundsError::check(min, max)?;
        let this = self.clone();
        Ok(Parser::from_fn(move |ctx| {
            repeat_into(&this, ctx, factory(), min, Some(max))
        }))
    }

    /// At most `max`, results dropped.
    #[must_use]
    pub fn skip_some(&self, max: usize) -> Parser<()> {
        let this = self.clone();
        Parser::from_fn(move |ctx| repeat_into(&this, ctx, Discard, 0, Some(max)))
    }

    /// Exactly `n`.
    #[must_use]
    pub fn repeat(&self, n: usize) -> Parser<Vec<T>> {
        let this = self.clone();
        Parser::from_fn(move |ctx| repeat_into(&this, ctx, Vec::with_capacity(n), n, Some(n)))
    }

    /// Exactly `n`, results dropped.
    #[must_use]
    pub fn skip_repeat(&self, n: usize) -> Parser<()> {
        let this = self.clone();
        Parser::from_fn(move |ctx| repeat_into(&this, ctx, Discard, n, Some(n)))
    }

    // === Lists ===

    /// One or more, separated by `sep`.
    #[must_use]
    pub fn sep_by1<S: 'static>(&self, sep: &Parser<S>) -> Parser<Vec<T>> {
        self.sep_by1_with(sep, Vec::new)
    }

    /// Zero or more, separated by `sep`.
    #[must_use]
    pub fn sep_by<S: 'static>(&self, sep: &Parser<S>) -> Parser<Vec<T>> {
        self.sep_by1(sep) | super::prim::one()
    }

    #[must_use]
    pub fn skip_sep_by1<S: 'static>(&self, sep: &Parser<S>) -> Parser<()> {
        self.sep_by1_with(sep, || Discard)
    }

    #[must_use]
    pub fn skip_sep_by<S: 'static>(&self, sep: &Parser<S>) -> Parser<()> {
        self.skip_sep_by1(sep) | super::prim::one()
    }

    fn sep_by1_with<S, A>(&self, sep: &Parser<S>, factory: impl Fn() -> A + Send + Sync + 'static) -> Parser<A::Output>
    where
        S: 'static,
        A: Accumulator<T> + 'static,
        A::Output: 'static,
    {
        let this = self.clone();
        let rest = sep.then(self);
        Parser::from_fn(move |ctx| {
            let first = this.parse(ctx)?;
            let mut acc = factory();
            acc.accumulate(first);
            repeat_into(&rest, ctx, acc, 0, None)
        })
    }

    /// One or more, separated by `sep`, with an optional trailing `sep`.
    #[must_use]
    pub fn sep_end_by1<S: 'static>(&self, sep: &Parser<S>) -> Parser<Vec<T>> {
        self.sep_end_by1_with(sep, Vec::new)
    }

    /// Zero or more, separated by `sep`, with an optional trailing `sep`.
    #[must_use]
    pub fn sep_end_by<S: 'static>(&self, sep: &Parser<S>) -> Parser<Vec<T>> {
        self.sep_end_by1(sep) | super::prim::one()
    }

    #[must_use]
    pub fn skip_sep_end_by1<S: 'static>(&self, sep: &Parser<S>) -> Parser<()> {
        self.sep_end_by1_with(sep, || Discard)
    }

    #[must_use]
    pub fn skip_sep_end_by<S: 'static>(&self, sep: &Parser<S>) -> Parser<()> {
        self.skip_sep_end_by1(sep) | super::prim::one()
    }

    /// After a separator, either another element follows or the list ends
    /// by raising `end`; the repetition hands what it collected to the
    /// signal and `try_catch` turns it back into the result.
    fn sep_end_by1_with<S, A>(
        &self,
        sep: &Parser<S>,
        factory: impl Fn() -> A + Send + Sync + 'static,
    ) -> Parser<A::Output>
    where
        S: 'static,
        A: Accumulator<T> + 'static,
        A::Output: 'static,
    {
        let end = SignalKey::unique();
        let this = self.clone();
        let rest = sep.then(&(self.clone() | raise(end.clone())));
        Parser::from_fn(move |ctx| {
            let first = this.parse(ctx)?;
            let mut acc = factory();
            acc.accumulate(first);
            repeat_into(&rest, ctx, acc, 0, None)
        })
        .try_catch(move |collected, signal| match collected.take() {
            Some(collected) if signal.is(&end) => Recovery::Value(collected),
            taken => {
                *collected = taken;
                Recovery::Propagate
            }
        })
    }

    /// Zero or more, each terminated by `sep`.
    #[must_use]
    pub fn end_by<S: 'static>(&self, sep: &Parser<S>) -> Parser<Vec<T>> {
        self.followed_by(sep).many()
    }

    /// One or more, each terminated by `sep`.
    #[must_use]
    pub fn end_by1<S: 'static>(&self, sep: &Parser<S>) -> Parser<Vec<T>> {
        self.followed_by(sep).many_min(1)
    }

    #[must_use]
    pub fn skip_end_by<S: 'static>(&self, sep: &Parser<S>) -> Parser<()> {
        self.followed_by(sep).skip_many()
    }

    #[must_use]
    pub fn skip_end_by1<S: 'static>(&self, sep: &Parser<S>) -> Parser<()> {
        self.followed_by(sep).many_with(1, || Discard)
    }

    /// `open`, then `self`, then `close`; the result of `self`.
    #[must_use]
    pub fn between<O: 'static, C: 'static>(&self, open: &Parser<O>, close: &Parser<C>) -> Parser<T> {
        open.then(&self.followed_by(close))
    }
}
