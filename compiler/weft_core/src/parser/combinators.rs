//! Sequencing, alternation and control combinators.

use std::sync::Arc;

use super::{plus, Parser};
use crate::error::ParseError;
use crate::failure::{Failure, Signal, UserError};

/// What a [`try_catch`](Parser::try_catch) handler does with an escape.
pub enum Recovery<T> {
    /// Succeed with this value where the escape was caught.
    Value(T),
    /// Continue by running this parser from where the escape was caught.
    Parser(Parser<T>),
    /// Not ours: keep unwinding.
    Propagate,
}

impl<T: 'static> Parser<T> {
    /// Run `self`, then the parser `f` builds from its result.
    #[must_use]
    pub fn bind<R: 'static>(&self, f: impl Fn(T) -> Parser<R> + Send + Sync + 'static) -> Parser<R> {
        let this = self.clone();
        Parser::from_fn(move |ctx| {
            let value = this.parse(ctx)?;
            f(value).parse(ctx)
        })
    }

    /// Run `self`, discard its result, run `next`.
    #[must_use]
    pub fn then<R: 'static>(&self, next: &Parser<R>) -> Parser<R> {
        let (this, next) = (self.clone(), next.clone());
        Parser::from_fn(move |ctx| {
            this.parse(ctx)?;
            next.parse(ctx)
        })
    }

    /// Run `self`, then `next`; keep the result of `self`.
    #[must_use]
    pub fn followed_by<R: 'static>(&self, next: &Parser<R>) -> Parser<T> {
        let (this, next) = (self.clone(), next.clone());
        Parser::from_fn(move |ctx| {
            let value = this.parse(ctx)?;
            next.parse(ctx)?;
            Ok(value)
        })
    }

    #[must_use]
    pub fn map<R: 'static>(&self, f: impl Fn(T) -> R + Send + Sync + 'static) -> Parser<R> {
        let this = self.clone();
        Parser::from_fn(move |ctx| this.parse(ctx).map(&f))
    }

    /// Run `self` then `other` and combine both results.
    #[must_use]
    pub fn and<U: 'static, R: 'static>(
        &self,
        other: &Parser<U>,
        f: impl Fn(T, U) -> R + Send + Sync + 'static,
    ) -> Parser<R> {
        let (this, other) = (self.clone(), other.clone());
        Parser::from_fn(move |ctx| {
            let a = this.parse(ctx)?;
            let b = other.parse(ctx)?;
            Ok(f(a, b))
        })
    }

    /// `self`, or `other` if `self` fails without committing.
    #[must_use]
    pub fn or(&self, other: &Parser<T>) -> Parser<T> {
        plus(vec![self.clone(), other.clone()])
    }

    /// All or nothing: on failure the cursor is put back, on success the
    /// whole application counts as one step.
    #[must_use]
    pub fn atomize(&self) -> Parser<T> {
        let this = self.clone();
        Parser::from_fn(move |ctx| {
            let start = ctx.snapshot();
            match this.parse(ctx) {
                Ok(value) => {
                    ctx.set_step(start.step + 1);
                    Ok(value)
                }
                Err(e) => {
                    ctx.restore(start);
                    Err(e)
                }
            }
        })
    }

    /// Let the alternation directly inside backtrack out of branches that
    /// took fewer than `n` steps.
    #[must_use]
    pub fn lookahead(&self, n: usize) -> Parser<T> {
        let this = self.clone();
        Parser::from_fn(move |ctx| this.parse_with(ctx, n))
    }

    /// A successful application counts as `n` steps.
    #[must_use]
    pub fn step(&self, n: usize) -> Parser<T> {
        let this = self.clone();
        Parser::from_fn(move |ctx| {
            let start = ctx.step();
            let value = this.parse(ctx)?;
            ctx.set_step(start + n);
            Ok(value)
        })
    }

    /// Run `self` and put the cursor back, whatever happened.
    #[must_use]
    pub fn peek(&self) -> Parser<T> {
        let this = self.clone();
        Parser::from_fn(move |ctx| {
            let start = ctx.snapshot();
            let reply = this.parse(ctx);
            ctx.restore(start);
            reply
        })
    }

    /// Succeed, consuming nothing, iff `self` fails; the failure is
    /// reported as `self`'s name unexpected.
    #[must_use]
    pub fn not(&self) -> Parser<()> {
        let label = self.name().unwrap_or("something").to_owned();
        self.not_with(label)
    }

    /// Succeed, consuming nothing, iff `self` fails; otherwise fail with
    /// "`label` unexpected".
    #[must_use]
    pub fn not_with(&self, label: impl Into<Arc<str>>) -> Parser<()> {
        let label: Arc<str> = label.into();
        self.peek()
            .if_else(move |_| super::prim::unexpected(Arc::clone(&label)), &super::prim::ret(()))
    }

    /// On a failure that consumed nothing, replace what was expected with
    /// `label`.
    #[must_use]
    pub fn label(&self, label: impl Into<Arc<str>>) -> Parser<T> {
        let this = self.clone();
        let label: Arc<str> = label.into();
        Parser::from_fn_la(move |ctx, la| {
            let start = ctx.snapshot();
            match this.parse_with(ctx, la) {
                Err(Failure::Fail) if !start.consumed(ctx) => {
                    let labelled = match ctx.take_error() {
                        Some(err) => err.set_expecting(Arc::clone(&label)),
                        None => ParseError::expecting(ctx.index(), Arc::clone(&label)),
                    };
                    ctx.set_error(Some(labelled));
                    Err(Failure::Fail)
                }
                reply => reply,
            }
        })
    }

    /// `Some(value)`, or `None` if `self` fails without committing.
    #[must_use]
    pub fn optional(&self) -> Parser<Option<T>> {
        self.map(Some) | super::prim::one()
    }

    /// `self`, or `default` if `self` fails without committing.
    #[must_use]
    pub fn option(&self, default: T) -> Parser<T>
    where
        T: Clone + Send + Sync,
    {
        self.or(&super::prim::ret(default))
    }

    /// If `self` succeeds continue with `yes(result)`; if it fails without
    /// committing, run `no` from the same position.
    #[must_use]
    pub fn if_else<R: 'static>(
        &self,
        yes: impl Fn(T) -> Parser<R> + Send + Sync + 'static,
        no: &Parser<R>,
    ) -> Parser<R> {
        let (this, no) = (self.clone(), no.clone());
        Parser::from_fn_la(move |ctx, la| {
            let start = ctx.snapshot();
            match this.parse(ctx) {
                Ok(value) => return yes(value).parse(ctx),
                Err(Failure::Fail) => {}
                Err(other) => return Err(other),
            }
            if start.committed(ctx, la) {
                return Err(Failure::Fail);
            }
            ctx.restore(start);
            let earlier = ctx.take_error();
            match no.parse(ctx) {
                Ok(value) => {
                    ctx.set_error(earlier);
                    Ok(value)
                }
                Err(Failure::Fail) => {
                    ctx.merge_error(earlier);
                    Err(Failure::Fail)
                }
                Err(other) => Err(other),
            }
        })
    }

    /// Fail with `message` if `self` succeeds without consuming input.
    #[must_use]
    pub fn is_consumed(&self, message: impl Into<Arc<str>>) -> Parser<T> {
        let this = self.clone();
        let message: Arc<str> = message.into();
        Parser::from_fn(move |ctx| {
            let start = ctx.snapshot();
            let value = this.parse(ctx)?;
            if start.consumed(ctx) {
                Ok(value)
            } else {
                Err(ctx.fail_message(Arc::clone(&message)))
            }
        })
    }

    /// Fail with `message` (consuming nothing) if `self` consumes input.
    #[must_use]
    pub fn not_consumed(&self, message: impl Into<Arc<str>>) -> Parser<T> {
        let this = self.clone();
        let message: Arc<str> = message.into();
        Parser::from_fn(move |ctx| {
            let start = ctx.snapshot();
            let value = this.parse(ctx)?;
            if start.consumed(ctx) {
                ctx.restore(start);
                Err(ctx.fail_message(Arc::clone(&message)))
            } else {
                Ok(value)
            }
        })
    }

    /// Accept only results satisfying `pred`; a rejected result puts the
    /// cursor back and fails expecting `label` (or silently without one).
    #[must_use]
    pub fn is_return(
        &self,
        pred: impl Fn(&T) -> bool + Send + Sync + 'static,
        label: Option<&str>,
    ) -> Parser<T> {
        let label: Option<Arc<str>> = label.map(Arc::from);
        let this = self.clone();
        Parser::from_fn(move |ctx| {
            let start = ctx.snapshot();
            let value = this.parse(ctx)?;
            if pred(&value) {
                return Ok(value);
            }
            ctx.restore(start);
            match &label {
                Some(label) => Err(ctx.fail_expecting(Arc::clone(label))),
                None => {
                    ctx.set_error(None);
                    Err(Failure::Fail)
                }
            }
        })
        .atomize()
    }

    /// Catch escapes raised inside `self`.
    ///
    /// The handler sees whatever a repetition unwound by the escape had
    /// collected (if it produced a `T`) and the escape itself. It takes the
    /// partial result to use it; what it leaves stays attached when the
    /// escape propagates. The error slot is reset to what it was before
    /// `self` ran.
    #[must_use]
    pub fn try_catch(
        &self,
        handler: impl Fn(&mut Option<T>, &Signal) -> Recovery<T> + Send + Sync + 'static,
    ) -> Parser<T> {
        let this = self.clone();
        Parser::from_fn(move |ctx| {
            let original = ctx.error().cloned();
            match this.parse(ctx) {
                Err(Failure::Signal(mut signal)) => {
                    let mut partial = signal.take_partial::<T>();
                    match handler(&mut partial, &signal) {
                        Recovery::Value(value) => {
                            ctx.set_error(original);
                            Ok(value)
                        }
                        Recovery::Parser(p) => {
                            ctx.set_error(original);
                            p.parse(ctx)
                        }
                        Recovery::Propagate => {
                            if let Some(partial) = partial {
                                signal.set_partial(partial);
                            }
                            Err(Failure::Signal(signal))
                        }
                    }
                }
                reply => reply,
            }
        })
    }

    /// Map the result, or end the parse with the returned [`UserError`].
    ///
    /// The error is reported at the index it carries, or where `self`
    /// started.
    #[must_use]
    pub fn try_map<R: 'static>(
        &self,
        f: impl Fn(T) -> Result<R, UserError> + Send + Sync + 'static,
    ) -> Parser<R> {
        let this = self.clone();
        Parser::from_fn(move |ctx| {
            let index = ctx.index();
            let value = this.parse(ctx)?;
            f(value).map_err(|mut e| {
                e.index.get_or_insert(index);
                Failure::User(Box::new(e))
            })
        })
    }
}

/// Run every parser in order; keep the last result. No parsers succeed
/// with the default value, consuming nothing.
pub fn sequence<T: Default + 'static>(parsers: Vec<Parser<T>>) -> Parser<T> {
    Parser::from_fn(move |ctx| {
        let mut last = T::default();
        for p in &parsers {
            last = p.parse(ctx)?;
        }
        Ok(last)
    })
}

/// Combine the results of `parsers` (all must succeed) with `f`.
pub fn map_n<T: 'static, R: 'static>(
    parsers: Vec<Parser<T>>,
    f: impl Fn(Vec<T>) -> R + Send + Sync + 'static,
) -> Parser<R> {
    Parser::from_fn(move |ctx| {
        let mut values = Vec::with_capacity(parsers.len());
        for p in &parsers {
            values.push(p.parse(ctx)?);
        }
        Ok(f(values))
    })
}

