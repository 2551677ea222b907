//! The typed parser algebra.
//!
//! A [`Parser<T>`] is an immutable, shareable computation over a
//! [`ParseContext`] that yields a `T` or a [`Failure`]. Grammars are built
//! once and applied to any number of inputs, from any number of threads.
//!
//! # Consumption and lookahead
//!
//! Alternation only tries the next branch when the previous one failed
//! without committing, where "committed" means the cursor moved *and* at
//! least `look_ahead` logical steps were taken (default 1). `lookahead(n)`
//! widens that window for the alternation it wraps; `atomize` and `step`
//! change how many steps a parser is worth.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`prim`] | constructors: `ret`, `zero`, `expect`, `raise`, `lazy`, token tests, ... |
//! | `combinators` | sequencing, alternation, atomicity, labels, escapes |
//! | `repeat` | `many`/`some`/`repeat` families, separated and bracketed lists |
//! | `trace` | debug hooks |

mod combinators;
pub mod prim;
mod repeat;
mod trace;

use std::fmt;
use std::sync::Arc;

use crate::context::ParseContext;
use crate::exception::ParsingFrame;
use crate::failure::{Failure, Reply};

pub use combinators::{map_n, sequence, Recovery};
pub(crate) use repeat::repeat_into;
pub use trace::TraceEvent;

/// The lookahead every parser gets unless `lookahead(n)` says otherwise.
pub const DEFAULT_LOOK_AHEAD: usize = 1;

/// One combinator node.
trait Node<T>: Send + Sync {
    fn apply(&self, ctx: &mut ParseContext<'_>, look_ahead: usize) -> Reply<T>;

    /// Flattenable alternatives, for alternation nodes.
    fn alternatives(&self) -> Option<&[Parser<T>]> {
        None
    }
}

struct FnNode<F>(F);

impl<T, F> Node<T> for FnNode<F>
where
    F: Fn(&mut ParseContext<'_>, usize) -> Reply<T> + Send + Sync,
{
    #[inline]
    fn apply(&self, ctx: &mut ParseContext<'_>, look_ahead: usize) -> Reply<T> {
        (self.0)(ctx, look_ahead)
    }
}

/// A composable parser producing `T`.
pub struct Parser<T> {
    node: Arc<dyn Node<T>>,
    name: Option<Arc<str>>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Parser {
            node: Arc::clone(&self.node),
            name: self.name.clone(),
        }
    }
}

impl<T> fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "Parser({name})"),
            None => f.write_str("Parser"),
        }
    }
}

impl<T: 'static> Parser<T> {
    fn from_node(node: impl Node<T> + 'static) -> Self {
        Parser {
            node: Arc::new(node),
            name: None,
        }
    }

    /// A primitive parser from a function of the context.
    ///
    /// The function owns the usual contract: on success advance the cursor
    /// past what it recognized, on `Failure::Fail` leave an error in the
    /// context (the `fail_*` helpers do both).
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&mut ParseContext<'_>) -> Reply<T> + Send + Sync + 'static,
    {
        Self::from_node(FnNode(move |ctx: &mut ParseContext<'_>, _la: usize| f(ctx)))
    }

    /// Like [`from_fn`](Self::from_fn), for nodes that honor an enclosing
    /// `lookahead(n)`.
    fn from_fn_la<F>(f: F) -> Self
    where
        F: Fn(&mut ParseContext<'_>, usize) -> Reply<T> + Send + Sync + 'static,
    {
        Self::from_node(FnNode(f))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name this parser. Named parsers appear in the frame trace of an
    /// internal fault; renaming never changes what is parsed.
    #[must_use]
    pub fn rename(&self, name: impl Into<Arc<str>>) -> Self {
        Parser {
            node: Arc::clone(&self.node),
            name: Some(name.into()),
        }
    }

    /// Apply with the default lookahead.
    #[inline]
    pub fn parse(&self, ctx: &mut ParseContext<'_>) -> Reply<T> {
        self.parse_with(ctx, DEFAULT_LOOK_AHEAD)
    }

    fn parse_with(&self, ctx: &mut ParseContext<'_>, look_ahead: usize) -> Reply<T> {
        weft_stack::ensure_sufficient_stack(|| match self.node.apply(ctx, look_ahead) {
            Err(Failure::Fault(mut fault)) => {
                if let Some(name) = &self.name {
                    let index = ctx.index();
                    fault.push_frame(ParsingFrame {
                        module: ctx.module().to_owned(),
                        index,
                        pos: ctx.position_map().to_pos(index),
                        parser: name.to_string(),
                    });
                }
                Err(Failure::Fault(fault))
            }
            other => other,
        })
    }
}

/// Ordered alternation.
struct Sum<T> {
    alts: Vec<Parser<T>>,
}

impl<T: 'static> Node<T> for Sum<T> {
    fn apply(&self, ctx: &mut ParseContext<'_>, look_ahead: usize) -> Reply<T> {
        let start = ctx.snapshot();
        for p in &self.alts {
            let before = ctx.error().cloned();
            match p.parse(ctx) {
                Err(Failure::Fail) => {}
                done => return done,
            }
            if start.committed(ctx, look_ahead) {
                return Err(Failure::Fail);
            }
            ctx.merge_error(before);
            ctx.restore(start);
        }
        Err(Failure::Fail)
    }

    fn alternatives(&self) -> Option<&[Parser<T>]> {
        Some(&self.alts)
    }
}

/// Alternation that runs every alternative and keeps the longest (or
/// shortest) success; ties go to the earlier alternative.
struct Favored<T> {
    alts: Vec<Parser<T>>,
    prefer: fn(usize, usize) -> bool,
}

impl<T: 'static> Node<T> for Favored<T> {
    fn apply(&self, ctx: &mut ParseContext<'_>, _look_ahead: usize) -> Reply<T> {
        let start = ctx.snapshot();
        let mut error = None;
        for (i, p) in self.alts.iter().enumerate() {
            match p.parse(ctx) {
                Ok(value) => return self.best(ctx, start, value, &self.alts[i + 1..]),
                Err(Failure::Fail) => {}
                Err(other) => return Err(other),
            }
            let current = ctx.take_error();
            error = crate::error::ParseError::merge_opt(error, current);
            ctx.restore(start);
        }
        ctx.set_error(error);
        Err(Failure::Fail)
    }
}

impl<T: 'static> Favored<T> {
    fn best(
        &self,
        ctx: &mut ParseContext<'_>,
        start: crate::context::Snapshot,
        value: T,
        rest: &[Parser<T>],
    ) -> Reply<T> {
        let mut best = ctx.snapshot();
        let mut result = value;
        for p in rest {
            ctx.restore(start);
            match p.parse(ctx) {
                Ok(candidate) if (self.prefer)(ctx.at(), best.at) => {
                    best = ctx.snapshot();
                    result = candidate;
                }
                Ok(_) | Err(Failure::Fail) => {}
                Err(other) => return Err(other),
            }
        }
        ctx.restore(best);
        Ok(result)
    }
}

/// Alternatives of `p` if it is an unnamed alternation, else `p` itself.
fn flatten_into<T: 'static>(p: &Parser<T>, out: &mut Vec<Parser<T>>) {
    match (&p.name, p.node.alternatives()) {
        (None, Some(alts)) => out.extend(alts.iter().cloned()),
        _ => out.push(p.clone()),
    }
}

/// The first alternative that succeeds; see the module docs for when the
/// next alternative is tried.
pub fn plus<T: 'static>(alts: Vec<Parser<T>>) -> Parser<T> {
    let mut flat = Vec::with_capacity(alts.len());
    for p in &alts {
        flatten_into(p, &mut flat);
    }
    Parser::from_node(Sum { alts: flat })
}

/// Try every alternative; keep the success that got furthest.
pub fn longest<T: 'static>(alts: Vec<Parser<T>>) -> Parser<T> {
    Parser::from_node(Favored {
        alts,
        prefer: |at, best| at > best,
    })
}

/// Try every alternative; keep the success that consumed the least.
pub fn shortest<T: 'static>(alts: Vec<Parser<T>>) -> Parser<T> {
    Parser::from_node(Favored {
        alts,
        prefer: |at, best| at < best,
    })
}

impl<T: 'static> std::ops::BitOr for Parser<T> {
    type Output = Parser<T>;

    fn bitor(self, rhs: Parser<T>) -> Parser<T> {
        plus(vec![self, rhs])
    }
}

#[cfg(test)]
mod tests;
