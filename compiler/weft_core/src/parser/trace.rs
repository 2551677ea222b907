//! Debug hooks.
//!
//! Hooks are attached only while [`DebugFlags::TRACE`] is enabled; otherwise
//! every method here returns the parser unchanged. Output goes through
//! `tracing` at debug level, so a subscriber has to be installed to see it.

use std::fmt;
use std::sync::Arc;

use super::Parser;
use crate::debug::{is_debug_enabled, DebugFlags};
use crate::failure::Failure;

/// How much input a trace line shows.
const LEADING: usize = 32;

/// What a hook sees after one application of the traced parser.
pub struct TraceEvent<'a, T> {
    pub outcome: Result<&'a T, &'a Failure>,
    /// The text being parsed.
    pub source: &'a str,
    /// Byte offset after the application.
    pub index: usize,
    /// Logical steps taken.
    pub steps: usize,
    /// Positions (chars or tokens) moved.
    pub offset: usize,
}

impl<T> TraceEvent<'_, T> {
    pub fn ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Failed with something other than an ordinary failure.
    pub fn raised(&self) -> bool {
        matches!(self.outcome, Err(f) if !f.is_fail())
    }

    /// Up to 32 chars of input from `index`, `<EOF>` at the end.
    pub fn leading(&self) -> String {
        let rest = self.source.get(self.index..).unwrap_or("");
        if rest.is_empty() {
            return crate::context::EOF_MARKER.to_owned();
        }
        let mut chars = rest.chars();
        let mut out: String = chars.by_ref().take(LEADING).collect();
        if chars.next().is_some() {
            out.push_str("...");
        }
        out
    }
}

impl<T> fmt::Debug for TraceEvent<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceEvent")
            .field("ok", &self.ok())
            .field("index", &self.index)
            .field("steps", &self.steps)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Parser<T> {
    /// Call `hook` after every application.
    #[must_use]
    pub fn trace(&self, hook: impl Fn(&TraceEvent<'_, T>) + Send + Sync + 'static) -> Parser<T> {
        if is_debug_enabled(DebugFlags::TRACE) {
            self.traced(hook)
        } else {
            self.clone()
        }
    }

    /// The hook wrapper itself, regardless of flags.
    pub(crate) fn traced(&self, hook: impl Fn(&TraceEvent<'_, T>) + Send + Sync + 'static) -> Parser<T> {
        let this = self.clone();
        let traced = Parser::from_fn_la(move |ctx, la| {
            let start = ctx.snapshot();
            let reply = this.parse_with(ctx, la);
            hook(&TraceEvent {
                outcome: reply.as_ref(),
                source: ctx.text(),
                index: ctx.index(),
                steps: start.steps_since(ctx),
                offset: ctx.at().saturating_sub(start.at),
            });
            reply
        });
        match self.name() {
            Some(name) => traced.rename(name),
            None => traced,
        }
    }

    /// Call `hook` after every failed application.
    #[must_use]
    pub fn on_error(&self, hook: impl Fn(&TraceEvent<'_, T>) + Send + Sync + 'static) -> Parser<T> {
        self.trace(move |event| {
            if !event.ok() {
                hook(event);
            }
        })
    }

    /// Call `hook` with the result after every successful application.
    #[must_use]
    pub fn on_success(&self, hook: impl Fn(&T, &TraceEvent<'_, T>) + Send + Sync + 'static) -> Parser<T> {
        self.trace(move |event| {
            if let Ok(value) = event.outcome {
                hook(value, event);
            }
        })
    }

    /// Log failures that took at least `min_steps` steps.
    #[must_use]
    pub fn print_error(&self, name: impl Into<Arc<str>>, min_steps: usize) -> Parser<T> {
        let name: Arc<str> = name.into();
        self.on_error(move |event| {
            if event.steps < min_steps {
                return;
            }
            let what = if event.raised() { "exception raised." } else { "failed." };
            tracing::debug!(
                parser = %name,
                near = %event.leading(),
                steps = event.steps,
                offset = event.offset,
                remaining_stack = ?weft_stack::remaining_stack(),
                "{name}: {what}"
            );
        })
    }

    /// Log every successful result.
    #[must_use]
    pub fn print_result(&self, name: impl Into<Arc<str>>) -> Parser<T>
    where
        T: fmt::Debug,
    {
        let name: Arc<str> = name.into();
        self.on_success(move |value, event| {
            tracing::debug!(
                parser = %name,
                near = %event.leading(),
                steps = event.steps,
                offset = event.offset,
                "{name} => {value:?}"
            );
        })
    }

    /// [`print_error`](Self::print_error) with one step, plus
    /// [`print_result`](Self::print_result).
    #[must_use]
    pub fn print_trace(&self, name: impl Into<Arc<str>>) -> Parser<T>
    where
        T: fmt::Debug,
    {
        let name: Arc<str> = name.into();
        self.print_error(Arc::clone(&name), 1).print_result(name)
    }
}
