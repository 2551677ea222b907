//! Stack growth for recursive parser application.
//!
//! A combinator grammar is interpreted by walking its parser graph, so a
//! grammar for nested input (parenthesized expressions, nestable block
//! comments, `lazy` references to itself) recurses once per nesting level.
//! Every parser application goes through [`ensure_sufficient_stack`] so that
//! such input grows the stack instead of overflowing it.
//!
//! # Platform Support
//!
//! - **Native targets**: `stacker` allocates a new segment on demand.
//! - **WASM targets**: passthrough.
//!
//! # Configuration
//!
//! - **Red zone**: 128KB. A single parser application (including the
//!   error rendering a failing branch may perform) fits comfortably.
//! - **Growth size**: 1MB per new segment.

/// Minimum stack space to keep available before applying a parser.
const RED_ZONE: usize = 128 * 1024;

/// Stack space to allocate when growing.
const STACK_PER_SEGMENT: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_SEGMENT, f)
}

/// WASM version: call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Remaining stack in bytes, when the platform can tell.
///
/// Used by debug tracing to annotate very deep applications.
#[cfg(not(target_arch = "wasm32"))]
pub fn remaining_stack() -> Option<usize> {
    stacker::remaining_stack()
}

/// WASM version: unknown.
#[cfg(target_arch = "wasm32")]
pub fn remaining_stack() -> Option<usize> {
    None
}
