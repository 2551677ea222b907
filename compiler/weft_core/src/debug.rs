//! Debug flags for the parser engine.
//!
//! Flags are read once from the `WEFT_DEBUG` environment variable, a
//! comma-separated list:
//! - `trace` - attach trace hooks (`trace`, `on_error`, `print_trace`, ...)
//! - `errors` - log every top-level failure before it is returned
//! - `all` - everything
//!
//! Example: `WEFT_DEBUG=trace RUST_LOG=weft_core=debug weft calc "1+"`
//!
//! Hooks check the flags when they are attached, not when they run, so a
//! grammar built with tracing off carries no hook nodes at all.

use std::sync::OnceLock;

use bitflags::bitflags;

bitflags! {
    /// Debug flags for the parser engine.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DebugFlags: u32 {
        /// Attach trace hooks.
        const TRACE = 0b0000_0001;
        /// Log top-level failures.
        const ERRORS = 0b0000_0010;
    }
}

impl DebugFlags {
    /// Parse debug flags from a comma-separated string. Unknown names are ignored.
    pub fn parse(s: &str) -> Self {
        let mut flags = DebugFlags::empty();
        for part in s.split(',') {
            match part.trim().to_lowercase().as_str() {
                "trace" => flags |= DebugFlags::TRACE,
                "errors" => flags |= DebugFlags::ERRORS,
                "all" => flags |= DebugFlags::all(),
                _ => {}
            }
        }
        flags
    }
}

static DEBUG_FLAGS: OnceLock<DebugFlags> = OnceLock::new();

/// Current debug flags; reads `WEFT_DEBUG` on first call.
pub fn debug_flags() -> DebugFlags {
    *DEBUG_FLAGS.get_or_init(|| {
        std::env::var("WEFT_DEBUG")
            .map(|s| DebugFlags::parse(&s))
            .unwrap_or_default()
    })
}

/// Fix the flags before anything reads them.
///
/// Returns `false` if the flags were already initialized (by an earlier call
/// or by a read), in which case nothing changes.
pub fn set_debug_flags(flags: DebugFlags) -> bool {
    DEBUG_FLAGS.set(flags).is_ok()
}

#[inline]
pub fn is_debug_enabled(flag: DebugFlags) -> bool {
    debug_flags().contains(flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        assert_eq!(DebugFlags::parse("trace"), DebugFlags::TRACE);
        assert_eq!(DebugFlags::parse(" Errors , trace"), DebugFlags::all());
        assert_eq!(DebugFlags::parse("all"), DebugFlags::all());
        assert_eq!(DebugFlags::parse("bogus"), DebugFlags::empty());
    }
}
