//! The `weft` command line.
//!
//! A calculator built from the combinators, plus commands to inspect its
//! tokens and to evaluate files of expressions in parallel.

use std::sync::Once;

pub mod calc;
pub mod commands;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `WEFT_LOG=debug`, or with
/// `RUST_LOG` when `WEFT_LOG` is unset; parser traces log under
/// `weft_core=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        let filter = match std::env::var("WEFT_LOG") {
            Ok(directives) => EnvFilter::new(directives),
            Err(_) if std::env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
            Err(_) => return,
        };
        tracing_subscriber::registry()
            .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
            .with(filter)
            .init();
    });
}
