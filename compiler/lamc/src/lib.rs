//! Lam driver library.
//!
//! The `lam` binary is a thin argument parser over [`commands`]; everything it
//! does is reachable from here so it can be tested without spawning processes.

pub mod commands;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber, once per process.
///
/// Does nothing unless `RUST_LOG` is set. Output is an indented tree on
/// stderr, one level per span.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(EnvFilter::from_default_env())
                .with(
                    HierarchicalLayer::new(2)
                        .with_writer(std::io::stderr)
                        .with_targets(true),
                )
                .init();
        }
    });
}
