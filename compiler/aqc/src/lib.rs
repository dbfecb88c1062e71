//! ActionQuery runner.
//!
//! The library half of the `aqc` binary: a reference [`ReferenceHost`] with a
//! small procedure table, the JSON [`RunConfig`], and the command handlers.
//!
//! ```text
//! script ──► aq_compile::compile ──► Program ──► aq_vm::execute_scalar(ReferenceHost)
//!                 │                                        │
//!                 ▼                                        ▼
//!          render_compile_error                     result / fault / abort
//! ```

use std::sync::Once;

pub mod commands;
pub mod config;
pub mod host;
mod report;
pub mod value;

pub use config::{ConfigError, RunConfig};
pub use host::ReferenceHost;
pub use report::render_compile_error;
pub use value::AqValue;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=aq_vm=trace` or
/// `RUST_LOG=aq_compile=debug`; logs go to stderr.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
