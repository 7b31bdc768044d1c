//! revu-execution: workers and process wiring.
//!
//! Hosts the worker pool that drains the dispatch queue, the runtime
//! context that assembles the engine at process start, and tracing
//! setup.

mod context;
mod worker;

pub use context::RuntimeContext;
pub use worker::WorkerPool;

use tracing_subscriber::EnvFilter;

/// Initializes the process-wide tracing subscriber.
///
/// Filter via `RUST_LOG` (defaults to `info`). Call once at startup;
/// calling again is a no-op rather than a panic, so tests can share it.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
