//! Logging infrastructure
//!
//! - [`init_tracing`]: installs the `tracing` subscriber for diagnostics
//! - [`JsonlConversationLogger`]: JSONL file writer implementing the
//!   [`ConversationLogger`](colloquy_application::ConversationLogger) port

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;

use tracing_subscriber::EnvFilter;

/// Filter directive for a verbosity level (0 = warn, 1 = info, 2 = debug, 3+ = trace).
pub fn filter_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise the filter follows `verbosity`.
/// Calling this more than once is harmless: later calls are ignored.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_for_verbosity(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
