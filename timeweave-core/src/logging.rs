use std::io::{self, IsTerminal};
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize logging with JSON formatting and environment-based filtering.
///
/// - Level filtering comes from `RUST_LOG` (defaults to "info")
/// - Event fields are flattened into the JSON object
/// - Logs go to stderr; stdout carries the rendered timeline
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .json()
        .flatten_event(true)
        .init();
}

pub fn default_output_mode() -> OutputMode {
    if io::stdout().is_terminal() {
        OutputMode::Pretty
    } else {
        OutputMode::Json
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Json,
    Pretty,
}
