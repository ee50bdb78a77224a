//! Logging utilities for the Nutrify application.
//!
//! Every crate logs through the `tracing` macros; the binary calls [`init`]
//! once at startup to install the subscriber.

use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO level.
///
/// `RUST_LOG` directives are honoured on top of the default `nutrify=info`.
///
/// # Examples
///
/// ```
/// use nutrify_common::logging;
///
/// // Initialize with default log level (INFO)
/// logging::init();
///
/// // Calling again is harmless; the first subscriber stays installed
/// logging::init_with_level(tracing::Level::DEBUG);
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// # Arguments
///
/// * `level` - The minimum log level for the `nutrify*` targets.
pub fn init_with_level(level: Level) {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("nutrify={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    // try_init: a global subscriber may already be set (tests, embedding)
    let result = tracing_subscriber::registry()
        .with(fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true))
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Log an error with context at the ERROR level.
///
/// # Arguments
///
/// * `error` - The error to log.
/// * `context` - Additional context information about the error.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}
