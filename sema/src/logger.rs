//! Diagnostic logging.
//!
//! Diagnostics are [`tracing`] events. [`init`] installs a compact `fmt`
//! subscriber writing them to the standard error stream:
//!
//! ```text
//!  INFO problem=Problem 3: starting
//!  WARN channel: failed to emit a line error=Broken pipe (os error 32)
//! ```
//!
//! Diagnostics never share a stream with the actors' output, which goes
//! through a [`SerializedChannel`] to the standard output.
//!
//! [`SerializedChannel`]: crate::channel::SerializedChannel

use tracing::level_filters::LevelFilter;

/// Error returned when a global subscriber is already installed.
pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Installs the stderr subscriber with the given maximum level.
///
/// # Errors
///
/// Fails if another subscriber has already been installed in this process.
pub fn init(level: LevelFilter) -> Result<(), InitError> {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
}

/// Maps a verbosity count (`-v` flags) to a level, starting from `WARN`.
///
/// `quiet` wins over any verbosity and turns logging off.
pub fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
