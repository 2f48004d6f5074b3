//! Error types of the driver.

use std::io;
use thiserror::Error;

/// Errors that can end a run of the driver.
///
/// [`Error::Usage`] and [`Error::InvalidProblem`] together form the class of
/// invalid invocations. No error is recoverable: every one of them ends the
/// process with exit code 1.
#[derive(Debug, Error)]
pub enum Error {
    /// The problem number is missing.
    #[error("Usage: sync-problems <problem #>")]
    Usage,

    /// The argument does not name one of the problems.
    #[error("Invalid problem number.")]
    InvalidProblem(String),

    /// The configuration cannot run to completion.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// The operating system refused to create a thread.
    #[error("failed to spawn {name}: {source}")]
    Spawn {
        /// Name of the thread.
        name: String,
        /// Error returned by the operating system.
        source: io::Error,
    },

    /// An actor thread panicked.
    #[error("an actor thread panicked")]
    ActorPanicked,
}

impl Error {
    /// Whether this error is an invalid invocation rather than a failure at
    /// run time.
    pub fn is_invocation(&self) -> bool {
        matches!(self, Error::Usage | Error::InvalidProblem(_))
    }

    /// The process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Result type of the driver.
pub type Result<T, E = Error> = core::result::Result<T, E>;
