//! A teletype (TTY) interface for line-based output.
//!
//! This module provides a trait [`Teletype`] that defines where the lines
//! drained from a [`SerializedChannel`] end up. [`Console`] writes them to the
//! standard output; [`Transcript`] keeps them in memory so that tests can
//! inspect exactly what was emitted and in which order.
//!
//! [`SerializedChannel`]: crate::channel::SerializedChannel

use crate::sync::SpinLock;
use std::{
    io::{self, Write},
    sync::Arc,
};

/// The `Teletype` trait represents a line-oriented output device.
///
/// A teletype is owned by exactly one drain thread, so implementations do not
/// need to guard against concurrent writers.
pub trait Teletype: Send {
    /// Writes one line to the teletype.
    ///
    /// # Arguments
    /// - `line`: The text of the line, without a trailing newline.
    ///
    /// # Returns
    /// - `Ok(())`: The line was written.
    /// - `Err(io::Error)`: If the underlying device failed.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// The process's standard output.
pub struct Console {
    out: io::Stdout,
}

impl Console {
    /// Creates a teletype writing to the standard output.
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Teletype for Console {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut out = self.out.lock();
        writeln!(out, "{line}")?;
        out.flush()
    }
}

/// An in-memory teletype recording every line.
///
/// Clones share the same recording, so one clone can be handed to a drain
/// thread while another is kept to read the result.
///
/// ```
/// use sema::teletype::{Teletype, Transcript};
///
/// let transcript = Transcript::new();
/// let mut tty = transcript.clone();
/// tty.write_line("Reader 1: Reading.").unwrap();
/// assert_eq!(transcript.lines(), vec!["Reader 1: Reading.".to_string()]);
/// ```
#[derive(Clone, Default)]
pub struct Transcript {
    lines: Arc<SpinLock<Vec<String>>>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every line recorded so far.
    pub fn lines(&self) -> Vec<String> {
        let guard = self.lines.lock();
        let lines = guard.clone();
        guard.unlock();
        lines
    }
}

impl Teletype for Transcript {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut guard = self.lines.lock();
        guard.push(line.to_owned());
        guard.unlock();
        Ok(())
    }
}
