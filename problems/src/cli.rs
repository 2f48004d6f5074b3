//! Command line arguments of `sync-problems`.
//!
//! Defines the `Args` struct using clap derive. The problem number is kept as
//! raw text and parsed by [`Args::problem`], so that a missing or malformed
//! number ends up as one of the driver's own errors.

use crate::{
    config::{Config, Pacing},
    error::{Error, Result},
    scenario::{self, Problem},
};
use clap::{ArgAction, Parser};
use sema::{Printer, SerializedChannel, teletype::Teletype};
use std::sync::Arc;

/// Arguments of `sync-problems`.
#[derive(Parser, Debug, Clone)]
#[command(name = "sync-problems", version, about = "Classic semaphore coordination problems.")]
pub struct Args {
    /// Problem to run: 1 no-starve readers/writers, 2 writer-priority
    /// readers/writers, 3 dining philosophers with a table limit, 4 dining
    /// philosophers with asymmetric fork order.
    #[arg(value_name = "PROBLEM", allow_negative_numbers = true)]
    pub problem: Option<String>,

    /// Cycles each actor performs.
    #[arg(short = 'n', long, default_value_t = 5)]
    pub repetitions: usize,

    /// Number of readers in problems 1 and 2.
    #[arg(long, default_value_t = 5)]
    pub readers: usize,

    /// Number of writers in problems 1 and 2.
    #[arg(long, default_value_t = 5)]
    pub writers: usize,

    /// Number of philosophers (and seats) in problems 3 and 4.
    #[arg(long, default_value_t = 5)]
    pub philosophers: usize,

    /// Multiplier for every pause; 0 runs without pauses.
    #[arg(long, value_name = "FACTOR", default_value_t = 1.0)]
    pub pace: f64,

    /// Log more to stderr. Repeat for more detail.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log nothing to stderr.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// The selected problem.
    ///
    /// # Errors
    ///
    /// [`Error::Usage`] if no problem was given, [`Error::InvalidProblem`] if
    /// it is not one of 1 to 4.
    pub fn problem(&self) -> Result<Problem> {
        self.problem.as_deref().ok_or(Error::Usage)?.parse()
    }

    /// The scenario configuration.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] if `--pace` cannot scale the pauses.
    pub fn config(&self) -> Result<Config> {
        Ok(Config::default()
            .with_readers(self.readers)
            .with_writers(self.writers)
            .with_philosophers(self.philosophers)
            .with_repetitions(self.repetitions)
            .with_pacing(Pacing::default().scaled(self.pace)?))
    }
}

/// Exit code for a command line clap rejected, or answered itself as with
/// `--help` and `--version`.
pub fn clap_exit_code(e: &clap::Error) -> u8 {
    if e.use_stderr() { 1 } else { 0 }
}

/// Runs the problem selected by `args`, printing the actors' lines to `sink`.
///
/// Every line enqueued before a failure is still written. Returns the number
/// of lines written.
///
/// # Errors
///
/// Any [`Error`] of argument interpretation or of the scenario run.
pub fn execute<S>(args: &Args, sink: S) -> Result<usize>
where
    S: Teletype + 'static,
{
    let problem = args.problem()?;
    let config = args.config()?;
    tracing::debug!(%problem, ?config, "configured");

    let output = Arc::new(SerializedChannel::new());
    let printer = Printer::start(output.clone(), sink).map_err(|source| Error::Spawn {
        name: "printer".into(),
        source,
    })?;
    let outcome = scenario::run(problem, &config, &output);
    let lines = printer.finish().map_err(|_| Error::ActorPanicked)?;
    tracing::debug!(lines, "printer finished");
    outcome.map(|()| lines)
}
