//! # Scenarios.
//!
//! A scenario is one run of a coordination protocol: a fresh [`Stage`] owning
//! the protocol's semaphores, a set of actor threads sharing that stage by
//! reference, and the process-wide [`SerializedChannel`] every actor reports
//! to.
//!
//! Actors are spawned on scoped threads. The scope only ends after every actor
//! has joined, so the stage (and with it every semaphore and lightswitch of
//! the scenario) is dropped strictly after its last user.
//!
//! Each actor receives a [`Task`]: its 1-based identity, the number of cycles
//! to perform and a reference to the stage.

use crate::{
    config::{Config, Pacing},
    dining_philosophers::{self, Asymmetric, TableLimit},
    error::{Error, Result},
    readers_writers::{self, NoStarve, WriterPriority},
};
use core::{fmt, str::FromStr};
use crossbeam_utils::thread::Scope;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use sema::SerializedChannel;

/// The coordination problems, numbered as on the command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Problem {
    /// Readers/writers where writers cannot starve.
    NoStarveReadersWriters = 1,
    /// Readers/writers where waiting writers go before new readers.
    WriterPriorityReadersWriters = 2,
    /// Dining philosophers with at most `seats - 1` philosophers at the table.
    TableLimitPhilosophers = 3,
    /// Dining philosophers picking up forks in parity-dependent order.
    AsymmetricPhilosophers = 4,
}

impl Problem {
    /// Every problem, in command line order.
    pub const ALL: [Problem; 4] = [
        Problem::NoStarveReadersWriters,
        Problem::WriterPriorityReadersWriters,
        Problem::TableLimitPhilosophers,
        Problem::AsymmetricPhilosophers,
    ];

    /// The line announcing the scenario on the output channel.
    pub fn banner(self) -> &'static str {
        match self {
            Problem::NoStarveReadersWriters => "=== Problem 1: No-starve Readers–Writers ===",
            Problem::WriterPriorityReadersWriters => {
                "=== Problem 2: Writer-priority Readers–Writers ==="
            }
            Problem::TableLimitPhilosophers => "=== Problem 3: Dining Philosophers – Solution #1 ===",
            Problem::AsymmetricPhilosophers => "=== Problem 4: Dining Philosophers – Solution #2 ===",
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Problem {}", u8::from(*self))
    }
}

impl FromStr for Problem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidProblem(s.to_owned());
        let number: u8 = s.trim().parse().map_err(|_| invalid())?;
        Problem::try_from(number).map_err(|_| invalid())
    }
}

/// Kind of actor, as printed at the start of each output line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    /// Shares the room with other readers.
    Reader,
    /// Needs the room alone.
    Writer,
    /// Alternates between thinking and eating.
    Philosopher,
}

/// What an actor reports doing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
    /// A reader inside the room.
    Reading,
    /// A writer inside the room.
    Writing,
    /// A philosopher holding no fork.
    Thinking,
    /// A philosopher holding both forks.
    Eating,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Reader => "Reader",
            Role::Writer => "Writer",
            Role::Philosopher => "Philosopher",
        })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Reading => "Reading",
            Action::Writing => "Writing",
            Action::Thinking => "Thinking",
            Action::Eating => "Eating",
        })
    }
}

/// Formats one output line, e.g. `Philosopher 3: Eating.`.
pub fn line(role: Role, id: usize, action: Action) -> String {
    format!("{role} {id}: {action}.")
}

/// Enqueues `line`, logging a warning if the channel no longer accepts it.
pub(crate) fn emit(output: &SerializedChannel, line: impl Into<String>) {
    if let Err(e) = output.enqueue(line) {
        tracing::warn!(line = ?e.0, "output: {e}, line dropped");
    }
}

/// The shared context of one scenario run.
pub struct Stage<'a, P> {
    protocol: P,
    output: &'a SerializedChannel,
    pacing: Pacing,
    repetitions: usize,
}

impl<'a, P> Stage<'a, P> {
    /// Creates the stage for `protocol`.
    pub fn new(protocol: P, config: &Config, output: &'a SerializedChannel) -> Self {
        Self {
            protocol,
            output,
            pacing: config.pacing,
            repetitions: config.repetitions,
        }
    }

    /// The coordination protocol of this scenario.
    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    /// Pauses taken by the actors.
    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    /// The task parameters of actor `id`.
    pub fn task(&self, id: usize) -> Task<'_, P> {
        Task {
            id,
            repetitions: self.repetitions,
            stage: self,
        }
    }

    /// Reports `role` `id` doing `action` on the output channel.
    pub fn report(&self, role: Role, id: usize, action: Action) {
        emit(self.output, line(role, id, action));
    }
}

/// Parameters of one actor thread.
pub struct Task<'s, P> {
    /// 1-based identity of the actor within its role.
    pub id: usize,
    /// Number of cycles to perform.
    pub repetitions: usize,
    /// The scenario the actor belongs to.
    pub stage: &'s Stage<'s, P>,
}

impl<P> Clone for Task<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Task<'_, P> {}

/// Spawns `body` on a scoped thread called `name`.
pub(crate) fn spawn_actor<'env, F>(scope: &Scope<'env>, name: String, body: F) -> Result<()>
where
    F: FnOnce() + Send + 'env,
{
    match scope.builder().name(name.clone()).spawn(move |_| body()) {
        Ok(_) => Ok(()),
        Err(source) => Err(Error::Spawn { name, source }),
    }
}

/// Runs `problem` to completion.
///
/// Enqueues the problem's banner, spawns its actors and returns once every
/// actor has joined. Lines may still be queued on `output` when this returns.
///
/// # Errors
///
/// [`Error::InvalidConfig`] if `config` cannot run `problem`,
/// [`Error::Spawn`] if an actor thread cannot be created and
/// [`Error::ActorPanicked`] if an actor panicked.
pub fn run(problem: Problem, config: &Config, output: &SerializedChannel) -> Result<()> {
    match problem {
        Problem::NoStarveReadersWriters | Problem::WriterPriorityReadersWriters => {
            config.validate_readers_writers()?
        }
        Problem::TableLimitPhilosophers | Problem::AsymmetricPhilosophers => {
            config.validate_dining()?
        }
    }
    tracing::info!(%problem, "starting");
    emit(output, problem.banner());
    let outcome = match problem {
        Problem::NoStarveReadersWriters => readers_writers::run(NoStarve::new(), config, output),
        Problem::WriterPriorityReadersWriters => {
            readers_writers::run(WriterPriority::new(), config, output)
        }
        Problem::TableLimitPhilosophers => {
            dining_philosophers::run(TableLimit::new(config.philosophers), config, output)
        }
        Problem::AsymmetricPhilosophers => {
            dining_philosophers::run(Asymmetric::new(config.philosophers), config, output)
        }
    };
    outcome?;
    tracing::info!(%problem, "all actors joined");
    Ok(())
}
