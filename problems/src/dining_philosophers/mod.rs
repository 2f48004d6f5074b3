//! # Dining Philosophers.
//!
//! `N` philosophers sit around a round table with one fork between each pair
//! of neighbours. Philosopher `i` (1-based) has fork `i - 1` on the left and
//! fork `i % N` on the right, and needs both to eat. Every fork is a binary
//! [`Semaphore`].
//!
//! Taking the forks naively, left first for everyone, deadlocks as soon as all
//! philosophers hold their left fork. The two tables in this module break the
//! circular wait in different ways:
//!
//! - [`TableLimit`] lets at most `N - 1` philosophers sit down at once. With
//!   one seat empty, some seated philosopher always gets both forks.
//! - [`Asymmetric`] makes even and odd philosophers reach for the forks in
//!   opposite orders, so the wait-for graph cannot close into a cycle.
//!
//! Both implement [`Table`].

mod asymmetric;
mod table_limit;

pub use asymmetric::Asymmetric;
pub use table_limit::TableLimit;

use crate::{
    config::{Config, pause},
    error::{Error, Result},
    scenario::{Action, Role, Stage, Task, spawn_actor},
};
use crossbeam_utils::thread;
use sema::{SerializedChannel, sync::Semaphore};

/// A dining protocol.
pub trait Table: Sync {
    /// Number of seats, philosophers and forks.
    fn seats(&self) -> usize;

    /// Lets `philosopher` run `eat` while holding both of its forks.
    ///
    /// # Panics
    ///
    /// Panics if `philosopher` is not in `1..=self.seats()`.
    fn dine<R>(&self, philosopher: usize, eat: impl FnOnce() -> R) -> R;
}

/// The forks of a table, one binary semaphore each.
pub struct Forks {
    forks: Vec<Semaphore<()>>,
}

impl Forks {
    /// Lays out `n` free forks.
    pub fn new(n: usize) -> Self {
        Self {
            forks: (0..n).map(|_| Semaphore::new(1, ())).collect(),
        }
    }

    /// Number of forks.
    pub fn len(&self) -> usize {
        self.forks.len()
    }

    /// Whether the table has no forks at all.
    pub fn is_empty(&self) -> bool {
        self.forks.is_empty()
    }

    /// The fork on the left of `philosopher`.
    #[track_caller]
    pub fn left(&self, philosopher: usize) -> &Semaphore<()> {
        self.check(philosopher);
        &self.forks[philosopher - 1]
    }

    /// The fork on the right of `philosopher`.
    #[track_caller]
    pub fn right(&self, philosopher: usize) -> &Semaphore<()> {
        self.check(philosopher);
        &self.forks[philosopher % self.forks.len()]
    }

    #[track_caller]
    fn check(&self, philosopher: usize) {
        assert!(
            (1..=self.forks.len()).contains(&philosopher),
            "no philosopher {philosopher} at a table of {}",
            self.forks.len()
        );
    }
}

/// Body of a philosopher thread.
pub fn philosopher<T: Table>(task: Task<'_, T>) {
    let Task {
        id,
        repetitions,
        stage,
    } = task;
    for _ in 0..repetitions {
        stage.report(Role::Philosopher, id, Action::Thinking);
        pause(stage.pacing().think);
        stage.protocol().dine(id, || {
            stage.report(Role::Philosopher, id, Action::Eating);
            pause(stage.pacing().eat);
        });
    }
    tracing::trace!(philosopher = id, "done");
}

/// Seats one philosopher per seat of `table` and runs them until all of them
/// finished their meals.
///
/// The number of philosophers is the table's, not `config.philosophers`;
/// only the cycles and pauses are taken from `config`.
///
/// # Errors
///
/// [`Error::InvalidConfig`] for a table of fewer than two seats or no cycles,
/// [`Error::Spawn`] and [`Error::ActorPanicked`] for failing actor threads.
pub fn run<T: Table>(table: T, config: &Config, output: &SerializedChannel) -> Result<()> {
    config.validate()?;
    let seats = table.seats();
    if seats < 2 {
        return Err(Error::InvalidConfig("need at least two philosophers"));
    }
    if seats != config.philosophers {
        tracing::debug!(seats, configured = config.philosophers, "table size overrides config");
    }
    let stage = Stage::new(table, config, output);
    let stage = &stage;
    tracing::debug!(seats, meals = config.repetitions, "dining philosophers: spawning actors");
    thread::scope(|s| -> Result<()> {
        for id in 1..=seats {
            spawn_actor(s, format!("philosopher-{id}"), move || {
                philosopher(stage.task(id))
            })?;
        }
        Ok(())
    })
    .map_err(|_| Error::ActorPanicked)?
}

