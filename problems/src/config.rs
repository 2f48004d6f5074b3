//! Scenario configuration.
//!
//! The defaults reproduce the classroom setting: five readers and five
//! writers, or five philosophers around a five-seat table, each repeating
//! its cycle five times, with short pauses that make the interleaving easy to
//! follow on a console. Tests shrink the pauses to zero and change the counts
//! through the `with_*` builder methods.

use crate::error::{Error, Result};
use std::time::Duration;

/// Pauses taken by the actors.
///
/// The pauses only shape the interleaving; no protocol relies on them for
/// correctness.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pacing {
    /// Time a reader spends inside the room.
    pub read: Duration,
    /// Time a reader rests between two reads.
    pub after_read: Duration,
    /// Time a writer spends inside the room.
    pub write: Duration,
    /// Time a writer rests between two writes.
    pub after_write: Duration,
    /// Time a philosopher thinks before getting hungry.
    pub think: Duration,
    /// Time a philosopher spends eating.
    pub eat: Duration,
}

impl Pacing {
    /// No pauses at all.
    pub const NONE: Pacing = Pacing {
        read: Duration::ZERO,
        after_read: Duration::ZERO,
        write: Duration::ZERO,
        after_write: Duration::ZERO,
        think: Duration::ZERO,
        eat: Duration::ZERO,
    };

    /// Every pause multiplied by `factor`.
    ///
    /// A factor of zero or below yields [`Pacing::NONE`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] if `factor` is NaN, or so large that a pause
    /// no longer fits a [`Duration`].
    pub fn scaled(self, factor: f64) -> Result<Pacing> {
        if factor.is_nan() {
            return Err(Error::InvalidConfig("pace must be a number"));
        }
        if factor <= 0.0 {
            return Ok(Pacing::NONE);
        }
        let scale = |d: Duration| {
            Duration::try_from_secs_f64(d.as_secs_f64() * factor)
                .map_err(|_| Error::InvalidConfig("pace is too large"))
        };
        Ok(Pacing {
            read: scale(self.read)?,
            after_read: scale(self.after_read)?,
            write: scale(self.write)?,
            after_write: scale(self.after_write)?,
            think: scale(self.think)?,
            eat: scale(self.eat)?,
        })
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing {
            read: Duration::from_millis(100),
            after_read: Duration::from_millis(150),
            write: Duration::from_millis(150),
            after_write: Duration::from_millis(200),
            think: Duration::from_millis(120),
            eat: Duration::from_millis(120),
        }
    }
}

/// Sleeps for `duration`, unless it is zero.
pub(crate) fn pause(duration: Duration) {
    if !duration.is_zero() {
        std::thread::sleep(duration);
    }
}

/// Configuration of one scenario run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Number of reader threads.
    pub readers: usize,
    /// Number of writer threads.
    pub writers: usize,
    /// Number of philosophers, which is also the number of seats and forks.
    pub philosophers: usize,
    /// Cycles each actor performs before terminating.
    pub repetitions: usize,
    /// Pauses taken by the actors.
    pub pacing: Pacing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            readers: 5,
            writers: 5,
            philosophers: 5,
            repetitions: 5,
            pacing: Pacing::default(),
        }
    }
}

impl Config {
    /// Sets the number of readers.
    pub fn with_readers(mut self, readers: usize) -> Self {
        self.readers = readers;
        self
    }

    /// Sets the number of writers.
    pub fn with_writers(mut self, writers: usize) -> Self {
        self.writers = writers;
        self
    }

    /// Sets the number of philosophers.
    pub fn with_philosophers(mut self, philosophers: usize) -> Self {
        self.philosophers = philosophers;
        self
    }

    /// Sets the number of cycles per actor.
    pub fn with_repetitions(mut self, repetitions: usize) -> Self {
        self.repetitions = repetitions;
        self
    }

    /// Sets the pauses.
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Checks the settings shared by every scenario.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] if there are no repetitions.
    pub fn validate(&self) -> Result<()> {
        if self.repetitions == 0 {
            return Err(Error::InvalidConfig("repetitions must be at least 1"));
        }
        Ok(())
    }

    /// Checks the settings of the readers/writers scenarios.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] if there are no repetitions, or neither
    /// readers nor writers.
    pub fn validate_readers_writers(&self) -> Result<()> {
        self.validate()?;
        if self.readers == 0 && self.writers == 0 {
            return Err(Error::InvalidConfig("need at least one reader or writer"));
        }
        Ok(())
    }

    /// Checks the settings of the dining philosophers scenarios.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] if there are no repetitions or fewer than two
    /// philosophers. A lone philosopher would need the same fork twice, and a
    /// table limit of zero admits nobody.
    pub fn validate_dining(&self) -> Result<()> {
        self.validate()?;
        if self.philosophers < 2 {
            return Err(Error::InvalidConfig("need at least two philosophers"));
        }
        Ok(())
    }
}
