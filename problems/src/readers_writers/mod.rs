//! # Readers and Writers.
//!
//! Any number of readers may be inside a shared room at the same time, but a
//! writer needs the room alone. Both protocols in this module guarantee that
//! exclusion with a binary `room_empty` semaphore that readers share through a
//! [`Lightswitch`]. They differ in who goes first when both classes are
//! waiting:
//!
//! | Protocol           | Extra primitives                          | Guarantee                                                    |
//! |--------------------|-------------------------------------------|--------------------------------------------------------------|
//! | [`NoStarve`]       | `turnstile`                               | A waiting writer only waits for readers already admitted.    |
//! | [`WriterPriority`] | `read_try`, writer-side [`Lightswitch`]   | No new reader is admitted while any writer waits or writes.  |
//!
//! The writer-priority protocol trades reader starvation under a continuous
//! stream of writers for strict writer precedence.
//!
//! Both protocols implement [`ReadersWriters`]. The critical section is passed
//! in as a closure, and every semaphore acquired on the way in is released on
//! every way out, including a panicking critical section.
//!
//! [`Lightswitch`]: sema::Lightswitch

mod no_starve;
mod writer_priority;

pub use no_starve::NoStarve;
pub use writer_priority::WriterPriority;

use crate::{
    config::{Config, pause},
    error::{Error, Result},
    scenario::{Action, Role, Stage, Task, spawn_actor},
};
use crossbeam_utils::thread;
use sema::SerializedChannel;

/// A readers/writers coordination protocol.
pub trait ReadersWriters: Sync {
    /// Runs `f` as a reader, sharing the room with other readers only.
    fn read<R>(&self, f: impl FnOnce() -> R) -> R;

    /// Runs `f` as a writer, alone in the room.
    fn write<R>(&self, f: impl FnOnce() -> R) -> R;
}

/// Body of a reader thread.
pub fn reader<P: ReadersWriters>(task: Task<'_, P>) {
    let Task {
        id,
        repetitions,
        stage,
    } = task;
    for _ in 0..repetitions {
        stage.protocol().read(|| {
            stage.report(Role::Reader, id, Action::Reading);
            pause(stage.pacing().read);
        });
        pause(stage.pacing().after_read);
    }
    tracing::trace!(reader = id, "done");
}

/// Body of a writer thread.
pub fn writer<P: ReadersWriters>(task: Task<'_, P>) {
    let Task {
        id,
        repetitions,
        stage,
    } = task;
    for _ in 0..repetitions {
        stage.protocol().write(|| {
            stage.report(Role::Writer, id, Action::Writing);
            pause(stage.pacing().write);
        });
        pause(stage.pacing().after_write);
    }
    tracing::trace!(writer = id, "done");
}

/// Runs `config.readers` readers and `config.writers` writers against
/// `protocol` until all of them finished their cycles.
///
/// # Errors
///
/// [`Error::InvalidConfig`] for a configuration without actors or cycles,
/// [`Error::Spawn`] and [`Error::ActorPanicked`] for failing actor threads.
pub fn run<P: ReadersWriters>(
    protocol: P,
    config: &Config,
    output: &SerializedChannel,
) -> Result<()> {
    config.validate_readers_writers()?;
    let stage = Stage::new(protocol, config, output);
    let stage = &stage;
    tracing::debug!(
        readers = config.readers,
        writers = config.writers,
        cycles = config.repetitions,
        "readers/writers: spawning actors"
    );
    thread::scope(|s| -> Result<()> {
        for id in 1..=config.readers {
            spawn_actor(s, format!("reader-{id}"), move || reader(stage.task(id)))?;
        }
        for id in 1..=config.writers {
            spawn_actor(s, format!("writer-{id}"), move || writer(stage.task(id)))?;
        }
        Ok(())
    })
    .map_err(|_| Error::ActorPanicked)?
}
