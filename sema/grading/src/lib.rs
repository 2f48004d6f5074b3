//! Grading utilities.
//!
//! Tests are plain functions registered with a [`TestDriver`]. Each test runs
//! on its own thread; a test passes when it returns and fails when it panics.
//! Besides the driver, this crate provides the recorders tests use to observe
//! what concurrently running threads did:
//!
//! - [`Trace`]: a linearizable, append-only log of events.
//! - [`Gauge`]: a concurrency counter remembering its high-water mark.
//! - [`wait_until`]: backs off until a condition set by another thread holds.
extern crate grading_derive;

pub use grading_derive::*;

use crossbeam_queue::SegQueue;
use crossbeam_utils::Backoff;
use std::{
    collections::BTreeSet,
    sync::atomic::{AtomicUsize, Ordering},
    time::{Duration, Instant},
};

// Test utilities
#[doc(hidden)]
pub trait TestCase
where
    Self: Sync + Send,
{
    fn name(&'static self) -> &'static str;
    fn run(&'static self) -> bool;
}

impl<T> TestCase for T
where
    T: Fn() + Send + Sync + 'static,
{
    fn name(&'static self) -> &'static str {
        core::any::type_name::<T>()
    }
    fn run(&'static self) -> bool {
        print!("test {} ... ", self.name());
        let outcome = std::thread::Builder::new()
            .name(self.name().into())
            .spawn(self)
            .map(|handle| handle.join().is_ok());
        match outcome {
            Ok(true) => {
                println!("ok");
                true
            }
            Ok(false) => {
                println!("FAILED");
                false
            }
            Err(e) => {
                println!("FAILED (could not spawn: {e})");
                false
            }
        }
    }
}

/// A driver for running tests.
pub struct TestDriver {
    filter: BTreeSet<String>,
}

impl TestDriver {
    /// Creates a driver running only the tests named in `filter`, or every test
    /// if `filter` is empty.
    ///
    /// Names are given without the leading crate name, e.g.
    /// `sync::semaphore::sema_0`.
    pub fn new(filter: impl IntoIterator<Item = String>) -> Self {
        Self {
            filter: filter.into_iter().collect(),
        }
    }

    /// Run the given tests. Returns whether all of them passed.
    pub fn start(&self, tests: &[&'static dyn TestCase]) -> bool {
        let tests = tests
            .iter()
            .filter(|test| {
                if self.filter.is_empty() {
                    return true;
                }
                let name = test.name();
                let r = name.split("::").next().map(|n| n.len() + 2).unwrap_or(0);
                self.filter.contains(&name[r.min(name.len())..])
            })
            .collect::<Vec<_>>();
        let (total, mut succ) = (tests.len(), 0);
        println!(
            "Running {} test{}",
            total,
            if total == 1 { "" } else { "s" }
        );

        for test in tests {
            if test.run() {
                succ += 1;
            }
        }
        println!(
            "test result: {}. {} passed; {} failed",
            if total == succ { "ok" } else { "FAILED" },
            succ,
            total - succ
        );
        total == succ
    }
}

/// An append-only event log shared between threads.
///
/// Recording is a single push onto a lock-free queue, so the recorded order is
/// the order in which the pushes took effect.
pub struct Trace<E> {
    events: SegQueue<E>,
}

impl<E> Trace<E> {
    /// Creates an empty trace.
    pub fn new() -> Self {
        Self {
            events: SegQueue::new(),
        }
    }

    /// Appends an event.
    pub fn record(&self, event: E) {
        self.events.push(event)
    }

    /// Takes every event recorded so far, oldest first.
    pub fn take(&self) -> Vec<E> {
        core::iter::from_fn(|| self.events.pop()).collect()
    }
}

impl<E> Default for Trace<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts how many threads are currently inside a region and remembers the
/// maximum ever observed.
#[derive(Default)]
pub struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    /// Creates a gauge at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks one more thread inside. Returns the count including it.
    pub fn enter(&self) -> usize {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        now
    }

    /// Marks one thread leaving.
    pub fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    /// Threads inside right now.
    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    /// Highest count observed by [`enter`](Self::enter).
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Backs off until `cond` holds.
///
/// # Panics
///
/// Panics if `cond` still does not hold after ten seconds.
#[track_caller]
pub fn wait_until(mut cond: impl FnMut() -> bool) {
    let started = Instant::now();
    let backoff = Backoff::new();
    while !cond() {
        if backoff.is_completed() {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            backoff.snooze();
        }
        assert!(
            started.elapsed() < Duration::from_secs(10),
            "Grader: condition did not hold within 10 seconds"
        );
    }
}

/// Gives threads that were just released or spawned time to run into their
/// next blocking point.
pub fn settle() {
    std::thread::sleep(Duration::from_millis(50));
}
