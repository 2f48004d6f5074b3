//! # Lightswitch.
//!
//! A lightswitch lets a whole *class* of threads share one guard semaphore,
//! like the lights of a room: the first person in turns them on, the last one
//! out turns them off.
//!
//! - [`Lightswitch::lock`] increments the occupancy counter. The thread that
//!   moves it from 0 to 1 waits on the guard on behalf of its whole class,
//!   while still holding the lightswitch's own mutual exclusion. Later
//!   arrivals of the same class queue behind it and then pass with nothing but
//!   a counter update.
//! - [`Lightswitch::unlock`] decrements the counter. The thread that moves it
//!   from 1 to 0 signals the guard, handing the resource to the opposing
//!   class.
//!
//! The guard is therefore held iff the counter is positive. Combined with a
//! binary "room empty" semaphore this yields the classic many-readers or
//! one-writer gate.

use super::semaphore::Semaphore;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Shared occupancy toggle for a class of threads.
///
/// The counter lives inside a binary [`Semaphore`] that provides the mutual
/// exclusion over it; the atomic only makes the shared counter expressible.
pub struct Lightswitch {
    counter: Semaphore<AtomicUsize>,
}

impl Lightswitch {
    /// Creates a lightswitch with nobody inside.
    pub fn new() -> Self {
        Self {
            counter: Semaphore::new(1, AtomicUsize::new(0)),
        }
    }

    /// Enters the room guarded by `guard`.
    ///
    /// The first thread to enter waits on `guard`. The returned
    /// [`LightswitchGuard`] leaves the room when dropped.
    pub fn lock<'a, T>(&'a self, guard: &'a Semaphore<T>) -> LightswitchGuard<'a, T> {
        let counter = self.counter.wait();
        if counter.fetch_add(1, Ordering::Relaxed) == 0 {
            guard.wait().forget();
        }
        drop(counter);
        LightswitchGuard {
            switch: self,
            guard,
        }
    }

    /// Leaves the room guarded by `guard`.
    ///
    /// The last thread to leave signals `guard`. Usually called through
    /// dropping a [`LightswitchGuard`].
    ///
    /// # Panics
    ///
    /// Panics if nobody is inside.
    pub fn unlock<T>(&self, guard: &Semaphore<T>) {
        let counter = self.counter.wait();
        let inside = counter.load(Ordering::Relaxed);
        assert!(inside > 0, "Lightswitch::unlock without a matching lock");
        counter.store(inside - 1, Ordering::Relaxed);
        if inside == 1 {
            guard.signal();
        }
        drop(counter);
    }

    /// Number of threads currently inside.
    ///
    /// This is a snapshot for diagnostics and may be stale by the time it is
    /// returned.
    pub fn occupants(&self) -> usize {
        let counter = self.counter.wait();
        counter.load(Ordering::Relaxed)
    }
}

impl Default for Lightswitch {
    fn default() -> Self {
        Self::new()
    }
}

/// An RAII implementation of being inside a lightswitch-guarded room. When
/// this structure is dropped, the holder leaves via [`Lightswitch::unlock`].
///
/// This structure is created by [`Lightswitch::lock`].
#[must_use = "dropping the guard leaves the room immediately"]
pub struct LightswitchGuard<'a, T> {
    switch: &'a Lightswitch,
    guard: &'a Semaphore<T>,
}

impl<T> LightswitchGuard<'_, T> {
    /// Stays inside without the guard; leave later with
    /// [`Lightswitch::unlock`].
    pub fn forget(self) {
        core::mem::forget(self)
    }
}

impl<T> Drop for LightswitchGuard<'_, T> {
    fn drop(&mut self) {
        self.switch.unlock(self.guard)
    }
}
