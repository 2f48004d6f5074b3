//! # Semaphore.
//!
//! A **semaphore** regulates concurrent access to a finite set of resources.
//! It maintains an internal count representing the number of available
//! "permits". Each permit grants a thread the right to access a shared
//! resource.
//!
//! Semaphores are the single building block of every protocol in this
//! workspace:
//!
//! - Initialized with **one** permit, a semaphore is a lock ("room empty",
//!   forks, turnstiles).
//! - Initialized with **N** permits, it bounds how many threads may be inside
//!   at once (the table limit of the dining philosophers).
//! - Initialized with **zero** permits, it is an event counter: each `signal`
//!   announces one event that exactly one `wait` will consume (the "item
//!   available" count of the serialized channel).
//!
//! ## `Semaphore` in this crate
//!
//! [`Semaphore`] is combined with a resource to protect, often just `()`.
//! Threads acquire a permit by calling [`Semaphore::wait`], and release it
//! either implicitly through the [`SemaphorePermits`] RAII guard or explicitly
//! via [`Semaphore::signal`] after giving up the guard with
//! [`SemaphorePermits::forget`].
//!
//! - [`Semaphore::wait()`]: Decrements the permit count. If the count became
//!   negative, the calling thread sleeps until a `signal()` hands it the
//!   permit.
//! - [`Semaphore::signal()`]: Increments the permit count and, if any thread is
//!   sleeping in `wait()`, wakes exactly one of them.
//!
//! The count going negative represents waiters: a count of `-k` means `k`
//! threads sleep in `wait()`, queued in arrival order. Decrementing and
//! enqueueing happen in one critical section, and every waiter sleeps on its
//! own parker, so a waiter never wakes up without having been handed a
//! permit.
//!
//! #### Usage Example
//!
//! ```rust
//! use sema::sync::Semaphore;
//!
//! let sema = Semaphore::new(3, ()); // Allows up to 3 concurrent threads.
//!
//! // Acquire a permit (blocks if unavailable)
//! let permit = sema.wait();
//!
//! // Critical section (up to 3 threads can enter concurrently)
//!
//! // Permit is automatically released when `permit` goes out of scope.
//! // Otherwise, you can explicitly release it with `drop(permit)`.
//! drop(permit);
//! ```

use super::spinlock::SpinLock;
use crossbeam_utils::sync::{Parker, Unparker};
use std::{collections::VecDeque, ops::Deref};

struct State {
    count: isize,
    waiters: VecDeque<Unparker>,
}

/// Counting semaphore.
///
/// A semaphore maintains a set of permits and a resource. Permits are used to
/// synchronize access to the resource. A semaphore differs from a mutex in
/// that it can allow more than one concurrent caller to access the shared
/// resource at a time.
pub struct Semaphore<T> {
    state: SpinLock<State>,
    resource: T,
}

impl<T> Semaphore<T> {
    /// Creates a new semaphore initialized with a specified number of permits.
    ///
    /// # Arguments
    ///
    /// * `permits` - The initial number of available permits.
    /// * `resource` - A resource combined with this semaphore.
    pub fn new(permits: usize, resource: T) -> Self {
        Self {
            state: SpinLock::new(State {
                count: isize::try_from(permits).unwrap_or(isize::MAX),
                waiters: VecDeque::new(),
            }),
            resource,
        }
    }

    /// Waits until a permit becomes available and then acquires it.
    ///
    /// If no permits are available, this function will block the current
    /// thread until another thread calls `signal()` to release a permit.
    ///
    /// This method returns a [`SemaphorePermits`] RAII guard. When the guard is
    /// dropped, it will automatically release the acquired permit.
    #[must_use = "dropping the permit signals the semaphore immediately"]
    pub fn wait(&self) -> SemaphorePermits<'_, T> {
        let mut state = self.state.lock();
        state.count -= 1;
        if state.count >= 0 {
            state.unlock();
        } else {
            let parker = Parker::new();
            state.waiters.push_back(parker.unparker().clone());
            state.unlock();
            // The permit is handed over by `signal`, which pops this waiter.
            parker.park();
        }
        SemaphorePermits { sema: self }
    }

    /// Releases a permit back to the semaphore.
    ///
    /// This method increases the number of available permits by one, and if
    /// any threads are blocked in `wait()`, one will be woken up to acquire the
    /// newly released permit.
    ///
    /// Normally, you don't call this directly except for signaling an event
    /// with a zero-initialized semaphore, or for releasing a permit whose guard
    /// was given up with [`SemaphorePermits::forget`].
    pub fn signal(&self) {
        let mut state = self.state.lock();
        state.count += 1;
        let waiter = if state.count <= 0 {
            state.waiters.pop_front()
        } else {
            None
        };
        state.unlock();
        if let Some(waiter) = waiter {
            waiter.unpark();
        }
    }
}

impl<T: Default> Default for Semaphore<T> {
    /// Creates a binary semaphore holding the `Default` value for T.
    fn default() -> Self {
        Self::new(1, T::default())
    }
}

/// An RAII implementation of a "scoped semaphore". When this structure
/// is dropped (falls out of scope), the semaphore will be signaled.
///
/// The data protected by the semaphore can be accessed through this guard via
/// its [`Deref`] implementations.
///
/// This structure is created by the [`wait`] method on [`Semaphore`].
///
/// [`wait`]: Semaphore::wait
pub struct SemaphorePermits<'a, T> {
    sema: &'a Semaphore<T>,
}

impl<T> SemaphorePermits<'_, T> {
    /// Gives up the guard while keeping the permit acquired.
    ///
    /// The permit must later be returned with [`Semaphore::signal`]. This is
    /// how an acquisition and its release are split across two calls, as a
    /// [`Lightswitch`] does.
    ///
    /// [`Lightswitch`]: crate::sync::Lightswitch
    pub fn forget(self) {
        core::mem::forget(self)
    }
}

impl<T> Deref for SemaphorePermits<'_, T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.sema.resource
    }
}

impl<T> Drop for SemaphorePermits<'_, T> {
    fn drop(&mut self) {
        self.sema.signal()
    }
}
