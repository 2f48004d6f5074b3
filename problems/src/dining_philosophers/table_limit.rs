//! Dining with a limit on the number of seated philosophers.

use super::{Forks, Table};
use core::sync::atomic::{AtomicUsize, Ordering};
use sema::sync::{Semaphore, SemaphorePermits};

/// A table admitting at most `seats - 1` philosophers at once.
///
/// Every philosopher takes a seat, then the left fork, then the right fork.
/// On the way out the forks are put down in reverse order before the seat is
/// given up.
pub struct TableLimit {
    limit: Semaphore<()>,
    forks: Forks,
    seated: AtomicUsize,
}

/// A seat at a [`TableLimit`], given up on drop.
struct Seat<'a> {
    seated: &'a AtomicUsize,
    _permit: SemaphorePermits<'a, ()>,
}

impl Drop for Seat<'_> {
    fn drop(&mut self) {
        // Runs before `_permit` is released.
        self.seated.fetch_sub(1, Ordering::SeqCst);
    }
}

impl TableLimit {
    /// Lays the table for `seats` philosophers.
    ///
    /// # Panics
    ///
    /// Panics if `seats` is less than two.
    pub fn new(seats: usize) -> Self {
        assert!(seats >= 2, "a table needs at least two seats, got {seats}");
        Self {
            limit: Semaphore::new(seats - 1, ()),
            forks: Forks::new(seats),
            seated: AtomicUsize::new(0),
        }
    }

    /// Number of philosophers currently seated.
    pub fn seated(&self) -> usize {
        self.seated.load(Ordering::SeqCst)
    }

    fn sit_down(&self) -> Seat<'_> {
        let permit = self.limit.wait();
        self.seated.fetch_add(1, Ordering::SeqCst);
        Seat {
            seated: &self.seated,
            _permit: permit,
        }
    }
}

impl Table for TableLimit {
    fn seats(&self) -> usize {
        self.forks.len()
    }

    fn dine<R>(&self, philosopher: usize, eat: impl FnOnce() -> R) -> R {
        let (left, right) = (self.forks.left(philosopher), self.forks.right(philosopher));
        let _seat = self.sit_down();
        let _left = left.wait();
        let _right = right.wait();
        eat()
    }
}
