//! Dining with parity-dependent fork order.

use super::{Forks, Table};

/// A table where even philosophers reach right first and odd philosophers
/// reach left first.
///
/// Neighbours of different parity compete for their shared fork first, so
/// no philosopher can hold one fork while waiting in a circle. With an odd
/// number of seats, philosophers `N` and `1` are both odd and simply take the
/// same order; the cycle is still broken at every even seat.
pub struct Asymmetric {
    forks: Forks,
}

impl Asymmetric {
    /// Lays the table for `seats` philosophers.
    ///
    /// # Panics
    ///
    /// Panics if `seats` is less than two.
    pub fn new(seats: usize) -> Self {
        assert!(seats >= 2, "a table needs at least two seats, got {seats}");
        Self {
            forks: Forks::new(seats),
        }
    }
}

impl Table for Asymmetric {
    fn seats(&self) -> usize {
        self.forks.len()
    }

    fn dine<R>(&self, philosopher: usize, eat: impl FnOnce() -> R) -> R {
        let (left, right) = (self.forks.left(philosopher), self.forks.right(philosopher));
        // Put down left, then right.
        if philosopher % 2 == 0 {
            let _right = right.wait();
            let _left = left.wait();
            eat()
        } else {
            let left = left.wait();
            let right = right.wait();
            let value = eat();
            drop(left);
            drop(right);
            value
        }
    }
}
