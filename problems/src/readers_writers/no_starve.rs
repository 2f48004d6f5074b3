//! No-starve readers/writers.
//!
//! A `turnstile` checkpoint sits in front of the room. Readers pass straight
//! through it, which costs nothing while it is free. A writer, however, keeps
//! it for its entire visit: from the moment it starts waiting, every later
//! reader queues at the turnstile behind it. The writer therefore only waits
//! for the readers that had already passed the checkpoint, not for readers
//! that keep arriving.

use super::ReadersWriters;
use sema::sync::{Lightswitch, Semaphore};

/// Readers/writers protocol bounding a writer's wait.
pub struct NoStarve {
    turnstile: Semaphore<()>,
    room_empty: Semaphore<()>,
    read_switch: Lightswitch,
}

impl NoStarve {
    /// Creates the protocol with an empty room.
    pub fn new() -> Self {
        Self {
            turnstile: Semaphore::new(1, ()),
            room_empty: Semaphore::new(1, ()),
            read_switch: Lightswitch::new(),
        }
    }
}

impl Default for NoStarve {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadersWriters for NoStarve {
    fn read<R>(&self, f: impl FnOnce() -> R) -> R {
        drop(self.turnstile.wait());
        let _inside = self.read_switch.lock(&self.room_empty);
        f()
    }

    fn write<R>(&self, f: impl FnOnce() -> R) -> R {
        let _turnstile = self.turnstile.wait();
        let _room = self.room_empty.wait();
        f()
    }
}
