//! Writer-priority readers/writers.
//!
//! Readers must hold `read_try` while entering the room. Writers share
//! `read_try` through their own lightswitch: the first writer to arrive takes
//! it and the last writer to leave gives it back. As long as any writer is
//! waiting or writing, no new reader can even start entering.

use super::ReadersWriters;
use sema::sync::{Lightswitch, Semaphore};

/// Readers/writers protocol giving writers precedence over later readers.
pub struct WriterPriority {
    room_empty: Semaphore<()>,
    read_try: Semaphore<()>,
    read_switch: Lightswitch,
    write_switch: Lightswitch,
}

impl WriterPriority {
    /// Creates the protocol with an empty room.
    pub fn new() -> Self {
        Self {
            room_empty: Semaphore::new(1, ()),
            read_try: Semaphore::new(1, ()),
            read_switch: Lightswitch::new(),
            write_switch: Lightswitch::new(),
        }
    }
}

impl Default for WriterPriority {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadersWriters for WriterPriority {
    fn read<R>(&self, f: impl FnOnce() -> R) -> R {
        let read_try = self.read_try.wait();
        let _inside = self.read_switch.lock(&self.room_empty);
        drop(read_try);
        f()
    }

    fn write<R>(&self, f: impl FnOnce() -> R) -> R {
        let _writers = self.write_switch.lock(&self.read_try);
        let _room = self.room_empty.wait();
        f()
    }
}
