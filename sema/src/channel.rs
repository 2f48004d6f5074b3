//! # Serialized output channel.
//!
//! Many threads printing directly to the console may interleave their output
//! in the middle of a line. The [`SerializedChannel`] avoids this: producers
//! only append whole lines to a queue, and a single drain thread, the
//! [`Printer`], emits them one at a time.
//!
//! The channel is a FIFO queue guarded by a [`SpinLock`] plus an "item
//! available" [`Semaphore`] counting the lines (and the close request) that the
//! drain thread has not consumed yet:
//!
//! - [`SerializedChannel::enqueue`] appends under the lock, then signals. It
//!   never blocks for longer than the queue's critical section.
//! - [`SerializedChannel::drain`] waits for an item, pops the oldest line
//!   under the lock and emits it *outside* the lock.
//! - [`SerializedChannel::close`] marks the channel closed and signals once
//!   more. The drain loop finishes every line queued before the close, then
//!   returns.
//!
//! Lines from one producer are emitted in the order that producer enqueued
//! them. Lines of independent producers are emitted in the order their
//! enqueue calls took the lock.
//!
//! ```rust
//! use std::sync::Arc;
//! use sema::{Printer, SerializedChannel, teletype::Transcript};
//!
//! let channel = Arc::new(SerializedChannel::new());
//! let transcript = Transcript::new();
//! let printer = Printer::start(channel.clone(), transcript.clone()).unwrap();
//!
//! channel.enqueue("Philosopher 1: Thinking.").unwrap();
//! channel.enqueue("Philosopher 1: Eating.").unwrap();
//!
//! assert_eq!(printer.finish().unwrap(), 2);
//! assert_eq!(transcript.lines().len(), 2);
//! ```

use crate::{
    sync::{Semaphore, SpinLock},
    teletype::Teletype,
};
use std::{
    collections::VecDeque,
    io,
    sync::Arc,
    thread::{self, JoinHandle},
};

/// The channel has been closed; the rejected message is handed back.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("serialized channel is closed")]
pub struct ChannelClosed(pub String);

struct Queue {
    messages: VecDeque<String>,
    closed: bool,
}

/// A FIFO queue of text lines drained by a single thread.
pub struct SerializedChannel {
    queue: SpinLock<Queue>,
    available: Semaphore<()>,
}

impl SerializedChannel {
    /// Creates an open, empty channel.
    pub fn new() -> Self {
        Self {
            queue: SpinLock::new(Queue {
                messages: VecDeque::new(),
                closed: false,
            }),
            available: Semaphore::new(0, ()),
        }
    }

    /// Appends one line to the channel.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelClosed`] carrying the message if [`close`] has already
    /// been called; such a line would never be drained.
    ///
    /// [`close`]: Self::close
    pub fn enqueue(&self, message: impl Into<String>) -> Result<(), ChannelClosed> {
        let message = message.into();
        let mut queue = self.queue.lock();
        if queue.closed {
            queue.unlock();
            return Err(ChannelClosed(message));
        }
        queue.messages.push_back(message);
        queue.unlock();
        self.available.signal();
        Ok(())
    }

    /// Closes the channel.
    ///
    /// Lines already queued are still drained. Closing twice has no further
    /// effect.
    pub fn close(&self) {
        let mut queue = self.queue.lock();
        let newly_closed = !queue.closed;
        queue.closed = true;
        queue.unlock();
        if newly_closed {
            self.available.signal();
        }
    }

    /// Returns whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        let queue = self.queue.lock();
        let closed = queue.closed;
        queue.unlock();
        closed
    }

    /// Runs the drain loop, writing every line to `sink`.
    ///
    /// Blocks until the channel is closed and every line enqueued before the
    /// close has been written. Returns the number of lines written. A failing
    /// sink is reported through the logger and the loop keeps draining, so
    /// producers are never held up by a broken output device.
    ///
    /// Only one thread may drain a channel.
    pub fn drain(&self, sink: &mut impl Teletype) -> usize {
        let mut emitted = 0;
        loop {
            self.available.wait().forget();
            let mut queue = self.queue.lock();
            match queue.messages.pop_front() {
                Some(message) => {
                    queue.unlock();
                    if let Err(e) = sink.write_line(&message) {
                        tracing::warn!(error = %e, "channel: failed to emit a line");
                    }
                    emitted += 1;
                }
                None => {
                    let closed = queue.closed;
                    queue.unlock();
                    if closed {
                        break;
                    }
                }
            }
        }
        tracing::debug!(emitted, "channel: drained");
        emitted
    }
}

impl Default for SerializedChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to the dedicated drain thread of a [`SerializedChannel`].
pub struct Printer {
    channel: Arc<SerializedChannel>,
    handle: JoinHandle<usize>,
}

impl Printer {
    /// Spawns the drain thread for `channel`, writing to `sink`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error of the operating system if the thread could not be
    /// spawned.
    pub fn start<S>(channel: Arc<SerializedChannel>, mut sink: S) -> io::Result<Self>
    where
        S: Teletype + 'static,
    {
        let handle = {
            let channel = channel.clone();
            thread::Builder::new()
                .name("printer".into())
                .spawn(move || channel.drain(&mut sink))?
        };
        Ok(Self { channel, handle })
    }

    /// The channel this printer drains.
    pub fn channel(&self) -> &Arc<SerializedChannel> {
        &self.channel
    }

    /// Closes the channel and waits until every queued line is emitted.
    ///
    /// Call this only after every producer has finished; lines enqueued later
    /// are rejected. Returns the number of lines emitted, or the panic
    /// payload if the drain thread panicked.
    pub fn finish(self) -> thread::Result<usize> {
        self.channel.close();
        self.handle.join()
    }
}
