//! # Sema: semaphore-based coordination primitives
//!
//! This crate is the foundation of the classical synchronization problems
//! solved in the `sync-problems` crate. Every protocol there is built from a
//! single primitive, the counting [`Semaphore`], plus a small number of helper
//! patterns composed on top of it.
//!
//! ## Crate Structure
//!
//! - [`sync`]: the primitives themselves.
//!   - [`SpinLock`]: a busy-waiting lock guarding the *internal* state of the
//!     other primitives. It is never held across a blocking call.
//!   - [`Semaphore`]: a counting semaphore with atomic decrement-and-block
//!     ([`Semaphore::wait`]) and increment-and-wake-one
//!     ([`Semaphore::signal`]).
//!   - [`Lightswitch`]: lets a whole class of threads share one guard
//!     semaphore. The first to arrive acquires it, the last to leave releases
//!     it.
//! - [`channel`]: the [`SerializedChannel`], a FIFO queue of text lines
//!   drained by a single [`Printer`] thread, so that output from many threads
//!   never interleaves.
//! - [`teletype`]: the sinks a [`Printer`] writes to.
//! - [`logger`]: installs the [`tracing`] subscriber printing diagnostics to the error
//!   stream.
//!
//! ## Threading Model
//!
//! All primitives are meant for preemptive OS threads sharing one address
//! space. A thread only ever sleeps inside [`Semaphore::wait`]; there are no
//! timeouts and no cancellation. A thread blocked in `wait` stays blocked
//! until a matching `signal` arrives.
//!
//! ```rust
//! use sema::sync::{Lightswitch, Semaphore};
//!
//! let room_empty = Semaphore::new(1, ());
//! let readers = Lightswitch::new();
//!
//! let first = readers.lock(&room_empty); // acquires `room_empty`
//! let second = readers.lock(&room_empty); // only bumps the counter
//! drop(first);
//! drop(second); // the last reader out releases `room_empty`
//! ```
//!
//! [`SpinLock`]: sync::SpinLock
//! [`Semaphore`]: sync::Semaphore
//! [`Semaphore::wait`]: sync::Semaphore::wait
//! [`Semaphore::signal`]: sync::Semaphore::signal
//! [`Lightswitch`]: sync::Lightswitch
//! [`SerializedChannel`]: channel::SerializedChannel
//! [`Printer`]: channel::Printer

#![deny(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod channel;
pub mod logger;
pub mod sync;
pub mod teletype;

pub use channel::{ChannelClosed, Printer, SerializedChannel};
pub use sync::{Lightswitch, Semaphore, SpinLock};
