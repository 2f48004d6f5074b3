//! # Synchronization Primitives.
//!
//! Threads that share memory must coordinate access to it. This module
//! provides the small set of primitives every coordination protocol in this
//! workspace is assembled from.
//!
//! | Primitive         | Blocks Thread? | Fair?      | Typical Use Case                                   |
//! |-------------------|----------------|------------|----------------------------------------------------|
//! | [`SpinLock`]      | No (busy wait) | No         | Very short critical sections inside the primitives |
//! | [`Semaphore`]     | Yes            | FIFO wake  | Bounded resources, events, binary exclusion        |
//! | [`Lightswitch`]   | Yes            | Per class  | Sharing one guard among a class of threads         |
//!
//! - **SpinLock** spins until the lock becomes available. It guards the
//!   counters and wait queues of the other primitives and is never held while
//!   a thread sleeps.
//! - **Semaphore** tracks a count of permits. When no permit remains, the
//!   calling thread sleeps until another thread signals.
//! - **Lightswitch** turns a binary "room occupied" semaphore into a
//!   many-readers gate: only the first thread of a class pays for the guard.
//!
//! Fairness between classes of threads (readers versus writers, neighbouring
//! philosophers) is never a property of these primitives. It is engineered by
//! the protocols that compose them.
//!
//! ## Building Order
//! 1. [`spinlock`]
//! 2. [`semaphore`]
//! 3. [`lightswitch`]

pub mod lightswitch;
pub mod semaphore;
pub mod spinlock;

pub use lightswitch::*;
pub use semaphore::*;
pub use spinlock::*;
