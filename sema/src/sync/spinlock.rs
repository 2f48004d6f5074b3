//! Busy-waiting spinlock.
//!
//! Acquiring the lock requires two steps to be executed ATOMICALLY: 1) observe
//! that the lock is free and 2) mark it as taken. Both happen in one
//! compare-and-swap on the `locked` flag.
//!
//! The lock is only used to protect tiny critical sections, such as the counter
//! and wait queue of a [`Semaphore`]. Threads that fail to acquire it back off
//! and eventually yield to the OS scheduler, so a descheduled lock holder does
//! not starve the spinners forever.
//!
//! [`Semaphore`]: crate::sync::Semaphore

use core::{
    cell::UnsafeCell,
    marker::PhantomData,
    ops::{Deref, DerefMut},
    panic::Location,
    sync::atomic::{AtomicBool, Ordering},
};
use crossbeam_utils::Backoff;

/// The lock could not be acquired at this time because the operation would
/// otherwise block.
#[derive(Debug, Eq, PartialEq)]
pub struct WouldBlock;

/// A mutual exclusion primitive useful for protecting shared data
///
/// This spinlock will spin threads waiting for the lock to become available.
/// The data can only be accessed through the guards returned from [`lock`] and
/// [`try_lock`], which guarantees that the data is only ever accessed when the
/// spinlock is locked.
///
/// Unlike [`std::sync::Mutex`], the guard does **not** release the lock when
/// dropped. It must be released explicitly with [`SpinLockGuard::unlock`].
///
/// [`lock`]: Self::lock
/// [`try_lock`]: Self::try_lock
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use sema::sync::SpinLock;
///
/// let data = Arc::new(SpinLock::new(0));
/// let handles: Vec<_> = (0..10)
///     .map(|_| {
///         let data = Arc::clone(&data);
///         std::thread::spawn(move || {
///             let mut guard = data.lock();
///             *guard += 1;
///             // the lock must be "explicitly" unlocked.
///             guard.unlock();
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// let guard = data.lock();
/// assert_eq!(*guard, 10);
/// guard.unlock();
/// ```
pub struct SpinLock<T: ?Sized> {
    locked: AtomicBool,
    data: UnsafeCell<T>,
}

unsafe impl<T: ?Sized + Send> Send for SpinLock<T> {}
unsafe impl<T: ?Sized + Send> Sync for SpinLock<T> {}

impl<T> SpinLock<T> {
    /// Creates a new spinlock in an unlocked state ready for use.
    #[inline]
    pub const fn new(t: T) -> SpinLock<T> {
        SpinLock {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(t),
        }
    }

    /// Consumes this spinlock, returning the underlying data.
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: ?Sized> SpinLock<T> {
    /// Acquires a spinlock, spinning until it is able to do so.
    ///
    /// Upon returning, the thread is the only thread with the lock held. When
    /// the returned guard goes out of scope without
    /// [`SpinLockGuard::unlock`], panic occurs.
    ///
    /// Locking a spinlock in the thread which already holds it never returns.
    #[track_caller]
    pub fn lock(&self) -> SpinLockGuard<'_, T> {
        let backoff = Backoff::new();
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            backoff.snooze();
        }
        SpinLockGuard::new(self)
    }

    /// Attempts to acquire this lock.
    ///
    /// This function does not spin.
    ///
    /// # Errors
    ///
    /// If the spinlock could not be acquired because it is already locked,
    /// then this call will return the [`WouldBlock`] error.
    #[track_caller]
    pub fn try_lock(&self) -> Result<SpinLockGuard<'_, T>, WouldBlock> {
        if self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            Ok(SpinLockGuard::new(self))
        } else {
            Err(WouldBlock)
        }
    }
}

impl<T: Default> Default for SpinLock<T> {
    /// Creates a `SpinLock<T>`, with the `Default` value for T.
    fn default() -> SpinLock<T> {
        SpinLock::new(Default::default())
    }
}

/// An implementation of a "scoped lock" of a spinlock. When this structure
/// is dropped (falls out of scope) without unlock, panic occurs.
///
/// The lock must be explicitly unlocked by [`unlock`] method.
///
/// This structure is created by the [`lock`] and [`try_lock`] methods on
/// [`SpinLock`].
///
/// [`lock`]: SpinLock::lock
/// [`try_lock`]: SpinLock::try_lock
/// [`unlock`]: Self::unlock
pub struct SpinLockGuard<'a, T: ?Sized + 'a> {
    caller: &'static Location<'static>,
    lock: &'a SpinLock<T>,
    // The guard must be released by the thread that acquired it.
    _not_send: PhantomData<*const ()>,
}

unsafe impl<T: ?Sized + Sync> Sync for SpinLockGuard<'_, T> {}

impl<'a, T: ?Sized> SpinLockGuard<'a, T> {
    #[track_caller]
    fn new(lock: &'a SpinLock<T>) -> Self {
        Self {
            caller: Location::caller(),
            lock,
            _not_send: PhantomData,
        }
    }

    /// Releases the underlying [`SpinLock`].
    ///
    /// As the guard does **not** automatically release the lock on drop,
    /// the caller must explicitly invoke [`unlock`] to mark the lock
    /// as available again.
    ///
    /// [`unlock`]: SpinLockGuard::unlock
    pub fn unlock(self) {
        self.lock.locked.store(false, Ordering::Release);
        core::mem::forget(self);
    }
}

impl<T: ?Sized> Deref for SpinLockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { &*self.lock.data.get() }
    }
}

impl<T: ?Sized> DerefMut for SpinLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T: ?Sized> Drop for SpinLockGuard<'_, T> {
    fn drop(&mut self) {
        // Unwinding through a critical section releases the lock instead of
        // turning the panic into an abort.
        self.lock.locked.store(false, Ordering::Release);
        if !std::thread::panicking() {
            panic!(
                "`.unlock()` must be explicitly called before dropping SpinLockGuard.
The lock is held at {:?}.",
                self.caller
            );
        }
    }
}
