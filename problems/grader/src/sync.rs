pub mod spinlock {
    use grading::Trace;
    use sema::sync::{SpinLock, WouldBlock};
    use std::{sync::Arc, thread};

    pub fn smoke() {
        const LENGTH: usize = 64;
        let output = Arc::new(SpinLock::new(Vec::new()));

        let handles = (0..LENGTH)
            .map(|i| {
                let output = output.clone();
                thread::spawn(move || {
                    let mut d = output.lock();
                    d.push(i);
                    d.unlock();
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut output = output.lock();
        output.sort();
        assert_eq!(&*output, &(0..LENGTH).collect::<Vec<_>>());
        output.unlock();
    }

    pub fn try_lock() {
        let lock = SpinLock::new(0);
        let guard = lock.lock();
        assert!(matches!(lock.try_lock(), Err(WouldBlock)));
        guard.unlock();

        let mut guard = lock.try_lock().expect("lock is free");
        *guard += 1;
        guard.unlock();
        assert_eq!(lock.into_inner(), 1);
    }

    pub fn forgotten_unlock() {
        let lock = Arc::new(SpinLock::new(()));
        let trace = Arc::new(Trace::new());
        let result = {
            let (lock, trace) = (lock.clone(), trace.clone());
            thread::spawn(move || {
                let guard = lock.lock();
                trace.record("locked");
                drop(guard);
            })
            .join()
        };
        assert!(result.is_err(), "Dropping a held guard must panic");
        assert_eq!(trace.take(), ["locked"]);
        // The lock itself is released before the panic.
        lock.try_lock().expect("lock is free").unlock();
    }
}

pub mod semaphore {
    use grading::{settle, wait_until};
    use sema::sync::{Semaphore, SpinLock};
    use std::{
        sync::{
            Arc,
            atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering},
        },
        thread,
    };

    pub fn sema_0() {
        let sema = Arc::new(Semaphore::new(0, ()));
        let is_thread_active = Arc::new(AtomicBool::new(false));
        let is_woken_up = Arc::new(AtomicBool::new(false));

        let thread = {
            let (sema, is_thread_active, is_woken_up) =
                (sema.clone(), is_thread_active.clone(), is_woken_up.clone());

            thread::Builder::new()
                .name("worker".into())
                .spawn(move || {
                    is_thread_active.store(true, Ordering::SeqCst);
                    sema.wait().forget();
                    is_woken_up.store(true, Ordering::SeqCst);
                })
                .unwrap()
        };

        wait_until(|| is_thread_active.load(Ordering::SeqCst));
        settle();
        assert!(!is_woken_up.load(Ordering::SeqCst));

        sema.signal();
        thread.join().unwrap();

        assert!(is_woken_up.load(Ordering::SeqCst));
    }

    fn wake_in_steps(permits: u32, step: u32) {
        const COUNT: u32 = 16;
        let sema = Arc::new(Semaphore::new(permits as usize, ()));
        let ready_counter = Arc::new(AtomicU32::new(0));
        let counter = Arc::new(AtomicU32::new(0));

        let handles = (0..COUNT)
            .map(|i| {
                let (sema, ready_counter, counter) =
                    (sema.clone(), ready_counter.clone(), counter.clone());
                thread::Builder::new()
                    .name(format!("t{i}"))
                    .spawn(move || {
                        ready_counter.fetch_add(1, Ordering::SeqCst);
                        let sema_permit = sema.wait();
                        counter.fetch_add(1, Ordering::SeqCst);
                        sema_permit.forget();
                    })
                    .unwrap()
            })
            .collect::<Vec<_>>();

        wait_until(|| ready_counter.load(Ordering::SeqCst) == COUNT);

        let mut expected_cnt = permits;
        wait_until(|| counter.load(Ordering::SeqCst) == expected_cnt);
        settle();
        assert_eq!(counter.load(Ordering::SeqCst), expected_cnt);

        while expected_cnt < COUNT {
            expected_cnt += step;
            for _ in 0..step {
                sema.signal();
            }
            wait_until(|| counter.load(Ordering::SeqCst) >= expected_cnt);
            settle();
            assert_eq!(counter.load(Ordering::SeqCst), expected_cnt);
        }

        for handle in handles {
            handle.join().unwrap();
        }
    }

    pub fn sema_1() {
        wake_in_steps(1, 1)
    }

    pub fn sema_2() {
        wake_in_steps(2, 2)
    }

    pub fn exec_order() {
        const COUNT: usize = 3;

        let counter = Arc::new(AtomicUsize::new(0));
        let counter2 = Arc::new(AtomicUsize::new(0));
        let sema = Arc::new(Semaphore::new(0, 0));

        let handles = (0..COUNT)
            .map(|i| {
                let (counter, counter2, sema) = (counter.clone(), counter2.clone(), sema.clone());
                thread::Builder::new()
                    .name(format!("support_{i}"))
                    .spawn(move || {
                        counter2.fetch_add(1, Ordering::SeqCst);
                        let _guard = sema.wait();
                        counter.fetch_add(1, Ordering::SeqCst);
                    })
                    .unwrap()
            })
            .collect::<Vec<_>>();

        wait_until(|| counter2.load(Ordering::SeqCst) == COUNT);
        settle();
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        // Every permit dropped by a woken thread wakes the next one.
        sema.signal();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(counter.load(Ordering::SeqCst), COUNT);
    }

    pub fn n_permits() {
        const COUNT: usize = 5;
        const PERMITS: usize = 3;

        let counter = Arc::new(AtomicUsize::new(0));
        let counter2 = Arc::new(AtomicUsize::new(0));
        let sema = Arc::new(Semaphore::new(PERMITS, 0));
        let lock = Arc::new(SpinLock::new(0));

        let guard = lock.lock();

        let handles = (0..COUNT)
            .map(|i| {
                let (counter, counter2, sema, lock) =
                    (counter.clone(), counter2.clone(), sema.clone(), lock.clone());
                thread::Builder::new()
                    .name(format!("support_{i}"))
                    .spawn(move || {
                        counter2.fetch_add(1, Ordering::SeqCst);
                        let _guard = sema.wait();
                        counter.fetch_add(1, Ordering::SeqCst);
                        let _lock = lock.lock();
                        _lock.unlock();
                    })
                    .unwrap()
            })
            .collect::<Vec<_>>();

        wait_until(|| counter2.load(Ordering::SeqCst) == COUNT);
        wait_until(|| counter.load(Ordering::SeqCst) == PERMITS);
        settle();
        assert_eq!(counter.load(Ordering::SeqCst), PERMITS);
        guard.unlock();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(counter.load(Ordering::SeqCst), COUNT);
    }

    pub fn wake_order() {
        const COUNT: usize = 6;
        let sema = Arc::new(Semaphore::new(0, ()));
        let woken = Arc::new(grading::Trace::new());

        let mut handles = Vec::new();
        for i in 0..COUNT {
            let (sema, woken) = (sema.clone(), woken.clone());
            handles.push(
                thread::Builder::new()
                    .name(format!("waiter_{i}"))
                    .spawn(move || {
                        sema.wait().forget();
                        woken.record(i);
                    })
                    .unwrap(),
            );
            // Let waiter `i` block before the next one arrives.
            settle();
        }

        let mut order = Vec::new();
        for n in 1..=COUNT {
            sema.signal();
            wait_until(|| {
                order.extend(woken.take());
                order.len() == n
            });
        }
        assert_eq!(order, (0..COUNT).collect::<Vec<_>>());

        for handle in handles {
            handle.join().unwrap();
        }
    }

    pub fn resource() {
        let sema = Semaphore::new(2, String::from("room"));
        let a = sema.wait();
        let b = sema.wait();
        assert_eq!(a.as_str(), "room");
        assert_eq!(&*b, "room");
        drop(a);
        drop(b);
        let c = Semaphore::<()>::default();
        c.wait().forget();
        c.signal();
        drop(c.wait());
    }
}

pub mod lightswitch {
    use grading::{Trace, settle, wait_until};
    use sema::sync::{Lightswitch, Semaphore};
    use std::{
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        thread,
    };

    fn acquirer(
        guard: &Arc<Semaphore<()>>,
        acquired: &Arc<AtomicBool>,
    ) -> thread::JoinHandle<()> {
        let (guard, acquired) = (guard.clone(), acquired.clone());
        thread::spawn(move || {
            let _permit = guard.wait();
            acquired.store(true, Ordering::SeqCst);
        })
    }

    pub fn first_in_last_out() {
        let guard = Arc::new(Semaphore::new(1, ()));
        let switch = Lightswitch::new();
        let acquired = Arc::new(AtomicBool::new(false));

        let first = switch.lock(&*guard);
        let second = switch.lock(&*guard);
        assert_eq!(switch.occupants(), 2);

        let handle = acquirer(&guard, &acquired);
        settle();
        assert!(!acquired.load(Ordering::SeqCst));

        drop(first);
        settle();
        assert_eq!(switch.occupants(), 1);
        assert!(
            !acquired.load(Ordering::SeqCst),
            "The guard must stay held while anyone is inside"
        );

        drop(second);
        handle.join().unwrap();
        assert!(acquired.load(Ordering::SeqCst));
        assert_eq!(switch.occupants(), 0);
    }

    pub fn class_waits_behind_first() {
        let room = Arc::new(Semaphore::new(1, ()));
        let switch = Arc::new(Lightswitch::new());
        let inside = Arc::new(Trace::new());

        let writer = room.wait();
        let readers = (1..=2)
            .map(|id| {
                let (room, switch, inside) = (room.clone(), switch.clone(), inside.clone());
                let handle = thread::spawn(move || {
                    let _in = switch.lock(&*room);
                    inside.record(id);
                });
                settle();
                handle
            })
            .collect::<Vec<_>>();

        assert!(inside.take().is_empty(), "Readers entered an occupied room");
        drop(writer);

        let mut entered = Vec::new();
        wait_until(|| {
            entered.extend(inside.take());
            entered.len() == 2
        });
        for handle in readers {
            handle.join().unwrap();
        }
        assert_eq!(switch.occupants(), 0);
        // The last reader out gave the room back.
        room.wait().forget();
    }

    pub fn manual_unlock() {
        let guard = Semaphore::new(1, ());
        let switch = Lightswitch::default();
        switch.lock(&guard).forget();
        assert_eq!(switch.occupants(), 1);
        switch.unlock(&guard);
        assert_eq!(switch.occupants(), 0);
        guard.wait().forget();
    }
}
