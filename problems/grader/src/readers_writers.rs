use grading::{Gauge, Trace, deadline, settle, wait_until};
use sema::sync::Semaphore;
use std::{sync::Arc, thread};
use sync_problems::readers_writers::{NoStarve, ReadersWriters, WriterPriority};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Event {
    Read(usize),
    Write(usize),
}

fn exclusion<P: ReadersWriters>(protocol: P) {
    const READERS: usize = 8;
    const WRITERS: usize = 4;
    const ROUNDS: usize = 200;

    let readers = Gauge::new();
    let writers = Gauge::new();
    crossbeam_utils::thread::scope(|s| {
        for _ in 0..READERS {
            s.spawn(|_| {
                for _ in 0..ROUNDS {
                    protocol.read(|| {
                        readers.enter();
                        assert_eq!(writers.current(), 0, "A reader shares the room with a writer");
                        thread::yield_now();
                        readers.leave();
                    });
                }
            });
        }
        for _ in 0..WRITERS {
            s.spawn(|_| {
                for _ in 0..ROUNDS {
                    protocol.write(|| {
                        assert_eq!(writers.enter(), 1, "Two writers share the room");
                        assert_eq!(readers.current(), 0, "A writer shares the room with a reader");
                        thread::yield_now();
                        writers.leave();
                    });
                }
            });
        }
    })
    .unwrap();
    assert_eq!(writers.peak(), 1);
}

#[deadline(20000)]
pub fn no_starve_exclusion() {
    exclusion(NoStarve::new())
}

#[deadline(20000)]
pub fn writer_priority_exclusion() {
    exclusion(WriterPriority::new())
}

/// Starts a reader that stays inside until `leave` is signaled.
fn lingering_reader<P: ReadersWriters + Send + 'static>(
    protocol: &Arc<P>,
    trace: &Arc<Trace<Event>>,
    leave: &Arc<Semaphore<()>>,
    id: usize,
) -> thread::JoinHandle<()> {
    let (protocol, trace, leave) = (protocol.clone(), trace.clone(), leave.clone());
    thread::spawn(move || {
        protocol.read(|| {
            trace.record(Event::Read(id));
            leave.wait().forget();
        })
    })
}

fn visitor<P: ReadersWriters + Send + 'static>(
    protocol: &Arc<P>,
    trace: &Arc<Trace<Event>>,
    event: Event,
) -> thread::JoinHandle<()> {
    let (protocol, trace) = (protocol.clone(), trace.clone());
    thread::spawn(move || match event {
        Event::Read(_) => protocol.read(|| trace.record(event)),
        Event::Write(_) => protocol.write(|| trace.record(event)),
    })
}

fn collect(trace: &Trace<Event>, n: usize) -> Vec<Event> {
    let mut events = Vec::new();
    wait_until(|| {
        events.extend(trace.take());
        events.len() == n
    });
    events
}

#[deadline(5000)]
pub fn no_starve_bound() {
    let protocol = Arc::new(NoStarve::new());
    let trace = Arc::new(Trace::new());
    let leave = Arc::new(Semaphore::new(0, ()));

    let r1 = lingering_reader(&protocol, &trace, &leave, 1);
    assert_eq!(collect(&trace, 1), [Event::Read(1)]);

    // The writer waits for reader 1 while holding the turnstile.
    let w1 = visitor(&protocol, &trace, Event::Write(1));
    settle();
    // A reader arriving now queues behind the writer.
    let r2 = visitor(&protocol, &trace, Event::Read(2));
    settle();
    assert!(trace.take().is_empty(), "Someone entered past a waiting writer");

    leave.signal();
    assert_eq!(collect(&trace, 2), [Event::Write(1), Event::Read(2)]);
    for handle in [r1, w1, r2] {
        handle.join().unwrap();
    }
}

#[deadline(5000)]
pub fn no_starve_readers_share() {
    let protocol = Arc::new(NoStarve::new());
    let trace = Arc::new(Trace::new());
    let leave = Arc::new(Semaphore::new(0, ()));

    let readers = (1..=3)
        .map(|id| lingering_reader(&protocol, &trace, &leave, id))
        .collect::<Vec<_>>();
    // All three are inside at once.
    let mut inside = collect(&trace, 3);
    inside.sort_by_key(|e| match e {
        Event::Read(id) | Event::Write(id) => *id,
    });
    assert_eq!(inside, [Event::Read(1), Event::Read(2), Event::Read(3)]);

    for _ in 0..3 {
        leave.signal();
    }
    for handle in readers {
        handle.join().unwrap();
    }
}

#[deadline(5000)]
pub fn writer_precedence() {
    let protocol = Arc::new(WriterPriority::new());
    let trace = Arc::new(Trace::new());
    let leave = Arc::new(Semaphore::new(0, ()));

    let r1 = lingering_reader(&protocol, &trace, &leave, 1);
    assert_eq!(collect(&trace, 1), [Event::Read(1)]);

    let w1 = visitor(&protocol, &trace, Event::Write(1));
    settle();
    let r2 = visitor(&protocol, &trace, Event::Read(2));
    settle();
    // Arrives after reader 2, still enters before it.
    let w2 = visitor(&protocol, &trace, Event::Write(2));
    settle();
    assert!(trace.take().is_empty(), "Someone entered an occupied room");

    leave.signal();
    let events = collect(&trace, 3);
    assert_eq!(events[2], Event::Read(2), "Reader 2 overtook a waiting writer: {events:?}");
    assert!(events[..2].contains(&Event::Write(1)));
    assert!(events[..2].contains(&Event::Write(2)));
    for handle in [r1, w1, r2, w2] {
        handle.join().unwrap();
    }
}

#[deadline(5000)]
pub fn writer_priority_readers_share() {
    let protocol = Arc::new(WriterPriority::new());
    let trace = Arc::new(Trace::new());
    let leave = Arc::new(Semaphore::new(0, ()));

    let readers = (1..=3)
        .map(|id| lingering_reader(&protocol, &trace, &leave, id))
        .collect::<Vec<_>>();
    assert_eq!(collect(&trace, 3).len(), 3);

    for _ in 0..3 {
        leave.signal();
    }
    for handle in readers {
        handle.join().unwrap();
    }
    // With the room empty again, a writer passes straight through.
    visitor(&protocol, &trace, Event::Write(1)).join().unwrap();
    assert_eq!(trace.take(), [Event::Write(1)]);
}
