use grading::{Gauge, deadline, repeat};
use sema::SerializedChannel;
use std::{
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    thread,
};
use sync_problems::{
    Config, Error, Pacing,
    dining_philosophers::{self, Asymmetric, Forks, Table, TableLimit},
};

/// Lets every philosopher of `table` eat `rounds` times, checking that no two
/// neighbours ever eat at once.
fn feast<T: Table>(table: &T, rounds: usize, inspect: impl Fn() + Sync) {
    let seats = table.seats();
    let eating = (0..seats).map(|_| AtomicBool::new(false)).collect::<Vec<_>>();
    let meals = AtomicUsize::new(0);
    let eaters = Gauge::new();

    crossbeam_utils::thread::scope(|s| {
        for id in 1..=seats {
            let (eating, meals, eaters, inspect) = (&eating, &meals, &eaters, &inspect);
            s.spawn(move |_| {
                let (me, left, right) = (id - 1, (id + seats - 2) % seats, id % seats);
                for _ in 0..rounds {
                    table.dine(id, || {
                        eaters.enter();
                        inspect();
                        assert!(
                            !eating[left].load(Ordering::SeqCst) && !eating[right].load(Ordering::SeqCst),
                            "Philosopher {id} eats next to an eating neighbour"
                        );
                        eating[me].store(true, Ordering::SeqCst);
                        thread::yield_now();
                        eating[me].store(false, Ordering::SeqCst);
                        meals.fetch_add(1, Ordering::SeqCst);
                        eaters.leave();
                    });
                }
            });
        }
    })
    .unwrap();

    assert_eq!(meals.load(Ordering::SeqCst), seats * rounds);
    assert!(eaters.peak() <= seats / 2);
}

pub fn forks() {
    let forks = Forks::new(5);
    assert_eq!(forks.len(), 5);
    assert!(!forks.is_empty());
    assert!(core::ptr::eq(forks.left(1), forks.right(5)));
    assert!(core::ptr::eq(forks.right(1), forks.left(2)));
    assert!(!core::ptr::eq(forks.left(3), forks.right(3)));
    assert!(std::panic::catch_unwind(|| Forks::new(5).left(0).signal()).is_err());
    assert!(std::panic::catch_unwind(|| Forks::new(5).right(6).signal()).is_err());
}

#[deadline(20000)]
pub fn table_limit_occupancy() {
    let table = TableLimit::new(5);
    let peak = AtomicUsize::new(0);
    feast(&table, 500, || {
        let seated = table.seated();
        peak.fetch_max(seated, Ordering::SeqCst);
        assert!(seated <= 4, "{seated} philosophers seated at a table limited to 4");
    });
    assert!(peak.load(Ordering::SeqCst) <= 4);
    assert_eq!(table.seated(), 0);
}

#[deadline(20000)]
pub fn table_limit_deadlock_free() {
    for seats in 2..=7 {
        feast(&TableLimit::new(seats), 300, || ());
    }
}

#[deadline(20000)]
pub fn asymmetric_deadlock_free() {
    for seats in 2..=7 {
        feast(&Asymmetric::new(seats), 300, || ());
    }
}

#[deadline(10000)]
#[repeat(20)]
pub fn asymmetric_five_cycles() {
    let output = SerializedChannel::new();
    let config = Config::default().with_pacing(Pacing::NONE);
    dining_philosophers::run(Asymmetric::new(5), &config, &output).unwrap();
    output.close();
    assert_eq!(output.drain(&mut sema::teletype::Transcript::new()), 50);
}

pub fn single_philosopher() {
    struct Lonely;
    impl Table for Lonely {
        fn seats(&self) -> usize {
            1
        }
        fn dine<R>(&self, _: usize, eat: impl FnOnce() -> R) -> R {
            eat()
        }
    }

    let output = SerializedChannel::new();
    let config = Config::default().with_pacing(Pacing::NONE);
    assert!(matches!(
        dining_philosophers::run(Lonely, &config, &output),
        Err(Error::InvalidConfig(_))
    ));
    output.close();
    assert_eq!(output.drain(&mut sema::teletype::Transcript::new()), 0);

    assert!(std::panic::catch_unwind(|| TableLimit::new(1)).is_err());
    assert!(std::panic::catch_unwind(|| Asymmetric::new(0)).is_err());
}

/// The table decides how many philosophers dine, whatever the config says.
#[deadline(10000)]
pub fn table_sets_philosophers() {
    let output = SerializedChannel::new();
    let config = Config::default()
        .with_philosophers(5)
        .with_repetitions(2)
        .with_pacing(Pacing::NONE);
    dining_philosophers::run(Asymmetric::new(7), &config, &output).unwrap();
    output.close();
    assert_eq!(output.drain(&mut sema::teletype::Transcript::new()), 7 * 2 * 2);

    let output = SerializedChannel::new();
    dining_philosophers::run(TableLimit::new(2), &config.clone().with_philosophers(1), &output).unwrap();
    output.close();
    assert_eq!(output.drain(&mut sema::teletype::Transcript::new()), 2 * 2 * 2);
}
