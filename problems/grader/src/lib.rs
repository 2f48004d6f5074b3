//! Test suite of the synchronization problems.
//!
//! Run everything with `cargo run` (or `cargo test`) from this directory, or
//! pass test names such as `sync::semaphore::sema_0` to run only those.

pub mod channel;
pub mod cli;
pub mod dining_philosophers;
pub mod readers_writers;
pub mod scenario;
pub mod sync;

use grading::TestCase;

/// Every test, in the order they run.
pub fn tests() -> Vec<&'static dyn TestCase> {
    let tests: &[&'static dyn TestCase] = &[
        // Primitives.
        &sync::spinlock::smoke,
        &sync::spinlock::try_lock,
        &sync::spinlock::forgotten_unlock,
        &sync::semaphore::sema_0,
        &sync::semaphore::sema_1,
        &sync::semaphore::sema_2,
        &sync::semaphore::exec_order,
        &sync::semaphore::n_permits,
        &sync::semaphore::wake_order,
        &sync::semaphore::resource,
        &sync::lightswitch::first_in_last_out,
        &sync::lightswitch::class_waits_behind_first,
        &sync::lightswitch::manual_unlock,
        // Serialized output.
        &channel::fifo,
        &channel::multi_producer,
        &channel::close_drains_pending,
        &channel::enqueue_after_close,
        &channel::close_twice,
        &channel::idle_printer_stops,
        // Readers and writers.
        &readers_writers::no_starve_exclusion,
        &readers_writers::writer_priority_exclusion,
        &readers_writers::no_starve_bound,
        &readers_writers::no_starve_readers_share,
        &readers_writers::writer_precedence,
        &readers_writers::writer_priority_readers_share,
        // Dining philosophers.
        &dining_philosophers::forks,
        &dining_philosophers::table_limit_occupancy,
        &dining_philosophers::table_limit_deadlock_free,
        &dining_philosophers::asymmetric_deadlock_free,
        &dining_philosophers::asymmetric_five_cycles,
        &dining_philosophers::single_philosopher,
        &dining_philosophers::table_sets_philosophers,
        // Scenarios.
        &scenario::lines,
        &scenario::problems,
        &scenario::table_limit_transcript,
        &scenario::asymmetric_transcript,
        &scenario::no_starve_transcript,
        &scenario::writer_priority_transcript,
        &scenario::writers_only,
        &scenario::invalid_config,
        &scenario::unused_settings_ignored,
        // Command line.
        &cli::missing_problem,
        &cli::invalid_problem,
        &cli::valid_problems,
        &cli::options,
        &cli::bad_options,
        &cli::verbosity,
        &cli::runtime_errors,
        &cli::pace_out_of_range,
        &cli::clap_exit_codes,
        &cli::execute,
        &cli::execute_rejects_before_output,
    ];
    tests.to_vec()
}
