use clap::Parser;
use grading::deadline;
use sema::{logger::level_for, teletype::Transcript};
use std::time::Duration;
use sync_problems::{
    Error, Pacing, Problem,
    cli::{self, Args},
};
use tracing::level_filters::LevelFilter;

fn parse(args: &[&str]) -> Args {
    Args::try_parse_from(core::iter::once("sync-problems").chain(args.iter().copied())).unwrap()
}

pub fn missing_problem() {
    let e = parse(&[]).problem().unwrap_err();
    assert!(matches!(e, Error::Usage));
    assert_eq!(e.to_string(), "Usage: sync-problems <problem #>");
    assert!(e.is_invocation());
    assert_eq!(e.exit_code(), 1);
}

pub fn invalid_problem() {
    for arg in ["0", "5", "abc", "-1", "256"] {
        let e = parse(&[arg]).problem().unwrap_err();
        assert!(matches!(e, Error::InvalidProblem(_)), "{arg:?} was accepted");
        assert_eq!(e.to_string(), "Invalid problem number.");
        // The rejected text is kept for the debug log.
        assert!(format!("{e:?}").contains(arg));
        assert!(e.is_invocation());
        assert_eq!(e.exit_code(), 1);
    }
}

pub fn valid_problems() {
    for (arg, problem) in ["1", "2", "3", "4"].into_iter().zip(Problem::ALL) {
        assert_eq!(parse(&[arg]).problem().unwrap(), problem);
    }
    assert_eq!(" 3 ".parse::<Problem>().unwrap(), Problem::TableLimitPhilosophers);
}

pub fn options() {
    let args = parse(&[]);
    let config = args.config().unwrap();
    assert_eq!(config, sync_problems::Config::default());

    let args = parse(&[
        "-n", "2", "--readers", "1", "--writers", "3", "--philosophers", "7", "--pace", "0", "4",
    ]);
    assert_eq!(args.problem().unwrap(), Problem::AsymmetricPhilosophers);
    let config = args.config().unwrap();
    assert_eq!(config.repetitions, 2);
    assert_eq!(config.readers, 1);
    assert_eq!(config.writers, 3);
    assert_eq!(config.philosophers, 7);
    assert_eq!(config.pacing, Pacing::NONE);

    let config = parse(&["--pace", "2", "1"]).config().unwrap();
    assert_eq!(config.pacing.read, Duration::from_millis(200));
    assert_eq!(config.pacing.after_write, Duration::from_millis(400));
}

pub fn pace_out_of_range() {
    for pace in ["1e300", "inf", "NaN"] {
        let e = parse(&["--pace", pace, "3"]).config().unwrap_err();
        assert!(matches!(e, Error::InvalidConfig(_)), "--pace {pace} was accepted");
        assert!(!e.is_invocation());
    }
    assert_eq!(Pacing::default().scaled(-1.0).unwrap(), Pacing::NONE);
    assert_eq!(Pacing::default().scaled(0.0).unwrap(), Pacing::NONE);
}

pub fn bad_options() {
    assert!(Args::try_parse_from(["sync-problems", "-v", "-q", "1"]).is_err());
    assert!(Args::try_parse_from(["sync-problems", "--readers", "many", "1"]).is_err());
    assert!(Args::try_parse_from(["sync-problems", "1", "2"]).is_err());
}

pub fn verbosity() {
    assert_eq!(level_for(0, false), LevelFilter::WARN);
    assert_eq!(level_for(1, false), LevelFilter::INFO);
    assert_eq!(level_for(2, false), LevelFilter::DEBUG);
    assert_eq!(level_for(5, false), LevelFilter::TRACE);
    assert_eq!(level_for(3, true), LevelFilter::OFF);

    assert_eq!(parse(&["-vv", "1"]).verbose, 2);
    assert!(parse(&["-q", "1"]).quiet);
}

pub fn runtime_errors() {
    let e = Error::InvalidConfig("need at least two philosophers");
    assert!(!e.is_invocation());
    assert_eq!(e.exit_code(), 1);
    assert!(!Error::ActorPanicked.is_invocation());
}

pub fn clap_exit_codes() {
    for args in [["sync-problems", "--help"], ["sync-problems", "--version"]] {
        let e = Args::try_parse_from(args).unwrap_err();
        assert_eq!(cli::clap_exit_code(&e), 0, "{args:?} must exit successfully");
    }
    for args in [
        &["sync-problems", "--readers", "many", "1"][..],
        &["sync-problems", "--bogus"],
        &["sync-problems", "-v", "-q", "1"],
    ] {
        let e = Args::try_parse_from(args).unwrap_err();
        assert_eq!(cli::clap_exit_code(&e), 1, "{args:?} must fail");
    }
}

#[deadline(10000)]
pub fn execute() {
    let transcript = Transcript::new();
    let args = parse(&["--pace", "0", "-n", "1", "3"]);
    assert_eq!(cli::execute(&args, transcript.clone()).unwrap(), 11);
    let lines = transcript.lines();
    assert_eq!(lines[0], Problem::TableLimitPhilosophers.banner());
    assert_eq!(lines.len(), 11);
}

#[deadline(10000)]
pub fn execute_rejects_before_output() {
    for (args, invocation) in [
        (&["9"][..], true),
        (&[][..], true),
        (&["--pace", "1e300", "3"][..], false),
        (&["--pace", "0", "--philosophers", "1", "4"][..], false),
    ] {
        let transcript = Transcript::new();
        let e = cli::execute(&parse(args), transcript.clone()).unwrap_err();
        assert_eq!(e.is_invocation(), invocation, "{args:?}: {e}");
        assert_eq!(e.exit_code(), 1);
        assert!(transcript.lines().is_empty(), "{args:?} printed output");
    }
}
