use grading::deadline;
use sema::{Printer, SerializedChannel, teletype::Transcript};
use std::{collections::BTreeMap, sync::Arc};
use sync_problems::{
    Config, Error, Pacing, Problem,
    scenario::{self, Action, Role},
};

/// Runs `problem` with `config` and returns every emitted line.
fn transcript(problem: Problem, config: &Config) -> Vec<String> {
    let output = Arc::new(SerializedChannel::new());
    let transcript = Transcript::new();
    let printer = Printer::start(output.clone(), transcript.clone()).unwrap();
    scenario::run(problem, config, &output).unwrap();
    let emitted = printer.finish().unwrap();
    let lines = transcript.lines();
    assert_eq!(emitted, lines.len());
    lines
}

/// Splits `Philosopher 3: Eating.` into its id and action.
fn parse(line: &str, role: Role) -> Option<(usize, String)> {
    let rest = line.strip_prefix(&format!("{role} "))?;
    let (id, action) = rest.split_once(": ")?;
    Some((id.parse().ok()?, action.strip_suffix('.')?.to_owned()))
}

fn quick() -> Config {
    Config::default().with_pacing(Pacing::NONE)
}

pub fn lines() {
    assert_eq!(
        scenario::line(Role::Philosopher, 3, Action::Eating),
        "Philosopher 3: Eating."
    );
    assert_eq!(
        scenario::line(Role::Reader, 1, Action::Reading),
        "Reader 1: Reading."
    );
    assert_eq!(
        scenario::line(Role::Writer, 12, Action::Writing),
        "Writer 12: Writing."
    );
}

#[deadline(10000)]
pub fn table_limit_transcript() {
    let lines = transcript(Problem::TableLimitPhilosophers, &quick());
    assert_eq!(lines.len(), 51);
    assert_eq!(lines[0], Problem::TableLimitPhilosophers.banner());

    let mut per_philosopher = BTreeMap::<usize, Vec<String>>::new();
    for line in &lines[1..] {
        let (id, action) = parse(line, Role::Philosopher)
            .unwrap_or_else(|| panic!("Malformed line {line:?}"));
        per_philosopher.entry(id).or_default().push(action);
    }
    assert_eq!(per_philosopher.keys().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5]);
    for (id, actions) in per_philosopher {
        let expected = ["Thinking", "Eating"].repeat(5);
        assert_eq!(actions, expected, "Philosopher {id} is out of order");
    }
    assert_eq!(lines.iter().filter(|l| l.ends_with(": Thinking.")).count(), 25);
    assert_eq!(lines.iter().filter(|l| l.ends_with(": Eating.")).count(), 25);
}

#[deadline(10000)]
pub fn asymmetric_transcript() {
    let config = quick().with_philosophers(3).with_repetitions(4);
    let lines = transcript(Problem::AsymmetricPhilosophers, &config);
    assert_eq!(lines[0], Problem::AsymmetricPhilosophers.banner());
    assert_eq!(lines.len(), 1 + 3 * 4 * 2);
}

fn readers_writers_transcript(problem: Problem) {
    let config = quick().with_readers(3).with_writers(2).with_repetitions(4);
    let lines = transcript(problem, &config);
    assert_eq!(lines[0], problem.banner());

    let mut counts = BTreeMap::<(String, usize), usize>::new();
    for line in &lines[1..] {
        let (role, id, action) = [(Role::Reader, "Reading"), (Role::Writer, "Writing")]
            .into_iter()
            .find_map(|(role, action)| {
                let (id, a) = parse(line, role)?;
                (a == action).then(|| (role.to_string(), id, a))
            })
            .unwrap_or_else(|| panic!("Malformed line {line:?}"));
        assert!(!action.is_empty());
        *counts.entry((role, id)).or_default() += 1;
    }
    let expected = (1..=3)
        .map(|id| (("Reader".to_owned(), id), 4))
        .chain((1..=2).map(|id| (("Writer".to_owned(), id), 4)))
        .collect::<BTreeMap<_, _>>();
    assert_eq!(counts, expected);
}

#[deadline(10000)]
pub fn no_starve_transcript() {
    readers_writers_transcript(Problem::NoStarveReadersWriters)
}

#[deadline(10000)]
pub fn writer_priority_transcript() {
    readers_writers_transcript(Problem::WriterPriorityReadersWriters)
}

#[deadline(10000)]
pub fn writers_only() {
    let config = quick().with_readers(0).with_writers(2).with_repetitions(3);
    let lines = transcript(Problem::WriterPriorityReadersWriters, &config);
    assert_eq!(lines.len(), 1 + 2 * 3);
}

pub fn invalid_config() {
    let output = SerializedChannel::new();
    let run = |problem, config: Config| scenario::run(problem, &config, &output);

    assert!(matches!(
        run(Problem::NoStarveReadersWriters, quick().with_repetitions(0)),
        Err(Error::InvalidConfig(_))
    ));
    assert!(matches!(
        run(
            Problem::WriterPriorityReadersWriters,
            quick().with_readers(0).with_writers(0)
        ),
        Err(Error::InvalidConfig(_))
    ));
    assert!(matches!(
        run(Problem::TableLimitPhilosophers, quick().with_philosophers(1)),
        Err(Error::InvalidConfig(_))
    ));
    // Nothing was announced for a scenario that never started.
    output.close();
    assert_eq!(output.drain(&mut Transcript::new()), 0);
}

#[deadline(10000)]
pub fn unused_settings_ignored() {
    let config = quick().with_philosophers(1).with_repetitions(1);
    let lines = transcript(Problem::NoStarveReadersWriters, &config);
    assert_eq!(lines.len(), 1 + 5 + 5);
}

pub fn problems() {
    for (problem, n) in Problem::ALL.into_iter().zip(1u8..) {
        assert_eq!(u8::from(problem), n);
        assert_eq!(problem.to_string(), format!("Problem {n}"));
        assert!(problem.banner().starts_with(&format!("=== Problem {n}: ")));
    }
}
