use grading::deadline;
use sema::{ChannelClosed, Printer, SerializedChannel, teletype::Transcript};
use std::sync::Arc;

#[deadline(5000)]
pub fn fifo() {
    const COUNT: usize = 1000;
    let channel = Arc::new(SerializedChannel::new());
    let transcript = Transcript::new();
    let printer = Printer::start(channel.clone(), transcript.clone()).unwrap();

    for i in 0..COUNT {
        channel.enqueue(format!("line {i}")).unwrap();
    }
    assert_eq!(printer.finish().unwrap(), COUNT);

    let expected = (0..COUNT).map(|i| format!("line {i}")).collect::<Vec<_>>();
    assert_eq!(transcript.lines(), expected);
}

#[deadline(5000)]
pub fn multi_producer() {
    const PRODUCERS: usize = 4;
    const EACH: usize = 250;
    let channel = Arc::new(SerializedChannel::new());
    let transcript = Transcript::new();
    let printer = Printer::start(channel.clone(), transcript.clone()).unwrap();

    crossbeam_utils::thread::scope(|s| {
        for p in 0..PRODUCERS {
            let channel = &channel;
            s.spawn(move |_| {
                for i in 0..EACH {
                    channel.enqueue(format!("{p} {i}")).unwrap();
                }
            });
        }
    })
    .unwrap();
    assert_eq!(printer.finish().unwrap(), PRODUCERS * EACH);

    let lines = transcript.lines();
    assert_eq!(lines.len(), PRODUCERS * EACH);
    for p in 0..PRODUCERS {
        let mine = lines
            .iter()
            .filter_map(|line| {
                let (producer, i) = line.split_once(' ')?;
                (producer.parse::<usize>().ok()? == p).then(|| i.parse::<usize>().unwrap())
            })
            .collect::<Vec<_>>();
        assert_eq!(
            mine,
            (0..EACH).collect::<Vec<_>>(),
            "Lines of producer {p} were reordered, lost or duplicated"
        );
    }
}

#[deadline(2000)]
pub fn close_drains_pending() {
    let channel = SerializedChannel::new();
    for i in 0..10 {
        channel.enqueue(format!("pending {i}")).unwrap();
    }
    channel.close();
    assert!(channel.is_closed());

    // Draining a closed channel ends once it is empty.
    let mut transcript = Transcript::new();
    assert_eq!(channel.drain(&mut transcript), 10);
    assert_eq!(
        transcript.lines(),
        (0..10).map(|i| format!("pending {i}")).collect::<Vec<_>>()
    );
}

pub fn enqueue_after_close() {
    let channel = SerializedChannel::default();
    assert!(!channel.is_closed());
    channel.close();
    assert_eq!(
        channel.enqueue("too late"),
        Err(ChannelClosed("too late".into()))
    );
}

#[deadline(2000)]
pub fn close_twice() {
    let channel = Arc::new(SerializedChannel::new());
    let transcript = Transcript::new();
    let printer = Printer::start(channel.clone(), transcript.clone()).unwrap();
    channel.enqueue("only").unwrap();
    channel.close();
    channel.close();
    assert_eq!(printer.finish().unwrap(), 1);
    assert_eq!(transcript.lines(), ["only"]);
}

#[deadline(2000)]
pub fn idle_printer_stops() {
    let channel = Arc::new(SerializedChannel::new());
    let printer = Printer::start(channel, Transcript::new()).unwrap();
    assert!(!printer.channel().is_closed());
    assert_eq!(printer.finish().unwrap(), 0);
}
