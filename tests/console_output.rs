//! Console encoding and fan-out through the public router API.

use std::thread;

use logrouter::logging::{Encoder, Sink};
use logrouter::{Field, Level, LogRouter};

mod common;

use common::SharedBuffer;

#[test]
fn test_console_line_contents() {
    let buffer = SharedBuffer::default();
    let log = LogRouter::from_sinks(vec![Sink::new(Encoder::Console, Level::Debug, buffer.clone())])
        .with_field("request_id", "abc123");

    log.success("Event processed", &[Field::new("event_id", 7)]);

    let out = buffer.contents();
    let fields: Vec<&str> = out.trim_end().split('\t').collect();
    assert!(fields[0].contains("[INFO]"));
    assert!(fields[2].starts_with("tests/console_output.rs:"));
    assert!(fields[3].contains('✓') && fields[3].ends_with("Event processed"));
    assert_eq!(fields[4], "request_id=abc123 event_id=7");
}

#[test]
fn test_fan_out_respects_each_sink_level() {
    let verbose = SharedBuffer::default();
    let quiet = SharedBuffer::default();
    let log = LogRouter::from_sinks(vec![
        Sink::new(Encoder::Console, Level::Debug, verbose.clone()),
        Sink::new(Encoder::Json, Level::Error, quiet.clone()),
    ]);

    log.debug("d", &[]);
    log.warn("w", &[]);
    log.error("e", &[]);

    assert_eq!(verbose.contents().lines().filter(|l| l.contains("\t")).count(), 3);
    let contents = quiet.contents();
    let json: Vec<&str> = contents.lines().collect();
    assert_eq!(json.len(), 1);
    assert!(json[0].contains(r#""msg":"e""#));
    assert!(!json[0].contains('\u{1b}'));
}

#[test]
fn test_concurrent_emission_keeps_lines_whole() {
    let buffer = SharedBuffer::default();
    let log = LogRouter::from_sinks(vec![Sink::new(Encoder::Json, Level::Info, buffer.clone())]);

    thread::scope(|scope| {
        for worker in 0..8 {
            let log = log.with_field("worker", worker);
            scope.spawn(move || {
                for i in 0..50 {
                    log.info("tick", &[Field::new("i", i)]);
                }
            });
        }
    });
    log.sync().unwrap();

    let lines: Vec<serde_json::Value> = buffer
        .contents()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 400);
    assert!(lines.iter().all(|l| l["worker"].is_number()));
}
