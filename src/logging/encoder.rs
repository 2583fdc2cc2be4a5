//! Record encoders.
//!
//! # Formats
//! ```text
//! Console: [INFO]\t2024-05-01 12:00:00\tscraper/session.rs:42\t✓ Event processed\tevent_id=7 event_name=signup
//! Json:    {"time":"2024-05-01 12:00:00","level":"info","caller":"scraper/session.rs:42","msg":"✓ Event processed","event_id":7,"event_name":"signup"}
//! ```
//!
//! # Design Decisions
//! - Console colors only the level tag and glyph; JSON never carries escape codes
//! - Stack traces follow the console line; in JSON they are the last key
//! - JSON reserved keys win over fields with the same name

use std::io::{self, Write};

use serde_json::{Map, Value};

use crate::logging::record::Record;
use crate::logging::style::level_tag;

const TIME_KEY: &str = "time";
const LEVEL_KEY: &str = "level";
const NAME_KEY: &str = "logger";
const CALLER_KEY: &str = "caller";
const MESSAGE_KEY: &str = "msg";
const STACKTRACE_KEY: &str = "stacktrace";

const RESERVED_KEYS: [&str; 6] = [
    TIME_KEY,
    LEVEL_KEY,
    NAME_KEY,
    CALLER_KEY,
    MESSAGE_KEY,
    STACKTRACE_KEY,
];

/// Line encoding used by a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoder {
    /// Human-readable tab-separated line with colored tag and glyph.
    Console,
    /// One JSON object per line.
    Json,
}

impl Encoder {
    /// Append one encoded line (plus stack trace, if any) to `buf`.
    pub fn encode(&self, record: &Record, buf: &mut Vec<u8>) -> io::Result<()> {
        match self {
            Encoder::Console => encode_console(record, buf),
            Encoder::Json => encode_json(record, buf),
        }
    }
}

fn encode_console(record: &Record, buf: &mut Vec<u8>) -> io::Result<()> {
    write!(buf, "{}\t{}\t", level_tag(record.level), record.timestamp())?;
    if !record.logger.is_empty() {
        write!(buf, "{}\t", record.logger)?;
    }
    write!(buf, "{}\t", record.caller.short())?;
    if let Some(glyph) = record.glyph {
        write!(buf, "{} ", glyph.colored())?;
    }
    buf.write_all(record.message.as_bytes())?;

    for (i, (key, value)) in record.fields.iter().enumerate() {
        buf.write_all(if i == 0 { b"\t" } else { b" " })?;
        write!(buf, "{}={}", key, logfmt_value(value))?;
    }
    buf.write_all(b"\n")?;

    if let Some(stacktrace) = &record.stacktrace {
        buf.write_all(stacktrace.as_bytes())?;
        if !stacktrace.ends_with('\n') {
            buf.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// Strings are bare unless they need quoting; everything else is compact JSON.
fn logfmt_value(value: &Value) -> String {
    match value {
        Value::String(s) if !needs_quoting(s) => s.clone(),
        other => other.to_string(),
    }
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '=' || c == '"')
}

fn encode_json(record: &Record, buf: &mut Vec<u8>) -> io::Result<()> {
    let mut object = Map::new();
    object.insert(TIME_KEY.into(), record.timestamp().into());
    object.insert(LEVEL_KEY.into(), record.level.as_str().into());
    if !record.logger.is_empty() {
        object.insert(NAME_KEY.into(), record.logger.clone().into());
    }
    object.insert(CALLER_KEY.into(), record.caller.short().to_string().into());
    object.insert(MESSAGE_KEY.into(), record.plain_message().into());

    for (key, value) in &record.fields {
        if !RESERVED_KEYS.contains(&key.as_str()) {
            object.insert(key.clone(), value.clone());
        }
    }

    if let Some(stacktrace) = &record.stacktrace {
        object.insert(STACKTRACE_KEY.into(), stacktrace.clone().into());
    }

    serde_json::to_writer(&mut *buf, &object)?;
    buf.write_all(b"\n")
}
