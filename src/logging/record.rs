//! Materialized log records.

use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;

use chrono::{DateTime, Local};

use crate::logging::field::Fields;
use crate::logging::level::Level;
use crate::logging::style::Glyph;

/// Timestamp layout shared by every encoder.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source location of the emitting call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
}

impl Caller {
    pub fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Caller of the current `#[track_caller]` chain.
    #[track_caller]
    pub fn here() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line())
    }

    /// `dir/file.rs:line`, keeping only the last directory.
    pub fn short(&self) -> ShortCaller<'_> {
        ShortCaller(self)
    }
}

/// Display adapter for [`Caller::short`].
pub struct ShortCaller<'a>(&'a Caller);

impl fmt::Display for ShortCaller<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = self.0.file;
        let mut seps = file.rmatch_indices(|c: char| c == '/' || c == '\\').map(|(i, _)| i);
        let trimmed = match (seps.next(), seps.next()) {
            (Some(_), Some(second)) => &file[second + 1..],
            _ => file,
        };
        write!(f, "{}:{}", trimmed, self.0.line)
    }
}

/// One log event, ready for encoding.
#[derive(Debug, Clone)]
pub struct Record {
    pub time: DateTime<Local>,
    pub level: Level,
    pub logger: String,
    pub glyph: Option<Glyph>,
    pub message: String,
    pub caller: Caller,
    /// Bound fields followed by call-site fields, merged last-write-wins.
    pub fields: Fields,
    pub stacktrace: Option<String>,
}

impl Record {
    /// Build a record stamped with the current time. A stack trace is
    /// captured when the level requires one.
    pub fn new(level: Level, message: impl Into<String>, caller: Caller) -> Self {
        let stacktrace = level
            .captures_stacktrace()
            .then(|| Backtrace::force_capture().to_string());
        Self {
            time: Local::now(),
            level,
            logger: String::new(),
            glyph: None,
            message: message.into(),
            caller,
            fields: Fields::new(),
            stacktrace,
        }
    }

    /// Formatted timestamp.
    pub fn timestamp(&self) -> String {
        self.time.format(TIME_FORMAT).to_string()
    }

    /// Message with the glyph prepended, without color codes.
    pub fn plain_message(&self) -> String {
        match self.glyph {
            Some(glyph) => format!("{} {}", glyph.symbol(), self.message),
            None => self.message.clone(),
        }
    }
}
