//! The fan-out router.
//!
//! # Data Flow
//! ```text
//! caller (log / info / success / log_api_request ...)
//!     → level check against every sink
//!     → Record (time, caller, stack trace at error+)
//!     → bound fields merged with call-site fields
//!     → each accepting sink: encode + write
//! ```
//!
//! # Design Decisions
//! - Sinks are shared through an `Arc`; derived routers only copy fields
//! - A failing sink never stops dispatch to the others
//! - Write failures go to `tracing`, never back to the caller

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::config::loader::load_config;
use crate::config::schema::{LoggerConfig, OutputFormat};
use crate::error::LogError;
use crate::logging::encoder::Encoder;
use crate::logging::field::{merge_into, Field, Fields};
use crate::logging::level::Level;
use crate::logging::record::{Caller, Record};
use crate::logging::sink::Sink;
use crate::logging::style::Glyph;

/// Structured logger that fans every record out to its sinks.
///
/// Cloning is cheap; clones share the same sinks.
#[derive(Debug, Clone)]
pub struct LogRouter {
    sinks: Arc<[Sink]>,
    name: Arc<str>,
    bound: Arc<Fields>,
}

impl LogRouter {
    /// Build the console sink (and the file sink when enabled) from a config.
    pub fn new(config: &LoggerConfig) -> Result<Self, LogError> {
        let level: Level = config.level.parse()?;

        let encoder = match config.format.parse::<OutputFormat>() {
            Ok(OutputFormat::Console) => Encoder::Console,
            Ok(OutputFormat::Json) => Encoder::Json,
            Err(format) => {
                tracing::warn!(%format, "Unknown console format, using console");
                Encoder::Console
            }
        };

        let mut sinks = vec![Sink::stdout(encoder, level)];
        if config.enable_file {
            sinks.push(Sink::file(&config.file_path, level)?);
        }

        tracing::debug!(%level, sinks = sinks.len(), "Log router constructed");

        Ok(Self::from_sinks(sinks).named(&config.name))
    }

    /// Load a TOML config from `path` and build a router from it.
    pub fn from_config_file(path: &Path) -> Result<Self, LogError> {
        let config = load_config(path)?;
        Self::new(&config)
    }

    /// Router over an explicit set of sinks.
    pub fn from_sinks(sinks: Vec<Sink>) -> Self {
        Self {
            sinks: sinks.into(),
            name: Arc::from(""),
            bound: Arc::new(Fields::new()),
        }
    }

    pub fn sinks(&self) -> &[Sink] {
        &self.sinks
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields attached to every record from this router.
    pub fn bound_fields(&self) -> &Fields {
        &self.bound
    }

    /// Whether any sink accepts `level`.
    pub fn enabled(&self, level: Level) -> bool {
        self.sinks.iter().any(|sink| sink.accepts(level))
    }

    /// New router with `key` bound. The receiver is unchanged.
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extend(&[Field::new(key, value)])
    }

    /// New router with every pair bound. Later keys override earlier ones.
    pub fn with_fields<K, V, I>(&self, fields: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let fields: Vec<Field> = fields.into_iter().map(Field::from).collect();
        self.extend(&fields)
    }

    fn extend(&self, fields: &[Field]) -> Self {
        let mut bound = (*self.bound).clone();
        merge_into(&mut bound, fields);
        Self {
            sinks: Arc::clone(&self.sinks),
            name: Arc::clone(&self.name),
            bound: Arc::new(bound),
        }
    }

    /// New router whose name is this one's joined with `name` by a dot.
    pub fn named(&self, name: &str) -> Self {
        let name: Arc<str> = match (self.name.is_empty(), name.is_empty()) {
            (_, true) => Arc::clone(&self.name),
            (true, false) => Arc::from(name),
            (false, false) => Arc::from(format!("{}.{}", self.name, name)),
        };
        Self {
            sinks: Arc::clone(&self.sinks),
            name,
            bound: Arc::clone(&self.bound),
        }
    }

    /// Emit at `level`. `Panic` and `Fatal` behave like [`LogRouter::panic`]
    /// and [`LogRouter::fatal`].
    #[track_caller]
    pub fn log(&self, level: Level, msg: &str, fields: &[Field]) {
        self.emit(level, None, msg, fields, Caller::here());
    }

    #[track_caller]
    pub fn debug(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Debug, None, msg, fields, Caller::here());
    }

    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Info, None, msg, fields, Caller::here());
    }

    #[track_caller]
    pub fn warn(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Warn, None, msg, fields, Caller::here());
    }

    #[track_caller]
    pub fn error(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::Error, None, msg, fields, Caller::here());
    }

    /// Logged at `dpanic`; never panics.
    #[track_caller]
    pub fn dpanic(&self, msg: &str, fields: &[Field]) {
        self.emit(Level::DPanic, None, msg, fields, Caller::here());
    }

    /// Log at `panic`, flush, then panic with `msg`.
    #[track_caller]
    pub fn panic(&self, msg: &str, fields: &[Field]) -> ! {
        self.emit(Level::Panic, None, msg, fields, Caller::here());
        unreachable!("panic-level emission returned")
    }

    /// Log at `fatal`, flush, then exit the process with status 1.
    #[track_caller]
    pub fn fatal(&self, msg: &str, fields: &[Field]) -> ! {
        self.emit(Level::Fatal, None, msg, fields, Caller::here());
        unreachable!("fatal-level emission returned")
    }

    pub(crate) fn emit(
        &self,
        level: Level,
        glyph: Option<Glyph>,
        msg: &str,
        fields: &[Field],
        caller: Caller,
    ) {
        if self.enabled(level) {
            let mut record = Record::new(level, msg, caller);
            record.glyph = glyph;
            merge_into(&mut record.fields, fields);
            self.dispatch(record);
        }
        self.terminate(level, msg);
    }

    /// Panic and fatal end the caller's control flow even when no sink
    /// accepted the record.
    fn terminate(&self, level: Level, msg: &str) {
        match level {
            Level::Panic => {
                let _ = self.sync();
                panic!("{msg}");
            }
            Level::Fatal => {
                let _ = self.sync();
                std::process::exit(1);
            }
            _ => {}
        }
    }

    /// Stamp `record` with this router's name and bound fields and write it
    /// to every sink that accepts its level.
    pub fn dispatch(&self, mut record: Record) {
        if record.logger.is_empty() {
            record.logger = self.name.to_string();
        }
        if !self.bound.is_empty() {
            let mut fields = (*self.bound).clone();
            fields.extend(std::mem::take(&mut record.fields));
            record.fields = fields;
        }

        for sink in self.sinks.iter().filter(|sink| sink.accepts(record.level)) {
            if let Err(error) = sink.write(&record) {
                tracing::warn!(?sink, %error, "Failed to write log record");
            }
        }
    }

    /// Flush every sink, returning the first failure.
    pub fn sync(&self) -> Result<(), LogError> {
        let mut first_error = None;
        for sink in self.sinks.iter() {
            if let Err(error) = sink.sync() {
                tracing::warn!(?sink, %error, "Failed to sync log sink");
                first_error.get_or_insert(error);
            }
        }
        match first_error {
            Some(error) => Err(LogError::Sync(error)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn lines(&self) -> Vec<serde_json::Map<String, Value>> {
            let data = self.0.lock().unwrap();
            String::from_utf8_lossy(&data)
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }
    }

    impl Write for Buffer {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(data)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
        }
    }

    fn json_router(level: Level) -> (LogRouter, Buffer) {
        let buffer = Buffer::default();
        let router = LogRouter::from_sinks(vec![Sink::new(Encoder::Json, level, buffer.clone())]);
        (router, buffer)
    }

    #[test]
    fn test_invalid_level_fails() {
        let err = LogRouter::new(&LoggerConfig::with_level("verbose")).unwrap_err();
        assert!(matches!(err, LogError::InvalidLevel(_)));
    }

    #[test]
    fn test_console_only_config() {
        let router = LogRouter::new(&LoggerConfig::with_level("debug")).unwrap();
        assert_eq!(router.sinks().len(), 1);
        assert_eq!(router.sinks()[0].encoder(), Encoder::Console);
        assert_eq!(router.sinks()[0].level(), Level::Debug);
    }

    #[test]
    fn test_json_format_hint_switches_console_encoder() {
        let config = LoggerConfig {
            format: "json".into(),
            ..LoggerConfig::default()
        };
        let router = LogRouter::new(&config).unwrap();
        assert_eq!(router.sinks()[0].encoder(), Encoder::Json);
    }

    #[test]
    fn test_level_filter() {
        let (router, buffer) = json_router(Level::Warn);
        router.info("quiet", &[]);
        router.warn("loud", &[]);

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["msg"], "loud");
        assert!(!router.enabled(Level::Debug));
    }

    #[test]
    fn test_caller_is_call_site() {
        let (router, buffer) = json_router(Level::Debug);
        router.info("here", &[]);
        let caller = buffer.lines()[0]["caller"].as_str().unwrap().to_string();
        assert!(caller.starts_with("logging/router.rs:"), "{caller}");
    }

    #[test]
    fn test_bound_fields_do_not_leak() {
        let (router, buffer) = json_router(Level::Debug);
        let derived = router.with_field("request_id", "abc123");
        assert!(router.bound_fields().is_empty());
        assert_eq!(derived.bound_fields()["request_id"], "abc123");

        derived.info("with", &[]);
        router.info("without", &[]);

        let lines = buffer.lines();
        assert_eq!(lines[0]["request_id"], "abc123");
        assert!(lines[1].get("request_id").is_none());
    }

    #[test]
    fn test_field_precedence() {
        let (router, buffer) = json_router(Level::Debug);
        let derived = router
            .with_field("k", 1)
            .with_fields([("k", 2), ("j", 5)]);

        derived.info("a", &[]);
        derived.info("b", &[Field::new("k", 3)]);

        let lines = buffer.lines();
        assert_eq!(lines[0]["k"], 2);
        assert_eq!(lines[0]["j"], 5);
        assert_eq!(lines[1]["k"], 3);
    }

    #[test]
    fn test_named_joins() {
        let (router, buffer) = json_router(Level::Debug);
        let named = router.named("a").named("b");
        assert_eq!(named.name(), "a.b");
        assert_eq!(router.name(), "");
        named.info("x", &[]);
        router.named("").info("y", &[]);

        let lines = buffer.lines();
        assert_eq!(lines[0]["logger"], "a.b");
        assert!(lines[1].get("logger").is_none());
    }

    #[test]
    fn test_error_attaches_stacktrace() {
        let (router, buffer) = json_router(Level::Debug);
        router.warn("w", &[]);
        router.error("e", &[]);

        let lines = buffer.lines();
        assert!(lines[0].get("stacktrace").is_none());
        assert!(lines[1]["stacktrace"].is_string());
    }

    #[test]
    fn test_broken_sink_does_not_block_others() {
        let buffer = Buffer::default();
        let router = LogRouter::from_sinks(vec![
            Sink::new(Encoder::Json, Level::Debug, Broken),
            Sink::new(Encoder::Json, Level::Debug, buffer.clone()),
        ]);

        router.info("still delivered", &[]);
        assert_eq!(buffer.lines().len(), 1);

        let err = router.sync().unwrap_err();
        assert!(matches!(err, LogError::Sync(_)));
    }

    #[test]
    fn test_dpanic_does_not_panic() {
        let (router, buffer) = json_router(Level::Debug);
        router.dpanic("odd", &[]);
        assert_eq!(buffer.lines()[0]["level"], "dpanic");
    }

    #[test]
    #[should_panic(expected = "kaboom")]
    fn test_log_at_panic_level_panics() {
        let (router, _buffer) = json_router(Level::Debug);
        router.log(Level::Panic, "kaboom", &[]);
    }

    #[test]
    fn test_panic_is_logged_before_unwinding() {
        let (router, buffer) = json_router(Level::Debug);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            router.log(Level::Panic, "stop", &[Field::new("step", 2)]);
        }));

        assert!(result.is_err());
        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["level"], "panic");
        assert_eq!(lines[0]["step"], 2);
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_panic_logs_then_panics() {
        let (router, _buffer) = json_router(Level::Debug);
        router.panic("boom", &[]);
    }
}
