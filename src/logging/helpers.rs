//! Semantic and domain-specific emission helpers.
//!
//! | Helper   | Level | Glyph |
//! |----------|-------|-------|
//! | success  | info  | ✓     |
//! | progress | info  | →     |
//! | warning  | warn  | ⚠     |
//! | failure  | error | ✗     |

use std::time::Duration;

use crate::logging::field::Field;
use crate::logging::record::Caller;
use crate::logging::router::LogRouter;
use crate::logging::style::Glyph;

impl LogRouter {
    #[track_caller]
    pub fn success(&self, msg: &str, fields: &[Field]) {
        self.glyph(Glyph::Success, msg, fields, Caller::here());
    }

    #[track_caller]
    pub fn progress(&self, msg: &str, fields: &[Field]) {
        self.glyph(Glyph::Progress, msg, fields, Caller::here());
    }

    #[track_caller]
    pub fn warning(&self, msg: &str, fields: &[Field]) {
        self.glyph(Glyph::Warning, msg, fields, Caller::here());
    }

    #[track_caller]
    pub fn failure(&self, msg: &str, fields: &[Field]) {
        self.glyph(Glyph::Failure, msg, fields, Caller::here());
    }

    fn glyph(&self, glyph: Glyph, msg: &str, fields: &[Field], caller: Caller) {
        self.emit(glyph.level(), Some(glyph), msg, fields, caller);
    }

    #[track_caller]
    pub fn log_event_processed(&self, event_id: i64, event_name: &str) {
        self.success(
            "Event processed",
            &[
                Field::new("event_id", event_id),
                Field::new("event_name", event_name),
            ],
        );
    }

    #[track_caller]
    pub fn log_file_downloaded(&self, file_name: &str, file_path: &str, file_size: u64) {
        self.success(
            "File downloaded",
            &[
                Field::new("file_name", file_name),
                Field::new("file_path", file_path),
                Field::new("file_size", file_size),
            ],
        );
    }

    /// Progress for 2xx status codes, warning for everything else.
    /// `duration` is written as fractional seconds.
    #[track_caller]
    pub fn log_api_request(&self, url: &str, status_code: u16, duration: Duration) {
        let fields = [
            Field::new("url", url),
            Field::new("status_code", status_code),
            Field::new("duration", duration.as_secs_f64()),
        ];
        if (200..300).contains(&status_code) {
            self.progress("API request completed", &fields);
        } else {
            self.warning("API request failed", &fields);
        }
    }

    #[track_caller]
    pub fn log_database_operation(&self, operation: &str, table: &str, count: u64) {
        self.progress(
            "Database operation completed",
            &[
                Field::new("operation", operation),
                Field::new("table", table),
                Field::new("count", count),
            ],
        );
    }

    /// One integer field per counter, emitted in key order.
    #[track_caller]
    pub fn log_scrape_session<K, I>(&self, session_id: &str, mode: &str, stats: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, i64)>,
    {
        let mut counters: Vec<(String, i64)> =
            stats.into_iter().map(|(k, v)| (k.into(), v)).collect();
        counters.sort_by(|a, b| a.0.cmp(&b.0));

        let mut fields = Vec::with_capacity(counters.len() + 2);
        fields.push(Field::new("session_id", session_id));
        fields.push(Field::new("mode", mode));
        fields.extend(counters.into_iter().map(|(k, v)| Field::new(k, v)));

        self.success("Scrape session completed", &fields);
    }
}
