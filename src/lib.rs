//! Colorized structured logging with optional JSON file output.
//!
//! A [`LogRouter`] fans each record out to a console sink and, when
//! configured, a JSON-lines file sink. Each sink has its own encoding and
//! minimum level.
//!
//! ```no_run
//! use logrouter::{Field, LogRouter, LoggerConfig};
//!
//! let log = LogRouter::new(&LoggerConfig::with_level("debug").with_file("logs/app.log"))?;
//! let req = log.with_field("request_id", "abc123");
//! req.success("Fetched page", &[Field::new("bytes", 5120)]);
//! log.sync()?;
//! # Ok::<(), logrouter::LogError>(())
//! ```

pub mod config;
pub mod error;
pub mod logging;

pub use config::{load_config, LoggerConfig};
pub use error::LogError;
pub use logging::{Field, Level, LogRouter};
