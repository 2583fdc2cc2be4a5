//! Logging subsystem.
//!
//! # Data Flow
//! ```text
//! LogRouter (router.rs, helpers.rs)      tracing events (bridge.rs)
//!     → Record (record.rs)  ←──────────────────┘
//!     → per-sink level filter (sink.rs)
//!     → Encoder::Console | Encoder::Json (encoder.rs, style.rs)
//!     → stdout / log file / any writer
//! ```

pub mod bridge;
pub mod encoder;
pub mod field;
pub mod helpers;
pub mod level;
pub mod record;
pub mod router;
pub mod sink;
pub mod style;

pub use bridge::{install_global, RouterLayer};
pub use encoder::Encoder;
pub use field::{Field, Fields};
pub use level::Level;
pub use record::{Caller, Record};
pub use router::LogRouter;
pub use sink::Sink;
pub use style::Glyph;
