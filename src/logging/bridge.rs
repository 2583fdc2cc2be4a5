//! Forward `tracing` events into a [`LogRouter`].
//!
//! # Responsibilities
//! - Convert `tracing` events to records (level, message, fields, file:line)
//! - Install the router as the process-wide `tracing` subscriber
//!
//! # Design Decisions
//! - Events emitted by this crate are dropped, so a failing sink cannot
//!   feed its own diagnostics back into itself
//! - `RUST_LOG` narrows what reaches the router; the sinks still filter

use std::fmt;

use serde_json::Value;
use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::LogError;
use crate::logging::field::Fields;
use crate::logging::level::Level;
use crate::logging::record::{Caller, Record};
use crate::logging::router::LogRouter;

const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// This crate or one of its modules; not crates that merely share the prefix.
fn is_own_target(target: &str) -> bool {
    target
        .strip_prefix(OWN_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// `tracing_subscriber` layer that dispatches events through a router.
#[derive(Debug, Clone)]
pub struct RouterLayer {
    router: LogRouter,
}

impl RouterLayer {
    pub fn new(router: LogRouter) -> Self {
        Self { router }
    }
}

impl<S: Subscriber> Layer<S> for RouterLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_own_target(metadata.target()) {
            return;
        }

        let level = Level::from(*metadata.level());
        if !self.router.enabled(level) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let caller = Caller::new(
            metadata.file().unwrap_or_else(|| metadata.target()),
            metadata.line().unwrap_or(0),
        );
        let mut record = Record::new(level, visitor.message, caller);
        record.fields = visitor.fields;
        self.router.dispatch(record);
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Fields,
}

impl EventVisitor {
    fn insert(&mut self, field: &TracingField, value: Value) {
        if field.name() == "message" {
            self.message = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for EventVisitor {
    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.insert(field, value.into());
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.insert(field, value.into());
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.insert(field, value.into());
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.insert(field, value.into());
    }

    fn record_str(&mut self, field: &TracingField, value: &str) {
        self.insert(field, value.into());
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        self.insert(field, format!("{value:?}").into());
    }
}

/// Install `router` as the global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG`, falling back to `debug`.
pub fn install_global(router: LogRouter) -> Result<(), LogError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(RouterLayer::new(router))
        .try_init()?;
    Ok(())
}
