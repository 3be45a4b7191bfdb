//! Forward `tracing` events into a configured logger
//!
//! ```ignore
//! use tracing_subscriber::layer::SubscriberExt;
//! use tracing_subscriber::util::SubscriberInitExt;
//!
//! let logger = namedlog::get_logger("app", namedlog::INFO, Some("app"), "logs")?;
//! tracing_subscriber::registry()
//!     .with(namedlog::LoggerLayer::new(logger))
//!     .init();
//! ```

use std::fmt::{self, Write};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::level::Level;
use crate::logger::LoggerHandle;
use crate::record::LogRecord;

// Events from this crate (e.g. sink write failures) are never forwarded back
const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

/// A `tracing_subscriber` layer that writes each event through a [`Logger`](crate::Logger)
#[derive(Debug, Clone)]
pub struct LoggerLayer {
    logger: LoggerHandle,
}

impl LoggerLayer {
    pub fn new(logger: LoggerHandle) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &LoggerHandle {
        &self.logger
    }
}

fn is_own_target(target: &str) -> bool {
    target == OWN_TARGET
        || target
            .strip_prefix(OWN_TARGET)
            .is_some_and(|rest| rest.starts_with("::"))
}

/// Collects the `message` field and renders the rest as `key=value`
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn into_message(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.record_debug(field, &value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
            return;
        }
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={:?}", field.name(), value);
    }
}

impl<S: Subscriber> Layer<S> for LoggerLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_own_target(metadata.target()) {
            return;
        }

        let level = Level::from(*metadata.level());
        if !self.logger.is_enabled_for(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let record = LogRecord::new(level, self.logger.name(), visitor.into_message())
            .with_location(
                metadata.file().unwrap_or_default(),
                metadata.module_path().unwrap_or(metadata.target()),
                metadata.line().unwrap_or_default(),
            );
        self.logger.log_record(&record);
    }
}
