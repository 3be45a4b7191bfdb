//! Configured logger handles
//!
//! A [`Logger`] is created once per name by the registry and shared as an
//! `Arc<Logger>`. It filters by level, formats each record once and hands the
//! line to every sink in order.

use std::fmt;
use std::sync::Arc;

use crate::formatter::Formatter;
use crate::level::Level;
use crate::record::{LogRecord, Overrides};
use crate::sink::{Sink, SinkKind};

/// Shared handle returned by the factory
pub type LoggerHandle = Arc<Logger>;

/// A named logger with its level, sinks and formatter
pub struct Logger {
    name: String,
    level: Level,
    propagate: bool,
    sinks: Vec<Arc<dyn Sink>>,
    formatter: Arc<Formatter>,
}

impl Logger {
    /// Create a logger; records never propagate to other loggers
    pub fn new(
        name: impl Into<String>,
        level: Level,
        sinks: Vec<Arc<dyn Sink>>,
        formatter: Arc<Formatter>,
    ) -> Self {
        Self {
            name: name.into(),
            level,
            propagate: false,
            sinks,
            formatter,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Minimum level this logger emits
    pub fn level(&self) -> Level {
        self.level
    }

    /// Whether records are passed on to ancestor loggers (always false)
    pub fn propagate(&self) -> bool {
        self.propagate
    }

    pub fn sinks(&self) -> &[Arc<dyn Sink>] {
        &self.sinks
    }

    /// Kinds of the attached sinks, in emission order
    pub fn sink_kinds(&self) -> Vec<SinkKind> {
        self.sinks.iter().map(|s| s.kind()).collect()
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Check whether a record at `level` would be emitted
    pub fn is_enabled_for(&self, level: Level) -> bool {
        level >= self.level
    }

    /// Emit a fully built record
    ///
    /// Write failures are reported through `tracing` and the remaining sinks
    /// still receive the line.
    pub fn log_record(&self, record: &LogRecord) {
        if !self.is_enabled_for(record.level) {
            return;
        }

        let line = self.formatter.format(record);
        for sink in &self.sinks {
            if let Err(e) = sink.emit(&line) {
                tracing::warn!(
                    logger = %self.name,
                    sink = ?sink.kind(),
                    error = %e,
                    "Failed to write log line"
                );
            }
        }
    }

    pub fn log(&self, level: Level, message: impl Into<String>) {
        self.log_with(level, message, Overrides::default());
    }

    /// Log with per-record overrides
    pub fn log_with(&self, level: Level, message: impl Into<String>, overrides: Overrides) {
        if !self.is_enabled_for(level) {
            return;
        }
        let record = LogRecord::new(level, self.name.as_str(), message).with_overrides(overrides);
        self.log_record(&record);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(Level::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    pub fn critical(&self, message: impl Into<String>) {
        self.log(Level::Critical, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("propagate", &self.propagate)
            .field("sinks", &self.sink_kinds())
            .finish()
    }
}

/// Log through a [`Logger`] with `format!` arguments, recording the call site.
///
/// ```ignore
/// logger_log!(logger, Level::Info, "served {} requests", count);
/// logger_log!(logger, Level::Info, overrides = Overrides::new().name("api"); "ready");
/// ```
#[macro_export]
macro_rules! logger_log {
    ($logger:expr, $lvl:expr, overrides = $ov:expr; $($arg:tt)+) => {{
        let __logger = &$logger;
        let __lvl = $lvl;
        if __logger.is_enabled_for(__lvl) {
            let __record = $crate::LogRecord::new(__lvl, __logger.name(), format!($($arg)+))
                .with_location(file!(), module_path!(), line!())
                .with_overrides($ov);
            __logger.log_record(&__record);
        }
    }};
    ($logger:expr, $lvl:expr, $($arg:tt)+) => {{
        let __logger = &$logger;
        let __lvl = $lvl;
        if __logger.is_enabled_for(__lvl) {
            let __record = $crate::LogRecord::new(__lvl, __logger.name(), format!($($arg)+))
                .with_location(file!(), module_path!(), line!());
            __logger.log_record(&__record);
        }
    }};
}

#[macro_export]
macro_rules! logger_debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logger_log!($logger, $crate::Level::Debug, $($arg)+)
    };
}
#[macro_export]
macro_rules! logger_info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logger_log!($logger, $crate::Level::Info, $($arg)+)
    };
}
#[macro_export]
macro_rules! logger_warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logger_log!($logger, $crate::Level::Warning, $($arg)+)
    };
}
#[macro_export]
macro_rules! logger_error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logger_log!($logger, $crate::Level::Error, $($arg)+)
    };
}
#[macro_export]
macro_rules! logger_critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::logger_log!($logger, $crate::Level::Critical, $($arg)+)
    };
}
