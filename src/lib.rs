//! namedlog - named loggers with console and optional file output
//!
//! [`get_logger`] returns one shared logger per name. The first call for a
//! name configures it (level, an optional `<dir>/<file>.log` sink and a console
//! sink); later calls return the same handle untouched.
//!
//! ```no_run
//! use namedlog::{get_logger, INFO};
//!
//! # fn main() -> namedlog::Result<()> {
//! let logger = get_logger("app", INFO, Some("app"), "logs")?;
//! logger.info("started");
//! namedlog::logger_warning!(logger, "{} retries left", 2);
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod factory;
pub mod formatter;
pub mod level;
pub mod logger;
pub mod record;
pub mod registry;
pub mod sink;

pub use bridge::LoggerLayer;
pub use error::{LoggerError, Result};
pub use factory::{get_logger, LoggerOptions};
pub use formatter::Formatter;
pub use level::{Level, CRITICAL, DEBUG, ERROR, INFO, WARNING};
pub use logger::{Logger, LoggerHandle};
pub use record::{LogRecord, Overrides};
pub use registry::LoggerRegistry;
pub use sink::{ConsoleSink, FileSink, Sink, SinkKind};
