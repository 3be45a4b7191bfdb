//! Logger factory options and the convenience entry point

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;
use crate::level::Level;
use crate::logger::LoggerHandle;
use crate::registry::LoggerRegistry;

/// Name used when none is given
pub const DEFAULT_LOGGER_NAME: &str = env!("CARGO_PKG_NAME");

/// Directory log files go into when none is given
pub const DEFAULT_LOG_SUB_DIR: &str = "logs";

/// Extension appended to the file name
pub const LOG_FILE_EXTENSION: &str = "log";

/// How to configure a logger on first creation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerOptions {
    /// Registry key and the name rendered in each line
    pub name: String,

    /// Minimum level emitted (default: DEBUG)
    pub level: Level,

    /// File name without extension; no file sink when absent or empty
    pub file_name: Option<String>,

    /// Directory holding the log file, created if missing (default: "logs")
    pub log_sub_dir: PathBuf,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_LOGGER_NAME.to_string(),
            level: Level::default(),
            file_name: None,
            log_sub_dir: PathBuf::from(DEFAULT_LOG_SUB_DIR),
        }
    }
}

impl LoggerOptions {
    /// Options for `name` with every other field at its default
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn log_sub_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_sub_dir = dir.into();
        self
    }

    /// Directory for the log file, with a leading `~` expanded
    pub fn log_dir(&self) -> PathBuf {
        let raw = self.log_sub_dir.to_string_lossy();
        match shellexpand::tilde(&raw) {
            Cow::Borrowed(_) => self.log_sub_dir.clone(),
            Cow::Owned(expanded) => PathBuf::from(expanded),
        }
    }

    /// Full path of the log file, or `None` for console-only loggers
    pub fn log_file_path(&self) -> Option<PathBuf> {
        let file_name = self.file_name.as_deref().filter(|f| !f.is_empty())?;
        Some(
            self.log_dir()
                .join(format!("{}.{}", file_name, LOG_FILE_EXTENSION)),
        )
    }
}

/// Get or configure the logger called `name` in the process-wide registry
///
/// The first call for a name creates `<log_sub_dir>/<file_name>.log` when a
/// file name is given and attaches a console sink. Later calls return the
/// same handle unchanged, ignoring their other arguments.
pub fn get_logger(
    name: &str,
    level: Level,
    file_name: Option<&str>,
    log_sub_dir: impl AsRef<Path>,
) -> Result<LoggerHandle> {
    let options = LoggerOptions {
        name: name.to_string(),
        level,
        file_name: file_name.map(str::to_string),
        log_sub_dir: log_sub_dir.as_ref().to_path_buf(),
    };
    LoggerRegistry::global().get_logger(&options)
}
