//! Log records and per-record overrides

use chrono::{DateTime, Local};

use crate::level::Level;

/// Optional per-record replacements for fields the formatter renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Replaces the logger name
    pub name: Option<String>,
    /// Replaces the file field (not the function field)
    pub func_name: Option<String>,
    /// Replaces the file field; applied after `func_name`
    pub file_name: Option<String>,
}

impl Overrides {
    /// Create an empty set of overrides
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn func_name(mut self, func_name: impl Into<String>) -> Self {
        self.func_name = Some(func_name.into());
        self
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Check whether no override is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.func_name.is_none() && self.file_name.is_none()
    }
}

/// A single logging event
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// When the record was created
    pub timestamp: DateTime<Local>,
    /// Severity
    pub level: Level,
    /// Name of the logger that produced the record
    pub name: String,
    /// Rendered message text
    pub message: String,
    /// Source file of the call site
    pub filename: String,
    /// Function or module path of the call site
    pub func_name: String,
    /// Source line of the call site (0 when unknown)
    pub lineno: u32,
    /// Optional field replacements
    pub overrides: Overrides,
}

impl LogRecord {
    /// Create a record stamped with the current local time and no call site
    pub fn new(level: Level, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            name: name.into(),
            message: message.into(),
            filename: String::new(),
            func_name: String::new(),
            lineno: 0,
            overrides: Overrides::default(),
        }
    }

    /// Attach call-site information
    pub fn with_location(
        mut self,
        filename: impl Into<String>,
        func_name: impl Into<String>,
        lineno: u32,
    ) -> Self {
        self.filename = filename.into();
        self.func_name = func_name.into();
        self.lineno = lineno;
        self
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
