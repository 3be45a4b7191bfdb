//! Severity levels
//!
//! Levels are ordered so that filtering is a plain comparison against the
//! logger's configured minimum.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

/// Severity of a log record
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    #[default]
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    /// All levels, lowest severity first
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    /// Get the display name for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// Numeric severity (10, 20, 30, 40, 50)
    pub fn value(&self) -> u8 {
        match self {
            Level::Debug => 10,
            Level::Info => 20,
            Level::Warning => 30,
            Level::Error => 40,
            Level::Critical => 50,
        }
    }

    /// Look up a level by its numeric severity
    pub fn from_value(value: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|l| u64::from(l.value()) == value)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a level
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level: {0:?}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<u64>() {
            return Level::from_value(value).ok_or_else(|| ParseLevelError(s.to_string()));
        }

        match trimmed.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARNING" | "WARN" => Ok(Level::Warning),
            "ERROR" => Ok(Level::Error),
            "CRITICAL" | "FATAL" => Ok(Level::Critical),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warning,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

// Accepts either a name ("warning") or a number (30).
impl<'de> Deserialize<'de> for Level {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LevelVisitor;

        impl<'de> Visitor<'de> for LevelVisitor {
            type Value = Level;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a level name or numeric severity")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Level, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Level, E> {
                Level::from_value(v).ok_or_else(|| E::custom(ParseLevelError(v.to_string())))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Level, E> {
                u64::try_from(v)
                    .ok()
                    .and_then(Level::from_value)
                    .ok_or_else(|| E::custom(ParseLevelError(v.to_string())))
            }
        }

        deserializer.deserialize_any(LevelVisitor)
    }
}

pub const DEBUG: Level = Level::Debug;
pub const INFO: Level = Level::Info;
pub const WARNING: Level = Level::Warning;
pub const ERROR: Level = Level::Error;
pub const CRITICAL: Level = Level::Critical;
