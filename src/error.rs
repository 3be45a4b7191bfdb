//! Error type for logger configuration

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while configuring a logger
///
/// Logging itself never returns an error; only setup can fail.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// The log directory could not be created
    #[error("Failed to create log directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The log file could not be opened for appending
    #[error("Failed to open log file {}: {source}", .path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file could not be read
    #[error("Failed to read config file {}: {source}", .path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid
    #[error("Failed to parse config: {0}")]
    ParseConfig(#[from] toml::de::Error),
}

impl LoggerError {
    /// The underlying IO error, if this failure came from the filesystem
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            LoggerError::CreateDir { source, .. }
            | LoggerError::OpenFile { source, .. }
            | LoggerError::ReadConfig { source, .. } => Some(source),
            LoggerError::ParseConfig(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LoggerError>;
