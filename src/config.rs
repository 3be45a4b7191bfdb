//! TOML configuration for logger options
//!
//! ```toml
//! name = "worker"
//! level = "warning"
//! file_name = "worker"
//! log_sub_dir = "~/.worker/logs"
//! ```
//!
//! Every key is optional and falls back to the [`LoggerOptions`] defaults.

use std::path::Path;

use crate::error::{LoggerError, Result};
use crate::factory::LoggerOptions;

impl LoggerOptions {
    /// Parse options from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load options from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LoggerError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
