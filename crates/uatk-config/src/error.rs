//! Configuration error types.

use std::path::PathBuf;

/// Errors that can occur while loading configuration artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("cannot read {path}: {detail}")]
    Unreadable { path: PathBuf, detail: String },

    /// TOML parsing error.
    #[error("TOML parse error in {path}: {detail}")]
    Parse { path: PathBuf, detail: String },

    /// Required top-level key is missing.
    #[error("{path}: missing required key '{key}'")]
    MissingKey { path: PathBuf, key: String },

    /// A key has the wrong shape (e.g. module section is not a table).
    #[error("{path}: key '{key}' must be {expected}")]
    WrongShape {
        path: PathBuf,
        key: String,
        expected: &'static str,
    },
}

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
