//! Unit and discovery error types.

use std::path::PathBuf;

/// Errors raised by individual generator units.
#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    /// Assembly body synthesis failed.
    #[error("synthesis failed for '{unit}': {detail}")]
    Synthesis { unit: String, detail: String },

    /// A log file could not be read during log checking.
    #[error("cannot read log {path}: {detail}")]
    LogRead { path: PathBuf, detail: String },

    /// A per-unit report could not be written.
    #[error("cannot write report {path}: {detail}")]
    ReportWrite { path: PathBuf, detail: String },

    /// Unit construction failed (malformed registration).
    #[error("unit construction failed: {detail}")]
    Construct { detail: String },
}

/// Per-unit faults observed while discovering a module's units.
///
/// Discovery never aborts on these; they are collected and reported while
/// the remaining units continue to load.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// A registered constructor failed to produce a unit.
    #[error("unit in module '{module}' failed to load: {source}")]
    Load {
        module: String,
        #[source]
        source: UnitError,
    },

    /// Two units in the same module share a name. The first registration
    /// wins; the duplicate is excluded.
    #[error("duplicate unit name '{name}' in module '{module}'")]
    DuplicateName { module: String, name: String },
}

/// Result type alias for unit operations.
pub type Result<T> = std::result::Result<T, UnitError>;
