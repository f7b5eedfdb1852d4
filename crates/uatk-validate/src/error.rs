//! Validation pipeline errors.

use std::path::PathBuf;

/// Errors that abort validation (boundary or report-artifact faults; a
/// per-unit log problem never lands here).
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// Requested module is not registered.
    #[error(transparent)]
    UnknownModule(#[from] uatk_units::UnknownModule),

    /// Reports directory could not be created.
    #[error("cannot create reports directory {path}: {detail}")]
    ReportsDir { path: PathBuf, detail: String },

    /// A report artifact could not be written.
    #[error("cannot write report {path}: {detail}")]
    ReportWrite { path: PathBuf, detail: String },

    /// Report serialization failed.
    #[error("report serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for validation operations.
pub type Result<T> = std::result::Result<T, ValidateError>;
