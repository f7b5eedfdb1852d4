//! Generation pipeline errors.

use std::path::PathBuf;

/// Errors that abort generation (boundary or filesystem faults outside the
/// per-unit isolation scope).
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// Requested module is not registered.
    #[error(transparent)]
    UnknownModule(#[from] uatk_units::UnknownModule),

    /// Work directory could not be created.
    #[error("cannot create work directory {path}: {detail}")]
    WorkDir { path: PathBuf, detail: String },

    /// An artifact could not be written.
    #[error("cannot write {path}: {detail}")]
    Write { path: PathBuf, detail: String },

    /// Manifest serialization failed.
    #[error("manifest serialization failed: {0}")]
    ManifestSerialize(#[from] toml::ser::Error),

    /// Manifest artifact could not be read back.
    #[error("manifest parse error in {path}: {detail}")]
    ManifestParse { path: PathBuf, detail: String },
}

/// Result type alias for generation operations.
pub type Result<T> = std::result::Result<T, GenError>;
