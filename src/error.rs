//! Error types for react-migrate.
//!
//! All operations return `Result<T>` which aliases `Result<T, MigrateError>`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from migration operations.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Target version outside the supported set.
    #[error("Unsupported target version '{0}' (expected one of 17, 18, 19)")]
    UnsupportedVersion(String),

    /// No `package.json` at the project root.
    #[error("package.json not found at {0}")]
    ManifestNotFound(PathBuf),

    /// Manifest has no `react` entry in dependencies or devDependencies.
    #[error("React is not listed in dependencies or devDependencies")]
    FrameworkMissing,

    /// Manifest exists but is not an object with dependency maps.
    #[error("Invalid package.json: {0}")]
    InvalidManifest(String),

    /// Invalid `--files` pattern.
    #[error("Invalid file filter '{0}': {1}")]
    InvalidFilter(String, String),

    /// No snapshot with the requested id.
    #[error("Backup '{0}' not found")]
    BackupNotFound(String),

    /// Restoring a snapshot failed part-way.
    #[error("Rollback failed: {0}")]
    RollbackFailed(String),

    /// File system operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON parse or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation failed (indicates bug).
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Directory traversal failed.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// Unexpected error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for react-migrate operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
