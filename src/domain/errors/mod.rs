// Domain errors - Error types for the export workflow

use std::path::PathBuf;

use thiserror::Error;

/// Failures a single export job can report to its caller
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    /// Requested range violates `0 <= start < end <= duration`
    #[error("Invalid range [{start}, {end}) for duration {duration}: {reason}")]
    InvalidRange {
        start: String,
        end: String,
        duration: String,
        reason: String,
    },

    /// Filesystem problem while preparing or writing the output
    #[error("I/O failure on {}: {message}", path.display())]
    IoFailure { path: PathBuf, message: String },

    /// The transcode itself failed
    #[error("Export engine failed: {reason}")]
    EngineFailure { reason: String },
}

impl ExportError {
    pub fn io(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ExportError::IoFailure {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn engine(reason: impl Into<String>) -> Self {
        ExportError::EngineFailure {
            reason: reason.into(),
        }
    }

    /// True for errors raised before any job was submitted
    pub fn is_validation(&self) -> bool {
        matches!(self, ExportError::InvalidRange { .. })
    }
}

/// Result type alias for the export workflow
pub type ExportResult<T> = std::result::Result<T, ExportError>;
