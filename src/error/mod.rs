//! Error handling module for SplitClip

use thiserror::Error;

use crate::domain::errors::ExportError;

/// Main error type for SplitClip operations outside a single export job
#[derive(Error, Debug)]
pub enum SplitClipError {
    /// Input file not found or inaccessible
    #[error("Input file not found: {path}")]
    InputFileNotFound { path: String },

    /// Invalid time format supplied on the command line
    #[error("Invalid time format: {time}. Expected HH:MM:SS.ms, MM:SS.ms, or seconds")]
    InvalidTimeFormat { time: String },

    /// Media probe error
    #[error("Failed to probe media file: {message}")]
    ProbeError { message: String },

    /// Configuration error
    #[error("Invalid configuration: {message}")]
    ConfigError { message: String },

    /// Planning or export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parse error
    #[error("Failed to parse config file: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for SplitClip operations
pub type SplitClipResult<T> = std::result::Result<T, SplitClipError>;
