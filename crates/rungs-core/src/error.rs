//! Error types for rungs-core

use thiserror::Error;

/// Core error type for rungs
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: IO error with file path context
    #[error("[E004] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// F001: Migration filename does not follow the naming grammar
    #[error("[F001] Invalid migration file name \"{name}\": {reason}")]
    InvalidFileName { name: String, reason: String },
}

impl CoreError {
    /// Build an [`CoreError::InvalidFileName`] for `name`
    pub(crate) fn file_name(name: &str, reason: impl Into<String>) -> Self {
        CoreError::InvalidFileName {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Build an [`CoreError::IoWithPath`] for `path`
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        CoreError::IoWithPath {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
