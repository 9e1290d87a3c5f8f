//! Runtime error types.

use std::path::PathBuf;

use relaxed_core::ChainError;
use thiserror::Error;

/// Errors that can occur while building a source chain from the environment
/// and configuration files.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// An explicitly requested file does not exist.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// The file extension is unknown or its format feature is disabled.
    #[error("Unsupported or disabled configuration file format: {0}")]
    UnsupportedFormat(PathBuf),

    /// The file could not be parsed.
    #[error("Failed to parse configuration file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// A chain edit failed.
    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl LoaderError {
    /// Creates a parse error.
    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for loader operations.
pub type LoaderResult<T> = Result<T, LoaderError>;
