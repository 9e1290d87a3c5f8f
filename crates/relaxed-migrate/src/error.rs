//! Migration error types.

use thiserror::Error;

/// Errors that can occur while loading deprecation metadata.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// Failed to read the metadata document.
    #[error("Failed to read metadata: {0}")]
    ReadError(#[from] std::io::Error),

    /// The metadata document is not valid JSON for the expected layout.
    #[error("Failed to parse metadata: {0}")]
    ParseError(#[from] serde_json::Error),

    /// A property entry has a malformed name.
    #[error("Invalid property name in metadata: {0}")]
    InvalidName(#[from] relaxed_core::NameError),
}

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;
