//! Error types for the resolution engine.
//!
//! Only programmer errors propagate out of the engine: malformed canonical
//! names and structural chain edits against unknown anchors. Mapping failures
//! and provider failures are isolated to the source that produced them.

use thiserror::Error;

/// Errors raised while parsing or building a [`PropertyName`](crate::PropertyName).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// The name is empty, has an empty element, or has unbalanced brackets.
    #[error("Malformed configuration property name '{name}': {reason}")]
    Malformed {
        /// The offending input.
        name: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl NameError {
    /// Creates a malformed name error.
    pub fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for name operations.
pub type NameResult<T> = Result<T, NameError>;

/// Errors raised by structural edits of a [`SourceChain`](crate::SourceChain).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// The anchor source of an edit is not part of the chain.
    #[error("Property source not found: {0}")]
    SourceNotFound(String),

    /// A source was positioned relative to itself.
    #[error("Property source '{0}' cannot be added relative to itself")]
    RelativeToSelf(String),
}

/// Result type for chain edits.
pub type ChainResult<T> = Result<T, ChainError>;

/// A failure while mapping between canonical names and raw keys, or while
/// extracting a value. Always converted to absence at the source boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingFailure {
    /// A raw key has no canonical counterpart in the dialect.
    #[error("Raw key '{key}' cannot be mapped: {reason}")]
    UnmappableKey { key: String, reason: String },

    /// A canonical name cannot be expressed in the dialect.
    #[error("Name '{name}' cannot be mapped: {reason}")]
    UnmappableName { name: String, reason: String },

    /// The value extractor rejected the stored value.
    #[error("Value of '{key}' could not be extracted: {reason}")]
    Extraction { key: String, reason: String },
}

impl MappingFailure {
    /// Creates an unmappable key failure.
    pub fn key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnmappableKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Creates an extraction failure.
    pub fn extraction(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Extraction {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for mapping operations.
pub type MappingResult<T> = Result<T, MappingFailure>;

/// Returned by a [`RawPropertyProvider`](crate::RawPropertyProvider) whose
/// lookup failed unexpectedly. The resolver skips the failing source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider cannot serve lookups at all right now.
    #[error("Property provider unavailable: {0}")]
    Unavailable(String),

    /// A lookup of a single raw key failed.
    #[error("Lookup of '{key}' failed: {reason}")]
    Lookup { key: String, reason: String },
}

impl ProviderError {
    /// Creates a lookup error for the given raw key.
    pub fn lookup(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Lookup {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for provider lookups.
pub type ProviderResult<T> = Result<T, ProviderError>;
