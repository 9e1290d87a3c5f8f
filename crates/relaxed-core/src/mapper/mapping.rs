//! A single raw-key candidate produced by a [`PropertyMapper`](super::PropertyMapper).

use std::fmt;
use std::sync::Arc;

use crate::error::MappingResult;
use crate::name::PropertyName;
use crate::property::PropertyValue;

/// Decides whether a mapping can answer a given canonical name.
pub type Applicability = Arc<dyn Fn(&PropertyName) -> bool + Send + Sync>;

/// Turns a raw stored value into the value handed to consumers.
pub type ValueExtractor = Arc<dyn Fn(&PropertyValue) -> MappingResult<PropertyValue> + Send + Sync>;

/// One raw-key candidate for a canonical name.
///
/// Without an explicit applicability predicate a mapping applies exactly to
/// names equal to its own; without an extractor values pass through unchanged.
#[derive(Clone)]
pub struct PropertyMapping {
    key: String,
    name: PropertyName,
    applicability: Option<Applicability>,
    extractor: Option<ValueExtractor>,
}

impl PropertyMapping {
    /// Creates a mapping from raw `key` to `name`.
    pub fn new(key: impl Into<String>, name: PropertyName) -> Self {
        Self {
            key: key.into(),
            name,
            applicability: None,
            extractor: None,
        }
    }

    /// Replaces the applicability predicate.
    pub fn with_applicability<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&PropertyName) -> bool + Send + Sync + 'static,
    {
        self.applicability = Some(Arc::new(predicate));
        self
    }

    /// Replaces the value extractor.
    pub fn with_extractor<F>(mut self, extractor: F) -> Self
    where
        F: Fn(&PropertyValue) -> MappingResult<PropertyValue> + Send + Sync + 'static,
    {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    /// The raw key in the underlying provider.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The canonical name this mapping was produced for.
    pub fn name(&self) -> &PropertyName {
        &self.name
    }

    /// Returns `true` if this mapping can answer `name`.
    pub fn is_applicable(&self, name: &PropertyName) -> bool {
        match &self.applicability {
            Some(predicate) => predicate(name),
            None => &self.name == name,
        }
    }

    /// Runs the value extractor.
    pub fn extract(&self, value: &PropertyValue) -> MappingResult<PropertyValue> {
        match &self.extractor {
            Some(extractor) => extractor(value),
            None => Ok(value.clone()),
        }
    }
}

impl fmt::Debug for PropertyMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMapping")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("custom_applicability", &self.applicability.is_some())
            .field("custom_extractor", &self.extractor.is_some())
            .finish()
    }
}

impl PartialEq for PropertyMapping {
    /// Mappings compare by key and name; closures are not comparable.
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.name == other.name
    }
}
