//! In-memory, enumerable provider.

use std::collections::BTreeMap;

use super::{Capability, RawPropertyProvider};
use crate::error::ProviderResult;
use crate::property::{Origin, PropertyValue, TextLocation};

#[derive(Debug, Clone)]
struct Entry {
    value: PropertyValue,
    origin: Option<Origin>,
}

/// An enumerable provider backed by an in-memory map of raw keys.
///
/// Used for programmatic defaults and overrides, for already parsed files and
/// for the synthetic sources produced by migration.
#[derive(Debug, Clone)]
pub struct MapProvider {
    name: String,
    entries: BTreeMap<String, Entry>,
}

impl MapProvider {
    /// Creates an empty provider.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Adds an entry, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds an entry located at `location` inside this provider's resource.
    pub fn with_location(
        mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
        location: TextLocation,
    ) -> Self {
        let key = key.into();
        let origin = Origin::new(self.name.clone(), key.clone()).with_location(location);
        self.insert_with_origin(key, value, origin);
        self
    }

    /// Inserts or replaces an entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.entries.insert(
            key.into(),
            Entry {
                value: value.into(),
                origin: None,
            },
        );
    }

    /// Inserts or replaces an entry carrying an explicit origin.
    pub fn insert_with_origin(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
        origin: Origin,
    ) {
        self.entries.insert(
            key.into(),
            Entry {
                value: value.into(),
                origin: Some(origin),
            },
        );
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the provider holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RawPropertyProvider for MapProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> ProviderResult<Option<PropertyValue>> {
        Ok(self.entries.get(key).map(|entry| entry.value.clone()))
    }

    fn capability(&self) -> Capability {
        Capability::Enumerable
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn origin(&self, key: &str) -> Option<Origin> {
        self.entries.get(key).and_then(|entry| entry.origin.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_provider_lookup_and_keys() {
        let provider = MapProvider::new("defaults")
            .with("server.port", 8080)
            .with("server.address", "0.0.0.0");
        assert_eq!(provider.len(), 2);
        assert_eq!(
            provider.get("server.port").unwrap(),
            Some(PropertyValue::Integer(8080))
        );
        assert_eq!(provider.get("missing").unwrap(), None);
        assert_eq!(provider.keys(), vec!["server.address", "server.port"]);
        assert_eq!(provider.capability(), Capability::Enumerable);
    }

    #[test]
    fn test_explicit_origins() {
        let provider =
            MapProvider::new("application.properties").with_location("a", 1, TextLocation::new(4, 1));
        let origin = provider.origin("a").unwrap();
        assert_eq!(origin.source(), "application.properties");
        assert_eq!(origin.location(), Some(TextLocation::new(4, 1)));
        assert!(provider.origin("b").is_none());
    }
}
