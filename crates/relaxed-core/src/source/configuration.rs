//! [`ConfigurationPropertySource`]: one provider seen through one mapper.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use super::{Capability, Containment, RawPropertyProvider};
use crate::error::ProviderResult;
use crate::mapper::{PropertyMapper, PropertyMapping};
use crate::name::PropertyName;
use crate::property::{ConfigurationProperty, Origin};

/// Raw keys of an enumerable provider indexed by their canonical names.
#[derive(Debug, Default)]
struct ReverseIndex {
    keys_by_name: HashMap<PropertyName, Vec<String>>,
}

impl ReverseIndex {
    fn build(provider: &dyn RawPropertyProvider, mapper: &dyn PropertyMapper) -> Self {
        let mut keys_by_name: HashMap<PropertyName, Vec<String>> = HashMap::new();
        for key in provider.keys() {
            if let Some(name) = mapper.map_to_name(&key) {
                keys_by_name.entry(name).or_default().push(key);
            }
        }
        Self { keys_by_name }
    }
}

/// Answers "does this source have a value for this canonical name".
///
/// Lookups try the mapper's candidates in order. Enumerable sources then fall
/// back to a reverse index of every raw key, so any spelling that is equal
/// under the uniform form is found. Mapping and extraction failures count as
/// absence; only provider failures are reported to the caller.
pub struct ConfigurationPropertySource {
    name: String,
    provider: Arc<dyn RawPropertyProvider>,
    mapper: Arc<dyn PropertyMapper>,
    capability: Capability,
    derived_from: Option<String>,
    reverse: RwLock<Option<Arc<ReverseIndex>>>,
}

impl ConfigurationPropertySource {
    /// Wraps `provider`, using the provider's own name and capability.
    pub fn new<P, M>(provider: P, mapper: M) -> Self
    where
        P: RawPropertyProvider + 'static,
        M: PropertyMapper + 'static,
    {
        Self::from_shared(Arc::new(provider), Arc::new(mapper))
    }

    /// Wraps an already shared provider and mapper.
    pub fn from_shared(
        provider: Arc<dyn RawPropertyProvider>,
        mapper: Arc<dyn PropertyMapper>,
    ) -> Self {
        Self {
            name: provider.name().to_string(),
            capability: provider.capability(),
            provider,
            mapper,
            derived_from: None,
            reverse: RwLock::new(None),
        }
    }

    /// Overrides the name the source is addressed by in a chain.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Forces the lookup-only capability, for providers whose enumeration is
    /// forbidden or unsafe.
    pub fn restricted(mut self) -> Self {
        self.capability = Capability::LookupOnly;
        self
    }

    /// Marks this source as generated from the source named `origin`.
    pub fn derived_from(mut self, origin: impl Into<String>) -> Self {
        self.derived_from = Some(origin.into());
        self
    }

    /// The source this one was generated from, if any.
    pub fn origin_source(&self) -> Option<&str> {
        self.derived_from.as_deref()
    }

    /// The name of this source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The capability this source exposes.
    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// The underlying provider.
    pub fn provider(&self) -> &Arc<dyn RawPropertyProvider> {
        &self.provider
    }

    /// The mapper used by this source.
    pub fn mapper(&self) -> &Arc<dyn PropertyMapper> {
        &self.mapper
    }

    /// Looks up `name`. `Ok(None)` means the source has no value for it.
    pub fn get_configuration_property(
        &self,
        name: &PropertyName,
    ) -> ProviderResult<Option<ConfigurationProperty>> {
        let candidates = self.mapper.map_to_source_candidates(name);
        if let Some(property) = self.find(&candidates, name)? {
            return Ok(Some(property));
        }

        if self.capability == Capability::Enumerable {
            let index = self.reverse_index();
            if let Some(keys) = index.keys_by_name.get(name) {
                let mappings: Vec<_> = keys
                    .iter()
                    .filter(|key| !candidates.iter().any(|c| c.key() == key.as_str()))
                    .map(|key| PropertyMapping::new(key.clone(), name.clone()))
                    .collect();
                return self.find(&mappings, name);
            }
        }
        Ok(None)
    }

    /// Reports whether any raw key maps to a descendant of `name`.
    ///
    /// Lookup-only sources always answer [`Containment::Unknown`].
    pub fn contains_descendant_of(&self, name: &PropertyName) -> Containment {
        if self.capability == Capability::LookupOnly {
            return Containment::Unknown;
        }
        let index = self.reverse_index();
        if index
            .keys_by_name
            .keys()
            .any(|candidate| name.is_ancestor_of(candidate))
        {
            Containment::Present
        } else {
            Containment::Absent
        }
    }

    /// Lists the canonical names of every mappable raw key.
    ///
    /// Returns `None` for lookup-only sources.
    pub fn property_names(&self) -> Option<Vec<PropertyName>> {
        if self.capability == Capability::LookupOnly {
            return None;
        }
        let mut names: Vec<_> = self.reverse_index().keys_by_name.keys().cloned().collect();
        names.sort();
        Some(names)
    }

    /// Drops the cached reverse index so the next query re-enumerates keys.
    pub fn refresh(&self) {
        *self.reverse.write() = None;
    }

    fn reverse_index(&self) -> Arc<ReverseIndex> {
        if let Some(index) = self.reverse.read().as_ref() {
            return Arc::clone(index);
        }
        let index = Arc::new(ReverseIndex::build(
            self.provider.as_ref(),
            self.mapper.as_ref(),
        ));
        *self.reverse.write() = Some(Arc::clone(&index));
        index
    }

    fn find(
        &self,
        mappings: &[PropertyMapping],
        name: &PropertyName,
    ) -> ProviderResult<Option<ConfigurationProperty>> {
        for mapping in mappings.iter().filter(|m| m.is_applicable(name)) {
            let Some(raw) = self.provider.get(mapping.key())? else {
                continue;
            };
            let value = match mapping.extract(&raw) {
                Ok(value) => value,
                Err(error) => {
                    trace!(source = %self.name, key = mapping.key(), %error, "Value extraction failed");
                    continue;
                }
            };
            let origin = self
                .provider
                .origin(mapping.key())
                .unwrap_or_else(|| Origin::new(self.name.clone(), mapping.key()));
            return Ok(Some(ConfigurationProperty::new(name.clone(), value, origin)));
        }
        Ok(None)
    }
}

impl fmt::Debug for ConfigurationPropertySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurationPropertySource")
            .field("name", &self.name)
            .field("dialect", &self.mapper.dialect())
            .field("capability", &self.capability)
            .field("derived_from", &self.derived_from)
            .finish()
    }
}
