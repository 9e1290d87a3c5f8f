//! Memoization of mapper output.
//!
//! Mapping is pure, so a cache population race is harmless: every writer
//! computes the same candidates and the last one wins.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{Dialect, PropertyMapper, PropertyMapping};
use crate::error::MappingResult;
use crate::name::PropertyName;

/// Shared cache of candidates keyed by dialect and canonical name string.
///
/// The key is the canonical string rather than the relaxed name so that
/// different spellings of an equal name keep their own candidate lists.
#[derive(Debug, Default)]
pub struct MappingCache {
    entries: RwLock<HashMap<(Dialect, String), Arc<[PropertyMapping]>>>,
}

impl MappingCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    fn get(&self, dialect: Dialect, name: &str) -> Option<Arc<[PropertyMapping]>> {
        self.entries
            .read()
            .get(&(dialect, name.to_string()))
            .cloned()
    }

    fn insert(&self, dialect: Dialect, name: String, mappings: Arc<[PropertyMapping]>) {
        self.entries.write().insert((dialect, name), mappings);
    }
}

/// A [`PropertyMapper`] that memoizes the candidates of another mapper.
///
/// Failures are not cached. Reverse mapping is delegated unchanged.
pub struct CachingMapper<M> {
    inner: M,
    cache: Arc<MappingCache>,
}

impl<M: PropertyMapper> CachingMapper<M> {
    /// Wraps `inner` with a private cache.
    pub fn new(inner: M) -> Self {
        Self::with_cache(inner, Arc::new(MappingCache::new()))
    }

    /// Wraps `inner` with a cache shared with other mappers.
    pub fn with_cache(inner: M, cache: Arc<MappingCache>) -> Self {
        Self { inner, cache }
    }

    /// Returns the underlying cache.
    pub fn cache(&self) -> &Arc<MappingCache> {
        &self.cache
    }
}

impl<M: PropertyMapper> PropertyMapper for CachingMapper<M> {
    fn dialect(&self) -> Dialect {
        self.inner.dialect()
    }

    fn try_map_name(&self, name: &PropertyName) -> MappingResult<Vec<PropertyMapping>> {
        let dialect = self.inner.dialect();
        let key = name.to_string();
        if let Some(cached) = self.cache.get(dialect, &key) {
            return Ok(cached.to_vec());
        }
        let mappings = self.inner.try_map_name(name)?;
        self.cache.insert(dialect, key, Arc::from(mappings.as_slice()));
        Ok(mappings)
    }

    fn try_map_key(&self, key: &str) -> MappingResult<PropertyName> {
        self.inner.try_map_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::{DottedMapper, EnvironmentMapper};

    #[test]
    fn test_cached_output_matches_uncached() {
        let name = PropertyName::parse("server.context-path").unwrap();
        let cached = CachingMapper::new(DottedMapper);

        let first = cached.map_to_source_candidates(&name);
        assert_eq!(cached.cache().len(), 1);
        let second = cached.map_to_source_candidates(&name);
        assert_eq!(first, second);
        assert_eq!(first, DottedMapper.map_to_source_candidates(&name));
        assert_eq!(cached.cache().len(), 1);
    }

    #[test]
    fn test_shared_cache_separates_dialects() {
        let cache = Arc::new(MappingCache::new());
        let dotted = CachingMapper::with_cache(DottedMapper, Arc::clone(&cache));
        let env = CachingMapper::with_cache(EnvironmentMapper::new(), Arc::clone(&cache));
        let name = PropertyName::parse("server.port").unwrap();

        let dotted_keys = dotted.map_to_source_candidates(&name);
        let env_keys = env.map_to_source_candidates(&name);
        assert_eq!(dotted_keys[0].key(), "server.port");
        assert_eq!(env_keys[0].key(), "SERVER_PORT");
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_spellings_are_cached_separately() {
        let cached = CachingMapper::new(DottedMapper);
        let kebab = PropertyName::parse("server.context-path").unwrap();
        let flat = PropertyName::parse("server.contextpath").unwrap();
        assert_eq!(kebab, flat);

        cached.map_to_source_candidates(&kebab);
        let flat_keys = cached.map_to_source_candidates(&flat);
        assert_eq!(flat_keys[0].key(), "server.contextpath");
        assert_eq!(cached.cache().len(), 2);
    }
}
