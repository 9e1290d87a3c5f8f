//! The ordered, precedence-defining list of property sources.
//!
//! The chain is edited during bootstrap only. Afterwards it is shared
//! read-only with any number of [`Resolver`](crate::Resolver)s.

use std::sync::Arc;

use tracing::debug;

use crate::error::{ChainError, ChainResult};
use crate::source::ConfigurationPropertySource;

/// Ordered sources; the first source that has a value wins.
///
/// Adding a source whose name is already present first removes the old
/// entry, so repeating an identical edit leaves the chain unchanged.
#[derive(Debug, Default, Clone)]
pub struct SourceChain {
    sources: Vec<Arc<ConfigurationPropertySource>>,
}

impl SourceChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns `true` if the chain has no sources.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Iterates sources in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ConfigurationPropertySource>> {
        self.sources.iter()
    }

    /// Returns the source names in precedence order.
    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Returns the named source.
    pub fn get(&self, name: &str) -> Option<&Arc<ConfigurationPropertySource>> {
        self.sources.iter().find(|s| s.name() == name)
    }

    /// Returns `true` if a source with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns the position of the named source.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.sources.iter().position(|s| s.name() == name)
    }

    /// Adds a source with the highest precedence.
    pub fn add_first(&mut self, source: impl Into<Arc<ConfigurationPropertySource>>) {
        let source = source.into();
        self.remove_existing(source.name());
        debug!(source = %source.name(), "Adding property source first");
        self.sources.insert(0, source);
    }

    /// Adds a source with the lowest precedence.
    pub fn add_last(&mut self, source: impl Into<Arc<ConfigurationPropertySource>>) {
        let source = source.into();
        self.remove_existing(source.name());
        debug!(source = %source.name(), "Adding property source last");
        self.sources.push(source);
    }

    /// Adds a source immediately before `anchor`.
    pub fn insert_before(
        &mut self,
        anchor: &str,
        source: impl Into<Arc<ConfigurationPropertySource>>,
    ) -> ChainResult<()> {
        let source = source.into();
        let index = self.prepare_relative(anchor, &source)?;
        debug!(source = %source.name(), anchor, "Inserting property source before anchor");
        self.sources.insert(index, source);
        Ok(())
    }

    /// Adds a source immediately after `anchor`.
    pub fn insert_after(
        &mut self,
        anchor: &str,
        source: impl Into<Arc<ConfigurationPropertySource>>,
    ) -> ChainResult<()> {
        let source = source.into();
        let index = self.prepare_relative(anchor, &source)?;
        debug!(source = %source.name(), anchor, "Inserting property source after anchor");
        self.sources.insert(index + 1, source);
        Ok(())
    }

    /// Replaces the named source in place, returning the old one.
    ///
    /// Another entry already named like the replacement is dropped, so names
    /// stay unique.
    pub fn replace(
        &mut self,
        name: &str,
        source: impl Into<Arc<ConfigurationPropertySource>>,
    ) -> ChainResult<Arc<ConfigurationPropertySource>> {
        if self.position(name).is_none() {
            return Err(ChainError::SourceNotFound(name.to_string()));
        }
        let source = source.into();
        if source.name() != name {
            self.remove_existing(source.name());
        }
        let index = self
            .position(name)
            .ok_or_else(|| ChainError::SourceNotFound(name.to_string()))?;
        debug!(old = name, new = %source.name(), "Replacing property source");
        Ok(std::mem::replace(&mut self.sources[index], source))
    }

    /// Removes the named source. Removing an unknown name is a no-op.
    pub fn remove(&mut self, name: &str) -> Option<Arc<ConfigurationPropertySource>> {
        let index = self.position(name)?;
        debug!(source = name, "Removing property source");
        Some(self.sources.remove(index))
    }

    /// Validates the anchor, drops any previous entry with the new source's
    /// name and returns the anchor's resulting position.
    fn prepare_relative(
        &mut self,
        anchor: &str,
        source: &ConfigurationPropertySource,
    ) -> ChainResult<usize> {
        if source.name() == anchor {
            return Err(ChainError::RelativeToSelf(anchor.to_string()));
        }
        if !self.contains(anchor) {
            return Err(ChainError::SourceNotFound(anchor.to_string()));
        }
        self.remove_existing(source.name());
        self.position(anchor)
            .ok_or_else(|| ChainError::SourceNotFound(anchor.to_string()))
    }

    fn remove_existing(&mut self, name: &str) {
        self.sources.retain(|s| s.name() != name);
    }
}

impl<S: Into<Arc<ConfigurationPropertySource>>> FromIterator<S> for SourceChain {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut chain = Self::new();
        for source in iter {
            chain.add_last(source);
        }
        chain
    }
}

impl<'a> IntoIterator for &'a SourceChain {
    type Item = &'a Arc<ConfigurationPropertySource>;
    type IntoIter = std::slice::Iter<'a, Arc<ConfigurationPropertySource>>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::DottedMapper;
    use crate::source::MapProvider;

    fn source(name: &str) -> ConfigurationPropertySource {
        ConfigurationPropertySource::new(MapProvider::new(name), DottedMapper)
    }

    fn chain(names: &[&str]) -> SourceChain {
        names.iter().map(|n| source(n)).collect()
    }

    #[test]
    fn test_add_first_and_last() {
        let mut chain = chain(&["b"]);
        chain.add_first(source("a"));
        chain.add_last(source("c"));
        assert_eq!(chain.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_insert_before_and_after() {
        let mut chain = chain(&["a", "b", "c"]);
        chain.insert_before("b", source("x")).unwrap();
        assert_eq!(chain.names(), vec!["a", "x", "b", "c"]);
        chain.insert_after("b", source("y")).unwrap();
        assert_eq!(chain.names(), vec!["a", "x", "b", "y", "c"]);
        chain.insert_after("c", source("z")).unwrap();
        assert_eq!(chain.names(), vec!["a", "x", "b", "y", "c", "z"]);
    }

    #[test]
    fn test_repeated_insert_is_idempotent() {
        let mut chain = chain(&["a", "b", "c"]);
        chain.insert_before("c", source("x")).unwrap();
        chain.insert_before("c", source("x")).unwrap();
        assert_eq!(chain.names(), vec!["a", "b", "x", "c"]);
        chain.add_first(source("a"));
        chain.add_first(source("a"));
        assert_eq!(chain.names(), vec!["a", "b", "x", "c"]);
    }

    #[test]
    fn test_insert_moves_existing_entry() {
        let mut chain = chain(&["a", "b", "c"]);
        chain.insert_after("c", source("a")).unwrap();
        assert_eq!(chain.names(), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_unknown_anchor_fails() {
        let mut chain = chain(&["a"]);
        assert_eq!(
            chain.insert_before("missing", source("x")),
            Err(ChainError::SourceNotFound("missing".into()))
        );
        assert_eq!(
            chain.insert_after("missing", source("x")),
            Err(ChainError::SourceNotFound("missing".into()))
        );
        assert_eq!(chain.names(), vec!["a"]);
    }

    #[test]
    fn test_relative_to_self_fails() {
        let mut chain = chain(&["a", "b"]);
        assert_eq!(
            chain.insert_before("a", source("a")),
            Err(ChainError::RelativeToSelf("a".into()))
        );
        assert_eq!(chain.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut chain = chain(&["a", "b"]);
        assert!(chain.remove("a").is_some());
        assert!(chain.remove("a").is_none());
        assert!(chain.remove("never").is_none());
        assert_eq!(chain.names(), vec!["b"]);
    }

    #[test]
    fn test_replace() {
        let mut chain = chain(&["a", "b", "c"]);
        let old = chain.replace("b", source("b2")).unwrap();
        assert_eq!(old.name(), "b");
        assert_eq!(chain.names(), vec!["a", "b2", "c"]);
        assert!(matches!(
            chain.replace("b", source("b3")),
            Err(ChainError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_replace_drops_duplicate_name() {
        let mut chain = chain(&["a", "b", "c"]);
        let old = chain.replace("b", source("c")).unwrap();
        assert_eq!(old.name(), "b");
        assert_eq!(chain.names(), vec!["a", "c"]);

        chain.remove("c");
        assert_eq!(chain.names(), vec!["a"]);
        assert!(!chain.contains("c"));
    }
}
