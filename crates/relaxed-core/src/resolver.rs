//! The read facade over a [`SourceChain`].

use tracing::warn;

use crate::chain::SourceChain;
use crate::error::NameResult;
use crate::name::PropertyName;
use crate::property::ConfigurationProperty;
use crate::source::Containment;

/// Resolves names against a chain, front to back, first match wins.
///
/// A source whose provider fails is skipped and resolution carries on with
/// the next one, so one broken source cannot hide the others. Resolution
/// stops at the first match; later sources are never queried.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    chain: &'a SourceChain,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over `chain`.
    pub fn new(chain: &'a SourceChain) -> Self {
        Self { chain }
    }

    /// The chain this resolver reads.
    pub fn chain(&self) -> &'a SourceChain {
        self.chain
    }

    /// Returns the first property any source supplies for `name`.
    pub fn resolve(&self, name: &PropertyName) -> Option<ConfigurationProperty> {
        for source in self.chain {
            match source.get_configuration_property(name) {
                Ok(Some(property)) => return Some(property),
                Ok(None) => {}
                Err(error) => {
                    warn!(
                        source = %source.name(),
                        name = %name,
                        %error,
                        "Property source failed, skipping it"
                    );
                }
            }
        }
        None
    }

    /// Parses `name` and resolves it.
    pub fn resolve_str(&self, name: &str) -> NameResult<Option<ConfigurationProperty>> {
        let name = PropertyName::parse(name)?;
        Ok(self.resolve(&name))
    }

    /// Aggregates [`contains_descendant_of`] over every source.
    ///
    /// Any [`Containment::Present`] wins; otherwise any
    /// [`Containment::Unknown`] makes the answer unknown.
    ///
    /// [`contains_descendant_of`]: crate::ConfigurationPropertySource::contains_descendant_of
    pub fn contains_descendant_of(&self, name: &PropertyName) -> Containment {
        let mut result = Containment::Absent;
        for source in self.chain {
            match source.contains_descendant_of(name) {
                Containment::Present => return Containment::Present,
                Containment::Unknown => result = Containment::Unknown,
                Containment::Absent => {}
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::error::{ProviderError, ProviderResult};
    use crate::mapper::{DottedMapper, EnvironmentMapper};
    use crate::property::PropertyValue;
    use crate::source::{ConfigurationPropertySource, MapProvider, RawPropertyProvider};

    fn name(s: &str) -> PropertyName {
        PropertyName::parse(s).unwrap()
    }

    fn map_source(provider: MapProvider) -> ConfigurationPropertySource {
        ConfigurationPropertySource::new(provider, DottedMapper)
    }

    /// Fails for the configured keys and counts every lookup.
    struct Flaky {
        name: &'static str,
        failing: Vec<&'static str>,
        values: HashMap<&'static str, &'static str>,
        lookups: Arc<AtomicUsize>,
    }

    impl RawPropertyProvider for Flaky {
        fn name(&self) -> &str {
            self.name
        }

        fn get(&self, key: &str) -> ProviderResult<Option<PropertyValue>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.failing.iter().any(|f| *f == key) {
                return Err(ProviderError::lookup(key, "simulated failure"));
            }
            Ok(self.values.get(key).map(|v| PropertyValue::from(*v)))
        }
    }

    #[test]
    fn test_first_source_wins_and_remove_falls_through() {
        let mut chain: SourceChain = [
            map_source(MapProvider::new("a").with("k", "from-a")),
            map_source(MapProvider::new("b").with("k", "from-b")),
        ]
        .into_iter()
        .collect();

        let resolved = Resolver::new(&chain).resolve(&name("k")).unwrap();
        assert_eq!(resolved.value(), &PropertyValue::from("from-a"));
        assert_eq!(resolved.origin().source(), "a");

        chain.remove("a");
        let resolved = Resolver::new(&chain).resolve(&name("k")).unwrap();
        assert_eq!(resolved.value(), &PropertyValue::from("from-b"));
    }

    #[test]
    fn test_resolution_short_circuits() {
        let lookups = Arc::new(AtomicUsize::new(0));
        let chain: SourceChain = [
            map_source(MapProvider::new("first").with("k", "v")),
            ConfigurationPropertySource::new(
                Flaky {
                    name: "expensive",
                    failing: vec![],
                    values: HashMap::new(),
                    lookups: Arc::clone(&lookups),
                },
                DottedMapper,
            ),
        ]
        .into_iter()
        .collect();

        assert!(Resolver::new(&chain).resolve(&name("k")).is_some());
        assert_eq!(lookups.load(Ordering::SeqCst), 0);
        assert!(Resolver::new(&chain).resolve(&name("other")).is_none());
        assert!(lookups.load(Ordering::SeqCst) > 0);
    }

    #[test]
    fn test_failing_source_is_isolated() {
        let lookups = Arc::new(AtomicUsize::new(0));
        let flaky = Flaky {
            name: "flaky",
            failing: vec!["K"],
            values: HashMap::from([("K2", "from-flaky")]),
            lookups,
        };
        let chain: SourceChain = [
            ConfigurationPropertySource::new(flaky, EnvironmentMapper::new()),
            map_source(MapProvider::new("file").with("k", "from-file").with("k2", "file-k2")),
        ]
        .into_iter()
        .collect();
        let resolver = Resolver::new(&chain);

        let k = resolver.resolve(&name("k")).unwrap();
        assert_eq!(k.value(), &PropertyValue::from("from-file"));

        let k2 = resolver.resolve(&name("k2")).unwrap();
        assert_eq!(k2.value(), &PropertyValue::from("from-flaky"));
    }

    #[test]
    fn test_resolve_str() {
        let chain: SourceChain = [map_source(MapProvider::new("a").with("x.y", 1))]
            .into_iter()
            .collect();
        let resolver = Resolver::new(&chain);
        assert!(resolver.resolve_str("x.y").unwrap().is_some());
        assert!(resolver.resolve_str("x.z").unwrap().is_none());
        assert!(resolver.resolve_str("x..y").is_err());
    }

    #[test]
    fn test_aggregated_containment() {
        let lookup_only =
            map_source(MapProvider::new("restricted").with("server.port", 1)).restricted();
        let enumerable = map_source(MapProvider::new("file").with("spring.name", "x"));
        let chain: SourceChain = [lookup_only, enumerable].into_iter().collect();
        let resolver = Resolver::new(&chain);

        assert_eq!(
            resolver.contains_descendant_of(&name("spring")),
            Containment::Present
        );
        assert_eq!(
            resolver.contains_descendant_of(&name("server")),
            Containment::Unknown
        );

        let only_enumerable: SourceChain =
            [map_source(MapProvider::new("file").with("spring.name", "x"))]
                .into_iter()
                .collect();
        assert_eq!(
            Resolver::new(&only_enumerable).contains_descendant_of(&name("server")),
            Containment::Absent
        );
    }

    #[test]
    fn test_concurrent_resolution() {
        let chain: SourceChain = [map_source(MapProvider::new("a").with("k", "v"))]
            .into_iter()
            .collect();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let resolver = Resolver::new(&chain);
                    for _ in 0..100 {
                        assert!(resolver.resolve(&name("k")).is_some());
                    }
                });
            }
        });
    }
}
