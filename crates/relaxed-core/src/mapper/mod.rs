//! Mapping between canonical names and the raw keys of a source dialect.
//!
//! A [`PropertyMapper`] is a pure function of the name it is asked about and
//! its own fixed dialect configuration. Two dialects ship with the engine:
//!
//! - [`DottedMapper`] for dotted map keys (`server.port`, `server.contextPath`,
//!   `list.0.value`)
//! - [`EnvironmentMapper`] for process environment variables (`SERVER_PORT`)
//!
//! Because mapping is pure, its output can be memoized with [`CachingMapper`].

mod cache;
mod dotted;
mod environment;
mod mapping;

pub use cache::{CachingMapper, MappingCache};
pub use dotted::DottedMapper;
pub use environment::EnvironmentMapper;
pub use mapping::{Applicability, PropertyMapping, ValueExtractor};

use std::fmt;

use tracing::trace;

use crate::error::MappingResult;
use crate::name::PropertyName;

/// Identity of a naming dialect, part of the mapping cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Dotted map keys.
    DottedMap,
    /// Environment variables.
    Environment,
    /// Environment variables with comma-list shortcuts enabled.
    EnvironmentListShortcut,
    /// A user supplied dialect.
    Custom(&'static str),
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DottedMap => f.write_str("dotted-map"),
            Self::Environment => f.write_str("environment"),
            Self::EnvironmentListShortcut => f.write_str("environment+list-shortcut"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// Maps canonical names to raw-key candidates and raw keys back to names.
///
/// For every name `n` and every candidate `c` of `try_map_name(n)` built with
/// the default applicability, `try_map_key(c.key())` must equal `n`.
pub trait PropertyMapper: Send + Sync {
    /// The dialect this mapper implements.
    fn dialect(&self) -> Dialect;

    /// Returns the ordered raw-key candidates for `name`.
    fn try_map_name(&self, name: &PropertyName) -> MappingResult<Vec<PropertyMapping>>;

    /// Returns the canonical name for a raw key.
    fn try_map_key(&self, key: &str) -> MappingResult<PropertyName>;

    /// Like [`try_map_name`](Self::try_map_name), treating failure as "no candidates".
    fn map_to_source_candidates(&self, name: &PropertyName) -> Vec<PropertyMapping> {
        self.try_map_name(name).unwrap_or_else(|error| {
            trace!(dialect = %self.dialect(), name = %name, %error, "Mapping failed");
            Vec::new()
        })
    }

    /// Like [`try_map_key`](Self::try_map_key), treating failure as "no name".
    fn map_to_name(&self, key: &str) -> Option<PropertyName> {
        self.try_map_key(key)
            .inspect_err(|error| {
                trace!(dialect = %self.dialect(), key, %error, "Reverse mapping failed");
            })
            .ok()
    }
}

/// Pushes `mapping` unless a mapping with the same key is already present.
pub(crate) fn push_distinct(mappings: &mut Vec<PropertyMapping>, mapping: PropertyMapping) {
    if !mappings.iter().any(|m| m.key() == mapping.key()) {
        mappings.push(mapping);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn raw_name_strategy() -> impl Strategy<Value = String> {
        let element = prop_oneof![
            "[a-z][a-zA-Z0-9_-]{0,6}",
            (0usize..20).prop_map(|i| format!("[{i}]")),
            (0usize..20).prop_map(|i| i.to_string()),
        ];
        ("[a-z][a-zA-Z0-9-]{0,6}", prop::collection::vec(element, 0..4)).prop_map(
            |(first, rest)| {
                let mut out = first;
                for element in rest {
                    if !element.starts_with('[') {
                        out.push('.');
                    }
                    out.push_str(&element);
                }
                out
            },
        )
    }

    fn assert_sound(mapper: &dyn PropertyMapper, name: &PropertyName) {
        let candidates = mapper.map_to_source_candidates(name);
        assert!(!candidates.is_empty(), "no candidates for {name}");
        for candidate in candidates {
            let reversed = mapper.map_to_name(candidate.key());
            assert_eq!(
                reversed.as_ref(),
                Some(name),
                "{} candidate '{}' does not map back to {name}",
                mapper.dialect(),
                candidate.key()
            );
        }
    }

    #[test]
    fn test_soundness_examples() {
        let mappers: [&dyn PropertyMapper; 2] = [&DottedMapper, &EnvironmentMapper::new()];
        for raw in [
            "server.port",
            "server.context-path",
            "list[0].value",
            "my_app.max-size",
            "spring.datasource.hikari.maximumPoolSize",
            "[3].x",
        ] {
            let name = PropertyName::parse(raw).unwrap();
            for mapper in mappers {
                assert_sound(mapper, &name);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_mappers_are_sound(raw in raw_name_strategy()) {
            let name = PropertyName::parse(&raw).unwrap();
            assert_sound(&DottedMapper, &name);
            assert_sound(&EnvironmentMapper::new(), &name);
        }

        #[test]
        fn prop_mapping_is_deterministic(raw in raw_name_strategy()) {
            let name = PropertyName::parse(&raw).unwrap();
            let env = EnvironmentMapper::new();
            prop_assert_eq!(
                DottedMapper.map_to_source_candidates(&name),
                DottedMapper.map_to_source_candidates(&name)
            );
            prop_assert_eq!(
                env.map_to_source_candidates(&name),
                env.map_to_source_candidates(&name)
            );
        }
    }
}
