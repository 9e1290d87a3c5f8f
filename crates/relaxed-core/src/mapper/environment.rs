//! Dialect for process environment variables.

use super::{Dialect, PropertyMapper, PropertyMapping};
use crate::error::{MappingFailure, MappingResult};
use crate::name::{Element, PropertyName};
use crate::property::PropertyValue;

const LIST_SHORTCUT_SUFFIX: &str = "__";

/// Maps names to `SCREAMING_SNAKE_CASE` environment variable names.
///
/// Each element is reduced to its uniform form, upper-cased, and elements are
/// joined with `_`: `server.context-path` becomes `SERVER_CONTEXTPATH` and
/// `list[0].value` becomes `LIST_0_VALUE`. Exactly one direct candidate is
/// produced per name.
///
/// With [`with_list_shortcut`](Self::with_list_shortcut) enabled, a name whose
/// last element is numeric (`foo.bar[1]`) also gets a family candidate
/// `FOO_BAR__` holding a comma separated list; its extractor picks the
/// element at the requested index.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentMapper {
    list_shortcut: bool,
}

impl EnvironmentMapper {
    /// Creates a mapper without list shortcuts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the comma-list shortcut.
    pub fn with_list_shortcut(mut self, enabled: bool) -> Self {
        self.list_shortcut = enabled;
        self
    }

    fn convert(elements: &[Element]) -> String {
        elements
            .iter()
            .map(|e| e.uniform().to_ascii_uppercase())
            .collect::<Vec<_>>()
            .join("_")
    }

    fn list_shortcut(name: &PropertyName, index: usize) -> Option<PropertyMapping> {
        let base = name.parent()?;
        let key = format!("{}{LIST_SHORTCUT_SUFFIX}", Self::convert(base.elements()));
        let family = base.clone();
        let mapping = PropertyMapping::new(key.clone(), base)
            .with_applicability(move |candidate| {
                family.is_parent_of(candidate) && candidate.last_element().as_index().is_some()
            })
            .with_extractor(move |value| element_at(&key, value, index));
        Some(mapping)
    }
}

fn element_at(key: &str, value: &PropertyValue, index: usize) -> MappingResult<PropertyValue> {
    let item = match value {
        PropertyValue::List(items) => items.get(index).cloned(),
        PropertyValue::Text(text) => text
            .split(',')
            .nth(index)
            .map(|item| PropertyValue::Text(item.trim().to_string())),
        other => (index == 0).then(|| other.clone()),
    };
    item.ok_or_else(|| MappingFailure::extraction(key, format!("no element at index {index}")))
}

impl PropertyMapper for EnvironmentMapper {
    fn dialect(&self) -> Dialect {
        if self.list_shortcut {
            Dialect::EnvironmentListShortcut
        } else {
            Dialect::Environment
        }
    }

    fn try_map_name(&self, name: &PropertyName) -> MappingResult<Vec<PropertyMapping>> {
        let mut mappings = vec![PropertyMapping::new(
            Self::convert(name.elements()),
            name.clone(),
        )];
        if self.list_shortcut {
            if let Some(index) = name.last_element().as_index() {
                mappings.extend(Self::list_shortcut(name, index));
            }
        }
        Ok(mappings)
    }

    fn try_map_key(&self, key: &str) -> MappingResult<PropertyName> {
        if let Some(c) = key.chars().find(|c| matches!(c, '.' | '[' | ']')) {
            return Err(MappingFailure::key(key, format!("contains '{c}'")));
        }
        let stem = match key.strip_suffix(LIST_SHORTCUT_SUFFIX) {
            Some(stem) if self.list_shortcut => stem,
            _ => key,
        };
        let mut elements = Vec::new();
        for segment in stem.split('_') {
            if segment.is_empty() {
                return Err(MappingFailure::key(key, "empty segment"));
            }
            let lower = segment.to_lowercase();
            let element = match Element::literal(&lower) {
                Ok(literal) => match literal.as_index() {
                    Some(index) => Element::index(index),
                    None => literal,
                },
                Err(e) => return Err(MappingFailure::key(key, e.to_string())),
            };
            elements.push(element);
        }
        PropertyName::from_elements(elements).map_err(|e| MappingFailure::key(key, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> PropertyName {
        PropertyName::parse(s).unwrap()
    }

    fn keys(mapper: EnvironmentMapper, raw: &str) -> Vec<String> {
        mapper
            .map_to_source_candidates(&name(raw))
            .iter()
            .map(|m| m.key().to_string())
            .collect()
    }

    #[test]
    fn test_single_candidate() {
        let mapper = EnvironmentMapper::new();
        assert_eq!(keys(mapper, "server.port"), vec!["SERVER_PORT"]);
        assert_eq!(keys(mapper, "server.context-path"), vec!["SERVER_CONTEXTPATH"]);
        assert_eq!(keys(mapper, "server.contextPath"), vec!["SERVER_CONTEXTPATH"]);
        assert_eq!(keys(mapper, "list[0].value"), vec!["LIST_0_VALUE"]);
    }

    #[test]
    fn test_reverse_mapping() {
        let mapper = EnvironmentMapper::new();
        assert_eq!(mapper.map_to_name("SERVER_PORT"), Some(name("server.port")));
        assert_eq!(
            mapper.map_to_name("LIST_0_VALUE").map(|n| n.to_string()),
            Some("list[0].value".to_string())
        );
        assert_eq!(mapper.map_to_name("server_port"), Some(name("server.port")));
        assert_eq!(mapper.map_to_name("APP_GRÖSSE"), Some(name("app.grösse")));
    }

    #[test]
    fn test_non_ascii_round_trip() {
        let mapper = EnvironmentMapper::new();
        for raw in ["app.größe", "été.mode"] {
            let name = name(raw);
            for mapping in mapper.map_to_source_candidates(&name).iter() {
                assert_eq!(mapper.map_to_name(mapping.key()), Some(name.clone()));
            }
        }
    }

    #[test]
    fn test_reverse_mapping_rejects_malformed_keys() {
        let mapper = EnvironmentMapper::new();
        assert!(mapper.map_to_name("SERVER__PORT").is_none());
        assert!(mapper.map_to_name("_PORT").is_none());
        assert!(mapper.map_to_name("server.port").is_none());
        assert!(mapper.map_to_name("").is_none());
        assert!(mapper.map_to_name("LIST__").is_none());
    }

    #[test]
    fn test_list_shortcut_candidate() {
        let mapper = EnvironmentMapper::new().with_list_shortcut(true);
        assert_eq!(keys(mapper, "foo.bar[1]"), vec!["FOO_BAR_1", "FOO_BAR__"]);
        assert_eq!(keys(mapper, "foo.bar"), vec!["FOO_BAR"]);
        assert_eq!(mapper.map_to_name("FOO_BAR__"), Some(name("foo.bar")));
    }

    #[test]
    fn test_list_shortcut_applicability_and_extraction() {
        let mapper = EnvironmentMapper::new().with_list_shortcut(true);
        let target = name("foo.bar[1]");
        let candidates = mapper.map_to_source_candidates(&target);
        let shortcut = &candidates[1];

        assert!(shortcut.is_applicable(&target));
        assert!(shortcut.is_applicable(&name("foo.bar[5]")));
        assert!(!shortcut.is_applicable(&name("foo.bar")));
        assert!(!shortcut.is_applicable(&name("foo.baz[1]")));

        let value = PropertyValue::from("a, b ,c");
        assert_eq!(shortcut.extract(&value).unwrap(), PropertyValue::from("b"));
        assert!(shortcut.extract(&PropertyValue::from("only")).is_err());
    }
}
