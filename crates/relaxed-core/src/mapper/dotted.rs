//! Dialect for dotted map keys, as found in parsed files and in-memory maps.

use super::{Dialect, PropertyMapper, PropertyMapping, push_distinct};
use crate::error::{MappingFailure, MappingResult};
use crate::name::{Element, PropertyName};

/// Maps names to dotted keys.
///
/// Candidates, in trial order:
///
/// 1. the canonical form (`server.context-path`, `list[0].value`)
/// 2. the camelCase form (`server.contextPath`)
/// 3. numeric elements as `.N` (`list.0.value`)
/// 4. numeric elements as `[N]` (`list[0].value` for a name parsed from `list.0.value`)
///
/// Duplicate keys are dropped, keeping the first occurrence.
#[derive(Debug, Clone, Copy, Default)]
pub struct DottedMapper;

#[derive(Clone, Copy)]
enum IndexStyle {
    /// Index elements in brackets, numeric literals as written.
    AsWritten,
    Dotted,
    Bracketed,
}

fn render(name: &PropertyName, literal: fn(&Element) -> String, style: IndexStyle) -> String {
    let mut out = String::new();
    for (i, element) in name.elements().iter().enumerate() {
        let bracketed = match style {
            IndexStyle::AsWritten => element.is_indexed(),
            IndexStyle::Dotted => false,
            IndexStyle::Bracketed => element.as_index().is_some(),
        };
        match element.as_index() {
            Some(index) if bracketed => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
            _ => {
                if i > 0 {
                    out.push('.');
                }
                out.push_str(&literal(element));
            }
        }
    }
    out
}

impl PropertyMapper for DottedMapper {
    fn dialect(&self) -> Dialect {
        Dialect::DottedMap
    }

    fn try_map_name(&self, name: &PropertyName) -> MappingResult<Vec<PropertyMapping>> {
        let keys = [
            name.to_string(),
            render(name, Element::camel, IndexStyle::AsWritten),
            render(name, Element::dashed, IndexStyle::Dotted),
            render(name, Element::dashed, IndexStyle::Bracketed),
        ];
        let mut mappings = Vec::with_capacity(keys.len());
        for key in keys {
            push_distinct(&mut mappings, PropertyMapping::new(key, name.clone()));
        }
        Ok(mappings)
    }

    fn try_map_key(&self, key: &str) -> MappingResult<PropertyName> {
        PropertyName::parse(key).map_err(|e| MappingFailure::key(key, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(raw: &str) -> Vec<String> {
        let name = PropertyName::parse(raw).unwrap();
        DottedMapper
            .map_to_source_candidates(&name)
            .iter()
            .map(|m| m.key().to_string())
            .collect()
    }

    #[test]
    fn test_simple_name_has_one_candidate() {
        assert_eq!(keys("server.port"), vec!["server.port"]);
    }

    #[test]
    fn test_camel_case_candidate() {
        assert_eq!(
            keys("server.context-path"),
            vec!["server.context-path", "server.contextPath"]
        );
    }

    #[test]
    fn test_index_candidates() {
        assert_eq!(keys("list[0].value"), vec!["list[0].value", "list.0.value"]);
        assert_eq!(keys("list.0.value"), vec!["list.0.value", "list[0].value"]);
    }

    #[test]
    fn test_candidate_order_with_camel_and_index() {
        assert_eq!(
            keys("my-list[2].item-name"),
            vec![
                "my-list[2].item-name",
                "myList[2].itemName",
                "my-list.2.item-name",
            ]
        );
    }

    #[test]
    fn test_reverse_mapping() {
        let name = DottedMapper.map_to_name("server.contextPath").unwrap();
        assert_eq!(name.to_string(), "server.context-path");
        assert!(DottedMapper.map_to_name("server..port").is_none());
        assert!(DottedMapper.try_map_key("a[").is_err());
    }
}
