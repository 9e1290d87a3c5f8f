//! Property metadata and the deprecation table.
//!
//! The table can be built programmatically or loaded from a JSON document
//! shaped like:
//!
//! ```json
//! {
//!   "properties": [
//!     { "name": "server.servlet.context-path", "type": "String" },
//!     {
//!       "name": "server.context-path",
//!       "type": "String",
//!       "deprecation": { "level": "error", "replacement": "server.servlet.context-path" }
//!     }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use relaxed_core::{NameResult, PropertyName};
use serde::{Deserialize, Serialize};

use crate::error::MetadataResult;

/// How severe a deprecation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeprecationLevel {
    /// The property still works but should be renamed.
    #[default]
    Warning,
    /// The property is no longer supported.
    Error,
}

/// Deprecation details of a property.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Deprecation {
    /// Severity.
    #[serde(default)]
    pub level: DeprecationLevel,
    /// Name of the property replacing this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    /// Why the property was deprecated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Deprecation {
    /// Creates a deprecation with the given level.
    pub fn new(level: DeprecationLevel) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Sets the replacement property.
    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }

    /// Sets the reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Metadata describing one configuration property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMetadata {
    /// Canonical name of the property.
    pub name: String,
    /// Declared value type, e.g. `String` or `Map<String,Integer>`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    /// Human readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Present if the property is deprecated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation: Option<Deprecation>,
}

impl PropertyMetadata {
    /// Creates metadata for a typed property.
    pub fn new(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: Some(value_type.into()),
            description: None,
            deprecation: None,
        }
    }

    /// Marks the property deprecated.
    pub fn deprecated(mut self, deprecation: Deprecation) -> Self {
        self.deprecation = Some(deprecation);
        self
    }

    /// Marks the property as no longer supported, replaced by `replacement`.
    pub fn replaced_by(self, replacement: impl Into<String>) -> Self {
        self.deprecated(Deprecation::new(DeprecationLevel::Error).with_replacement(replacement))
    }

    /// Returns `true` if the property is deprecated.
    pub fn is_deprecated(&self) -> bool {
        self.deprecation.is_some()
    }
}

#[derive(Deserialize)]
struct MetadataDocument {
    #[serde(default)]
    properties: Vec<PropertyMetadata>,
}

/// All known properties, keyed by canonical name, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    entries: Vec<(PropertyName, PropertyMetadata)>,
    index: HashMap<PropertyName, usize>,
}

impl MetadataTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a table from a JSON document.
    pub fn from_json(json: &str) -> MetadataResult<Self> {
        let document: MetadataDocument = serde_json::from_str(json)?;
        Self::from_properties(document.properties)
    }

    /// Loads a table from a reader yielding a JSON document.
    pub fn from_reader<R: Read>(reader: R) -> MetadataResult<Self> {
        let document: MetadataDocument = serde_json::from_reader(reader)?;
        Self::from_properties(document.properties)
    }

    /// Loads a table from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    fn from_properties(properties: Vec<PropertyMetadata>) -> MetadataResult<Self> {
        let mut table = Self::new();
        for metadata in properties {
            table.insert(metadata)?;
        }
        Ok(table)
    }

    /// Adds metadata, replacing any entry for an equal name.
    pub fn insert(&mut self, metadata: PropertyMetadata) -> NameResult<()> {
        let name = PropertyName::parse(&metadata.name)?;
        match self.index.get(&name) {
            Some(&position) => self.entries[position] = (name, metadata),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, metadata));
            }
        }
        Ok(())
    }

    /// Adds metadata, builder style.
    pub fn with(mut self, metadata: PropertyMetadata) -> NameResult<Self> {
        self.insert(metadata)?;
        Ok(self)
    }

    /// Looks up metadata by name.
    pub fn get(&self, name: &PropertyName) -> Option<&PropertyMetadata> {
        self.index.get(name).map(|&position| &self.entries[position].1)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates every entry in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&PropertyName, &PropertyMetadata)> {
        self.entries.iter().map(|(name, metadata)| (name, metadata))
    }

    /// Iterates deprecated entries in insertion order.
    pub fn deprecated(&self) -> impl Iterator<Item = (&PropertyName, &PropertyMetadata)> {
        self.iter().filter(|(_, metadata)| metadata.is_deprecated())
    }
}

/// Returns the value type of a map type such as `java.util.Map<String,Integer>`
/// or `HashMap<String, u16>`.
pub(crate) fn map_value_type(value_type: &str) -> Option<String> {
    let compact = normalize_type(value_type);
    let open = compact.find('<')?;
    let head = compact[..open].rsplit(['.', ':']).next()?;
    if !head.ends_with("Map") {
        return None;
    }
    let inner = compact[open + 1..].strip_suffix('>')?;
    let mut depth = 0usize;
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return Some(inner[i + 1..].to_string()),
            _ => {}
        }
    }
    None
}

/// Strips whitespace so `Map<String, Integer>` equals `Map<String,Integer>`.
pub(crate) fn normalize_type(value_type: &str) -> String {
    value_type.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const METADATA: &str = r#"{
        "properties": [
            { "name": "server.servlet.context-path", "type": "String" },
            {
                "name": "server.context-path",
                "type": "String",
                "description": "Context path of the application.",
                "deprecation": {
                    "level": "error",
                    "replacement": "server.servlet.context-path"
                }
            },
            {
                "name": "server.legacy-flag",
                "type": "Boolean",
                "deprecation": { "reason": "No longer needed." }
            }
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let table = MetadataTable::from_json(METADATA).unwrap();
        assert_eq!(table.len(), 3);

        let name = PropertyName::parse("server.contextPath").unwrap();
        let metadata = table.get(&name).unwrap();
        let deprecation = metadata.deprecation.as_ref().unwrap();
        assert_eq!(deprecation.level, DeprecationLevel::Error);
        assert_eq!(
            deprecation.replacement.as_deref(),
            Some("server.servlet.context-path")
        );

        let deprecated: Vec<_> = table.deprecated().map(|(n, _)| n.to_string()).collect();
        assert_eq!(deprecated, vec!["server.context-path", "server.legacy-flag"]);

        let legacy = table
            .get(&PropertyName::parse("server.legacy-flag").unwrap())
            .unwrap();
        assert_eq!(
            legacy.deprecation.as_ref().unwrap().level,
            DeprecationLevel::Warning
        );
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(MetadataTable::from_json("not json").is_err());
        let bad_name = r#"{"properties":[{"name":"a..b"}]}"#;
        assert!(matches!(
            MetadataTable::from_json(bad_name),
            Err(crate::MetadataError::InvalidName(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        std::fs::write(&path, METADATA).unwrap();
        assert_eq!(MetadataTable::from_path(&path).unwrap().len(), 3);

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            MetadataTable::from_path(missing),
            Err(crate::MetadataError::ReadError(_))
        ));
    }

    #[test]
    fn test_insert_replaces_equal_names() {
        let mut table = MetadataTable::new();
        table
            .insert(PropertyMetadata::new("server.port", "Integer"))
            .unwrap();
        table
            .insert(PropertyMetadata::new("Server.PO-RT", "String"))
            .unwrap();
        assert_eq!(table.len(), 1);
        let name = PropertyName::parse("server.port").unwrap();
        assert_eq!(table.get(&name).unwrap().value_type.as_deref(), Some("String"));

        // A single underscored element is a different name.
        table
            .insert(PropertyMetadata::new("SERVER_PORT", "Boolean"))
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&name).unwrap().value_type.as_deref(), Some("String"));
    }

    #[test]
    fn test_map_value_type() {
        assert_eq!(
            map_value_type("java.util.Map<java.lang.String,java.lang.Integer>").as_deref(),
            Some("java.lang.Integer")
        );
        assert_eq!(
            map_value_type("HashMap<String, Vec<u8>>").as_deref(),
            Some("Vec<u8>")
        );
        assert_eq!(map_value_type("Vec<String>"), None);
        assert_eq!(map_value_type("String"), None);
    }
}
