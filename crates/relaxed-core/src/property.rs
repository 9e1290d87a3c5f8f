//! Resolved configuration properties, their values and origins.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::name::PropertyName;

/// An opaque configuration value as stored by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// A boolean flag.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Text(String),
    /// An ordered list of values.
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    /// Returns the string content of a [`Text`](Self::Text) value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the content of an [`Integer`](Self::Integer) value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the content of a [`Float`](Self::Float) or [`Integer`](Self::Integer) value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the content of a [`Bool`](Self::Bool) value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the items of a [`List`](Self::List) value.
    pub fn as_list(&self) -> Option<&[PropertyValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns `true` for an empty string or an empty list.
    ///
    /// An empty value is still a present value.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<PropertyValue>> From<Vec<T>> for PropertyValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// A line/column position inside a text resource, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextLocation {
    /// Line number.
    pub line: u32,
    /// Column number.
    pub column: u32,
}

impl TextLocation {
    /// Creates a new location.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Where a value came from.
///
/// An origin names its source and raw key but never owns the source. It is
/// diagnostic only and never influences resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Origin {
    source: String,
    key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<TextLocation>,
}

impl Origin {
    /// Creates an origin pointing at `key` inside the named source.
    pub fn new(source: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            key: key.into(),
            location: None,
        }
    }

    /// Attaches a text location.
    pub fn with_location(mut self, location: TextLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Name of the source that supplied the value.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Raw key inside the source.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Position inside the source, when the source is a text resource.
    pub fn location(&self) -> Option<TextLocation> {
        self.location
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" from property source \"{}\"", self.key, self.source)?;
        if let Some(location) = self.location {
            write!(f, " (line {}, column {})", location.line, location.column)?;
        }
        Ok(())
    }
}

/// A resolved property: name, value and origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigurationProperty {
    name: PropertyName,
    value: PropertyValue,
    origin: Origin,
}

impl ConfigurationProperty {
    /// Creates a new property.
    pub fn new(name: PropertyName, value: PropertyValue, origin: Origin) -> Self {
        Self {
            name,
            value,
            origin,
        }
    }

    /// The canonical name the property was resolved for.
    pub fn name(&self) -> &PropertyName {
        &self.name
    }

    /// The resolved value.
    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    /// Where the value came from.
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Consumes the property, returning its value.
    pub fn into_value(self) -> PropertyValue {
        self.value
    }
}

impl fmt::Display for ConfigurationProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.name, self.value, self.origin)
    }
}
