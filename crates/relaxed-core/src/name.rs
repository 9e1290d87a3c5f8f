//! Canonical configuration property names.
//!
//! A [`PropertyName`] is a non-empty sequence of [`Element`]s. Elements are
//! compared in their *uniform* form (ASCII lower-case, `-` and `_` removed),
//! so `server.contextPath`, `server.context-path` and `server.context_path`
//! all name the same property.
//!
//! The canonical string form prints index elements in bracket notation and
//! every other element in lower kebab-case:
//!
//! ```
//! use relaxed_core::PropertyName;
//!
//! let name = PropertyName::parse("server.contextPath").unwrap();
//! assert_eq!(name.to_string(), "server.context-path");
//!
//! let list = PropertyName::parse("list[0].value").unwrap();
//! assert_eq!(list, PropertyName::parse("LIST.0.VALUE").unwrap());
//! ```

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{NameError, NameResult};

/// A single element of a [`PropertyName`].
#[derive(Debug, Clone)]
pub enum Element {
    /// A named element such as `server` or `context-path`.
    Literal {
        /// The element as written.
        text: String,
        /// Unicode lower-case form with `-` and `_` stripped.
        uniform: String,
    },
    /// A numeric list index, written `[N]`.
    Index(usize),
}

impl Element {
    /// Creates a literal element, rejecting empty or reserved input.
    pub fn literal(text: impl Into<String>) -> NameResult<Self> {
        let text = text.into();
        if text.is_empty() {
            return Err(NameError::malformed(text, "element is empty"));
        }
        if let Some(c) = text.chars().find(|c| matches!(c, '.' | '[' | ']')) {
            let reason = format!("element contains reserved character '{c}'");
            return Err(NameError::malformed(text, reason));
        }
        let uniform = uniform_form(&text);
        if uniform.is_empty() {
            return Err(NameError::malformed(
                text,
                "element contains nothing but separators",
            ));
        }
        Ok(Self::Literal { text, uniform })
    }

    /// Creates an index element.
    pub fn index(index: usize) -> Self {
        Self::Index(index)
    }

    /// Returns `true` if the element was written in bracket notation.
    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::Index(_))
    }

    /// Returns the numeric value of the element, if it is numeric.
    ///
    /// Literal elements count as numeric when they are a canonical decimal
    /// (`0`, `7`, `12`, but not `007`), so `list.0` and `list[0]` agree.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Literal { uniform, .. } => canonical_index(uniform),
        }
    }

    /// Returns the uniform comparison form.
    pub fn uniform(&self) -> Cow<'_, str> {
        match self {
            Self::Index(index) => Cow::Owned(index.to_string()),
            Self::Literal { uniform, .. } => Cow::Borrowed(uniform),
        }
    }

    /// Returns the element in lower kebab-case (`contextPath` becomes `context-path`).
    pub fn dashed(&self) -> String {
        let text = match self {
            Self::Index(index) => return index.to_string(),
            Self::Literal { text, .. } => text,
        };
        let mut out = String::with_capacity(text.len() + 4);
        let mut previous: Option<char> = None;
        for c in text.chars() {
            if c == '-' || c == '_' {
                if !out.is_empty() && !out.ends_with('-') {
                    out.push('-');
                }
            } else {
                let boundary = c.is_ascii_uppercase()
                    && previous.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit());
                if boundary && !out.ends_with('-') {
                    out.push('-');
                }
                out.push(c.to_ascii_lowercase());
            }
            previous = Some(c);
        }
        while out.ends_with('-') {
            out.pop();
        }
        out
    }

    /// Returns the element in camelCase (`context-path` becomes `contextPath`).
    pub fn camel(&self) -> String {
        let dashed = self.dashed();
        let mut out = String::with_capacity(dashed.len());
        for (i, part) in dashed.split('-').enumerate() {
            if i == 0 {
                out.push_str(part);
                continue;
            }
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_uppercase());
                out.push_str(chars.as_str());
            }
        }
        out
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Index(a), Self::Index(b)) => a == b,
            (Self::Index(index), Self::Literal { uniform, .. })
            | (Self::Literal { uniform, .. }, Self::Index(index)) => {
                canonical_index(uniform) == Some(*index)
            }
            (Self::Literal { uniform: a, .. }, Self::Literal { uniform: b, .. }) => a == b,
        }
    }
}

impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uniform().hash(state);
    }
}

impl PartialOrd for Element {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Element {
    /// Numeric elements sort first, by value; the rest sort by uniform form.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.as_index(), other.as_index()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.uniform().cmp(&other.uniform()),
        }
    }
}

/// A canonical, relaxed configuration property name.
///
/// Names are immutable values; every transformation returns a new name.
#[derive(Clone)]
pub struct PropertyName {
    elements: Vec<Element>,
}

impl PropertyName {
    /// Parses a dotted name such as `server.port` or `list[0].value`.
    ///
    /// Fails on empty input, empty elements, non-numeric or unbalanced
    /// brackets.
    pub fn parse(name: &str) -> NameResult<Self> {
        if name.is_empty() {
            return Err(NameError::malformed(name, "name is empty"));
        }

        let mut elements = Vec::new();
        let mut pos = 0;
        let mut after_dot = false;

        loop {
            let rest = &name[pos..];
            if rest.starts_with(']') {
                return Err(NameError::malformed(name, "unbalanced ']'"));
            }
            if let Some(inner_start) = rest.strip_prefix('[') {
                if after_dot {
                    return Err(NameError::malformed(name, "empty element before '['"));
                }
                let close = inner_start
                    .find(']')
                    .ok_or_else(|| NameError::malformed(name, "unbalanced '['"))?;
                let inner = &inner_start[..close];
                elements.push(parse_index(name, inner)?);
                pos += close + 2;
            } else {
                let end = rest.find(['.', '[', ']']).unwrap_or(rest.len());
                if end == 0 {
                    return Err(NameError::malformed(name, "empty element"));
                }
                elements.push(
                    Element::literal(&rest[..end])
                        .map_err(|e| NameError::malformed(name, reason_of(e)))?,
                );
                pos += end;
            }

            match name[pos..].chars().next() {
                None => break,
                Some('.') => {
                    pos += 1;
                    after_dot = true;
                    if pos == name.len() {
                        return Err(NameError::malformed(name, "trailing '.'"));
                    }
                }
                Some('[') => after_dot = false,
                Some(']') => return Err(NameError::malformed(name, "unbalanced ']'")),
                Some(_) => {
                    return Err(NameError::malformed(name, "expected '.' or '[' after index"));
                }
            }
        }

        Ok(Self { elements })
    }

    /// Builds a name from already validated elements.
    pub fn from_elements(elements: Vec<Element>) -> NameResult<Self> {
        if elements.is_empty() {
            return Err(NameError::malformed("", "name has no elements"));
        }
        Ok(Self { elements })
    }

    /// Returns the elements of this name.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always `false`: names have at least one element.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the last element.
    pub fn last_element(&self) -> &Element {
        // Non-empty by construction.
        &self.elements[self.elements.len() - 1]
    }

    /// Returns `true` if this name is a strict prefix of `other`.
    pub fn is_ancestor_of(&self, other: &PropertyName) -> bool {
        self.len() < other.len() && self.elements[..] == other.elements[..self.len()]
    }

    /// Returns `true` if `other` is exactly one element longer than this name.
    pub fn is_parent_of(&self, other: &PropertyName) -> bool {
        self.len() + 1 == other.len() && self.is_ancestor_of(other)
    }

    /// Returns a new name with the parsed `suffix` appended.
    ///
    /// The suffix may span several elements, e.g. `append("[0].value")`.
    pub fn append(&self, suffix: &str) -> NameResult<Self> {
        let suffix_name = if suffix.starts_with('[') {
            Self::parse(suffix)?
        } else {
            Self::parse(suffix.strip_prefix('.').unwrap_or(suffix))?
        };
        let mut elements = self.elements.clone();
        elements.extend(suffix_name.elements);
        Ok(Self { elements })
    }

    /// Returns a new name with `element` appended.
    pub fn append_element(&self, element: Element) -> Self {
        let mut elements = self.elements.clone();
        elements.push(element);
        Self { elements }
    }

    /// Returns a new name with the index `index` appended.
    pub fn append_index(&self, index: usize) -> Self {
        self.append_element(Element::Index(index))
    }

    /// Drops the last `n` elements. Returns `None` if nothing would remain.
    pub fn chop(&self, n: usize) -> Option<Self> {
        if n >= self.len() {
            return None;
        }
        Some(Self {
            elements: self.elements[..self.len() - n].to_vec(),
        })
    }

    /// Returns the parent name, if any.
    pub fn parent(&self) -> Option<Self> {
        self.chop(1)
    }

    /// Returns the uniform comparison form, elements joined with `.`.
    pub fn to_uniform_string(&self) -> String {
        self.elements
            .iter()
            .map(|e| e.uniform())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl PartialEq for PropertyName {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl Eq for PropertyName {}

impl Hash for PropertyName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.elements.hash(state);
    }
}

impl PartialOrd for PropertyName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PropertyName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.elements.cmp(&other.elements)
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.elements.iter().enumerate() {
            match element {
                Element::Index(index) => write!(f, "[{index}]")?,
                literal => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(&literal.dashed())?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyName(\"{self}\")")
    }
}

impl FromStr for PropertyName {
    type Err = NameError;

    fn from_str(s: &str) -> NameResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for PropertyName {
    type Error = NameError;

    fn try_from(value: &str) -> NameResult<Self> {
        Self::parse(value)
    }
}

impl Serialize for PropertyName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PropertyName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

fn uniform_form(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn canonical_index(text: &str) -> Option<usize> {
    let digits = !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit());
    if !digits || (text.len() > 1 && text.starts_with('0')) {
        return None;
    }
    text.parse().ok()
}

fn parse_index(name: &str, inner: &str) -> NameResult<Element> {
    if inner.is_empty() {
        return Err(NameError::malformed(name, "empty index '[]'"));
    }
    if !inner.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NameError::malformed(name, "index is not a number"));
    }
    inner
        .parse()
        .map(Element::Index)
        .map_err(|_| NameError::malformed(name, "index is out of range"))
}

fn reason_of(error: NameError) -> String {
    match error {
        NameError::Malformed { reason, .. } => reason,
    }
}
