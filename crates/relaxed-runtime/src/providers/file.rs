//! Configuration files parsed through figment and flattened into raw keys.
//!
//! Nested tables become dotted keys and arrays become indexed keys, so
//!
//! ```toml
//! [server]
//! port = 8080
//! hosts = ["a", "b"]
//! ```
//!
//! yields `server.port`, `server.hosts[0]` and `server.hosts[1]`.

use std::path::Path;

use figment::Figment;
#[cfg(any(feature = "toml-config", feature = "yaml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::value::{Dict, Num, Value};
use relaxed_core::{MapProvider, PropertyValue};
use tracing::debug;

use crate::error::{LoaderError, LoaderResult};

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.toml`
    #[cfg(feature = "toml-config")]
    Toml,
    /// `.yaml` or `.yml`
    #[cfg(feature = "yaml-config")]
    Yaml,
}

impl FileFormat {
    /// File extensions searched for, in preference order.
    pub fn extensions() -> &'static [&'static str] {
        &[
            #[cfg(feature = "toml-config")]
            "toml",
            #[cfg(feature = "yaml-config")]
            "yaml",
            #[cfg(feature = "yaml-config")]
            "yml",
        ]
    }

    /// Picks the format from the file extension. Only formats enabled via
    /// feature flags are recognized.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|e| e.to_str())?;
        match ext {
            #[cfg(feature = "toml-config")]
            "toml" => Some(Self::Toml),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    fn figment(self, path: &Path) -> Figment {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => Figment::from(Toml::file_exact(path)),
            #[cfg(feature = "yaml-config")]
            Self::Yaml => Figment::from(Yaml::file_exact(path)),
        }
    }
}

/// Name of the source created for `path`.
pub fn file_source_name(path: &Path) -> String {
    format!("config:{}", path.display())
}

/// Parses the file at `path` into an enumerable provider named
/// `config:<path>`.
pub fn load_file(path: &Path) -> LoaderResult<MapProvider> {
    if !path.is_file() {
        return Err(LoaderError::FileNotFound(path.to_path_buf()));
    }
    let format =
        FileFormat::from_path(path).ok_or_else(|| LoaderError::UnsupportedFormat(path.to_path_buf()))?;
    let dict: Dict = format
        .figment(path)
        .extract()
        .map_err(|e| LoaderError::parse(path, e.to_string()))?;

    let mut entries = Vec::new();
    for (key, value) in &dict {
        flatten(key.clone(), value, &mut entries);
    }
    debug!(path = %path.display(), keys = entries.len(), "Parsed configuration file");

    let mut provider = MapProvider::new(file_source_name(path));
    for (key, value) in entries {
        provider.insert(key, value);
    }
    Ok(provider)
}

fn flatten(key: String, value: &Value, out: &mut Vec<(String, PropertyValue)>) {
    match value {
        Value::Dict(_, dict) => {
            for (child, value) in dict {
                flatten(format!("{key}.{child}"), value, out);
            }
        }
        Value::Array(_, items) => {
            for (i, item) in items.iter().enumerate() {
                flatten(format!("{key}[{i}]"), item, out);
            }
        }
        Value::String(_, s) => out.push((key, PropertyValue::from(s.as_str()))),
        Value::Char(_, c) => out.push((key, PropertyValue::Text(c.to_string()))),
        Value::Bool(_, b) => out.push((key, PropertyValue::Bool(*b))),
        Value::Num(_, n) => out.push((key, number(*n))),
        Value::Empty(_, _) => out.push((key, PropertyValue::Text(String::new()))),
    }
}

fn number(n: Num) -> PropertyValue {
    let wide = |v: u128| {
        i64::try_from(v)
            .map(PropertyValue::Integer)
            .unwrap_or(PropertyValue::Float(v as f64))
    };
    let signed = |v: i128| {
        i64::try_from(v)
            .map(PropertyValue::Integer)
            .unwrap_or(PropertyValue::Float(v as f64))
    };
    match n {
        Num::U8(v) => PropertyValue::Integer(v.into()),
        Num::U16(v) => PropertyValue::Integer(v.into()),
        Num::U32(v) => PropertyValue::Integer(v.into()),
        Num::U64(v) => wide(v.into()),
        Num::U128(v) => wide(v),
        Num::USize(v) => wide(v as u128),
        Num::I8(v) => PropertyValue::Integer(v.into()),
        Num::I16(v) => PropertyValue::Integer(v.into()),
        Num::I32(v) => PropertyValue::Integer(v.into()),
        Num::I64(v) => PropertyValue::Integer(v),
        Num::I128(v) => signed(v),
        Num::ISize(v) => signed(v as i128),
        Num::F32(v) => PropertyValue::Float(v.into()),
        Num::F64(v) => PropertyValue::Float(v),
    }
}
