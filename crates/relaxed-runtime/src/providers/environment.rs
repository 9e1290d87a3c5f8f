//! The process environment as a raw provider.

use std::collections::BTreeMap;
use std::env::{self, VarError};

use relaxed_core::{Capability, PropertyValue, ProviderError, ProviderResult, RawPropertyProvider};

/// Conventional name of the environment source.
pub const ENVIRONMENT_SOURCE_NAME: &str = "systemEnvironment";

/// Raw provider over environment variables.
///
/// A snapshot is enumerable and never changes after creation. A live view
/// reads `std::env` on every lookup and is lookup-only, for deployments where
/// listing the environment is not allowed.
///
/// With a prefix, `get("SERVER_PORT")` reads `<prefix>SERVER_PORT` and only
/// prefixed variables are listed, with the prefix stripped.
#[derive(Debug, Clone)]
pub struct EnvironmentProvider {
    name: String,
    prefix: Option<String>,
    snapshot: Option<BTreeMap<String, String>>,
}

impl EnvironmentProvider {
    /// Captures the current process environment.
    pub fn snapshot() -> Self {
        Self::from_vars(env::vars_os().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        }))
    }

    /// Reads the process environment on every lookup.
    pub fn live() -> Self {
        Self {
            name: ENVIRONMENT_SOURCE_NAME.to_string(),
            prefix: None,
            snapshot: None,
        }
    }

    /// Uses the given variables instead of the process environment.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: ENVIRONMENT_SOURCE_NAME.to_string(),
            prefix: None,
            snapshot: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Only exposes variables starting with `prefix`, with the prefix removed.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Renames the source.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn full_key<'a>(&self, key: &'a str) -> std::borrow::Cow<'a, str> {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{key}").into(),
            None => key.into(),
        }
    }
}

impl RawPropertyProvider for EnvironmentProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> ProviderResult<Option<PropertyValue>> {
        let key = self.full_key(key);
        match &self.snapshot {
            Some(vars) => Ok(vars.get(key.as_ref()).map(|v| PropertyValue::from(v.as_str()))),
            None => match env::var(key.as_ref()) {
                Ok(value) => Ok(Some(PropertyValue::from(value))),
                Err(VarError::NotPresent) => Ok(None),
                Err(VarError::NotUnicode(_)) => {
                    Err(ProviderError::lookup(key, "value is not valid unicode"))
                }
            },
        }
    }

    fn capability(&self) -> Capability {
        match self.snapshot {
            Some(_) => Capability::Enumerable,
            None => Capability::LookupOnly,
        }
    }

    fn keys(&self) -> Vec<String> {
        let Some(vars) = &self.snapshot else {
            return Vec::new();
        };
        match &self.prefix {
            Some(prefix) => vars
                .keys()
                .filter_map(|k| k.strip_prefix(prefix.as_str()))
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect(),
            None => vars.keys().cloned().collect(),
        }
    }
}
