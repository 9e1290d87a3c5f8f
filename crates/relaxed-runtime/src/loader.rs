//! Bootstrap of a [`SourceChain`] from overrides, the environment,
//! configuration files and defaults.
//!
//! # Feature Flags
//!
//! - `toml-config` *(default)*: enables TOML files (`application.toml`)
//! - `yaml-config`: enables YAML files (`application.yaml`, `application.yml`)
//!
//! Both features can be enabled simultaneously; if so, both formats are
//! searched and loaded, TOML first.
//!
//! # Source Precedence (highest first)
//!
//! 1. `overrides`: programmatic overrides
//! 2. `systemEnvironment`: environment variables (`SERVER_PORT` for `server.port`)
//! 3. `config:<path>`: profile-specific file (`application-{profile}.toml`)
//! 4. `config:<path>`: main file (`application.toml`)
//! 5. `defaults`: programmatic defaults
//!
//! # Example
//!
//! ```rust,ignore
//! use relaxed_runtime::EnvironmentLoader;
//!
//! let chain = EnvironmentLoader::new()
//!     .profile("production")
//!     .default_property("server.port", 8080)
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use relaxed_core::{
    CachingMapper, ConfigurationPropertySource, DottedMapper, EnvironmentMapper, MapProvider,
    PropertyValue, SourceChain,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{LoaderError, LoaderResult};
use crate::providers::{EnvironmentProvider, FileFormat, load_file};

/// Environment variable selecting the active profile.
pub const PROFILE_ENV_VAR: &str = "RELAXED_PROFILE";

/// Name of the programmatic overrides source.
pub const OVERRIDES_SOURCE_NAME: &str = "overrides";

/// Name of the programmatic defaults source.
pub const DEFAULTS_SOURCE_NAME: &str = "defaults";

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Profile {
    /// Development profile (default).
    #[default]
    Development,
    /// Production profile.
    Production,
    /// Custom profile name.
    Custom(String),
}

impl Profile {
    /// Returns the profile name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name, accepting the usual abbreviations.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Reads the profile from [`PROFILE_ENV_VAR`] or defaults to Development.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Profile::from_env`], reading [`PROFILE_ENV_VAR`] through
    /// `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl FnOnce(&str) -> Option<String>) -> Self {
        lookup(PROFILE_ENV_VAR)
            .map(|p| Self::parse(&p))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Loader knobs that are usually fixed per application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    /// Base name of configuration files, without extension.
    pub base_name: String,
    /// Only environment variables with this prefix are visible, with the
    /// prefix removed.
    pub env_prefix: Option<String>,
    /// Enables the `FOO_BAR__=a,b` list shortcut on the environment.
    pub env_list_shortcut: bool,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            base_name: "application".to_string(),
            env_prefix: None,
            env_list_shortcut: false,
        }
    }
}

/// Builds a [`SourceChain`] in the standard precedence order.
pub struct EnvironmentLoader {
    settings: LoaderSettings,
    profile: Profile,
    search_paths: Vec<PathBuf>,
    config_file: Option<PathBuf>,
    load_env: bool,
    restricted_env: bool,
    env_vars: Option<Vec<(String, String)>>,
    overrides: MapProvider,
    defaults: MapProvider,
}

impl Default for EnvironmentLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentLoader {
    /// Creates a loader with the profile taken from the environment.
    pub fn new() -> Self {
        Self {
            settings: LoaderSettings::default(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            config_file: None,
            load_env: true,
            restricted_env: false,
            env_vars: None,
            overrides: MapProvider::new(OVERRIDES_SOURCE_NAME),
            defaults: MapProvider::new(DEFAULTS_SOURCE_NAME),
        }
    }

    /// Replaces the loader settings.
    pub fn settings(mut self, settings: LoaderSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Adds the current directory to the search paths.
    pub fn with_current_dir(self) -> Self {
        if let Ok(cwd) = std::env::current_dir() {
            self.search_path(cwd)
        } else {
            self
        }
    }

    /// Adds the user config directory to the search paths.
    pub fn with_user_config_dir(self) -> Self {
        if let Some(config_dir) = dirs::config_dir() {
            self.search_path(config_dir.join("relaxed"))
        } else {
            self
        }
    }

    /// Loads exactly this file instead of searching.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables the environment source (default: true).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Disables the environment source.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Exposes the environment as a lookup-only source.
    pub fn restricted_env(mut self) -> Self {
        self.restricted_env = true;
        self
    }

    /// Uses these variables instead of the process environment.
    pub fn env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Adds a programmatic override, which wins over every other source.
    pub fn override_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.overrides.insert(key, value);
        self
    }

    /// Adds a programmatic default, which loses to every other source.
    pub fn default_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.defaults.insert(key, value);
        self
    }

    /// Builds the chain.
    pub fn load(self) -> LoaderResult<SourceChain> {
        let files = self.config_files()?;
        let mut chain = SourceChain::new();

        if self.load_env {
            chain.add_last(self.environment_source());
        }
        for path in &files {
            info!(path = %path.display(), "Loading configuration file");
            chain.add_last(ConfigurationPropertySource::new(load_file(path)?, DottedMapper));
        }
        if !self.overrides.is_empty() {
            chain.add_first(ConfigurationPropertySource::new(self.overrides, DottedMapper));
        }
        if !self.defaults.is_empty() {
            chain.add_last(ConfigurationPropertySource::new(self.defaults, DottedMapper));
        }

        debug!(profile = %self.profile, sources = ?chain.names(), "Property sources loaded");
        Ok(chain)
    }

    fn environment_source(&self) -> ConfigurationPropertySource {
        let provider = match &self.env_vars {
            Some(vars) => EnvironmentProvider::from_vars(vars.iter().cloned()),
            None if self.restricted_env => EnvironmentProvider::live(),
            None => EnvironmentProvider::snapshot(),
        };
        let provider = match &self.settings.env_prefix {
            Some(prefix) => provider.with_prefix(prefix.clone()),
            None => provider,
        };
        let mapper = CachingMapper::new(
            EnvironmentMapper::new().with_list_shortcut(self.settings.env_list_shortcut),
        );
        let source = ConfigurationPropertySource::new(provider, mapper);
        if self.restricted_env {
            source.restricted()
        } else {
            source
        }
    }

    /// Resolves the effective list of search paths.
    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if self.search_paths.is_empty() {
            let mut paths = Vec::new();
            if let Ok(cwd) = std::env::current_dir() {
                paths.push(cwd);
            }
            if let Some(config_dir) = dirs::config_dir() {
                paths.push(config_dir.join("relaxed"));
            }
            paths
        } else {
            self.search_paths.clone()
        }
    }

    /// Returns the files to load, highest precedence first.
    ///
    /// The first search path holding a profile-specific or main file wins.
    fn config_files(&self) -> LoaderResult<Vec<PathBuf>> {
        if let Some(path) = &self.config_file {
            if !path.is_file() {
                return Err(LoaderError::FileNotFound(path.clone()));
            }
            return Ok(vec![path.clone()]);
        }

        let base = &self.settings.base_name;
        for search_path in self.resolve_search_paths() {
            let profile_files = FileFormat::extensions()
                .iter()
                .map(|ext| search_path.join(format!("{base}-{}.{ext}", self.profile.as_str())));
            let main_files = FileFormat::extensions()
                .iter()
                .map(|ext| search_path.join(format!("{base}.{ext}")));
            let found: Vec<PathBuf> = profile_files
                .chain(main_files)
                .filter(|path| path.is_file())
                .collect();
            if !found.is_empty() {
                return Ok(found);
            }
        }

        warn!("No configuration file found, using defaults");
        Ok(Vec::new())
    }
}
