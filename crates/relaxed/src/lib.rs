//! # Relaxed
//!
//! Relaxed configuration property resolution for Rust.
//!
//! ## Overview
//!
//! One logical key such as `server.port` can be supplied by many sources in
//! many spellings: `server.port` in `application.toml`, `SERVER_PORT` in the
//! process environment, `server.PORT` in a programmatic map. Relaxed
//! canonicalizes every spelling, resolves names against an ordered chain of
//! sources and reports where each value came from. Deprecated keys can be
//! bridged onto their replacements without touching the original sources.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌───────────────────────────┐
//! │   Loader     │────▶│ SourceChain │────▶│ Resolver                  │──▶ value + origin
//! │ (env, files) │     │             │     └───────────────────────────┘
//! └──────────────┘     │             │◀────  MigrationAnalyzer (adds migrate-<source>)
//!                      └─────────────┘
//! ```
//!
//! - **Core**: canonical names, dialect mappers, sources, chain and resolver
//! - **Migrate**: deprecation metadata and the migration analyzer
//! - **Runtime**: environment and file providers, bootstrap, logging
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use relaxed::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut chain = EnvironmentLoader::new()
//!         .default_property("server.port", 8080)
//!         .load()?;
//!
//!     let table = MetadataTable::from_path("metadata.json")?;
//!     let report = MigrationAnalyzer::new(&table).analyze(&mut chain)?;
//!
//!     let resolver = Resolver::new(&chain);
//!     relaxed::runtime::logging::init_from_resolver(&resolver);
//!     if let Some(summary) = report.summary() {
//!         warn!("{summary}");
//!     }
//!
//!     let port = resolver.resolve_str("server.port")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use relaxed_core as core;
pub use relaxed_migrate as migrate;
pub use relaxed_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use relaxed::prelude::*;
/// ```
pub mod prelude {
    // Names, values and resolution
    pub use relaxed_core::{
        ConfigurationProperty, Containment, Origin, PropertyName, PropertyValue, Resolver,
        SourceChain,
    };

    // Sources and mappers, for custom providers
    pub use relaxed_core::{
        Capability, ConfigurationPropertySource, DottedMapper, EnvironmentMapper, MapProvider,
        RawPropertyProvider,
    };

    // Migration
    pub use relaxed_migrate::{InsertionPolicy, MetadataTable, MigrationAnalyzer, MigrationReport};

    // Bootstrap
    pub use relaxed_runtime::{EnvironmentLoader, EnvironmentProvider, Profile};

    // Logging macros
    pub use relaxed_runtime::prelude::*;
}
