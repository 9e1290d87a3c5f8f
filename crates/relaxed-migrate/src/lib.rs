//! # Relaxed Migrate
//!
//! Finds deprecated configuration keys in a [`SourceChain`] and keeps old
//! configuration working by mapping their values onto the replacement keys.
//!
//! For every source that uses deprecated keys with a compatible replacement
//! the analyzer inserts a synthetic `migrate-<source>` source next to it. The
//! original source is never modified, and every migrated value keeps the
//! origin of the deprecated key it came from.
//!
//! ```
//! use relaxed_core::{
//!     ConfigurationPropertySource, DottedMapper, MapProvider, PropertyName, Resolver,
//!     SourceChain,
//! };
//! use relaxed_migrate::{MetadataTable, MigrationAnalyzer};
//!
//! let table = MetadataTable::from_json(r#"{"properties":[
//!     {"name":"server.servlet.context-path","type":"String"},
//!     {"name":"server.context-path","type":"String",
//!      "deprecation":{"level":"error","replacement":"server.servlet.context-path"}}
//! ]}"#).unwrap();
//!
//! let mut chain: SourceChain = [ConfigurationPropertySource::new(
//!     MapProvider::new("application.toml").with("server.context-path", "/api"),
//!     DottedMapper,
//! )]
//! .into_iter()
//! .collect();
//!
//! let report = MigrationAnalyzer::new(&table).analyze(&mut chain).unwrap();
//! assert_eq!(report.matched().count(), 1);
//!
//! let name = PropertyName::parse("server.servlet.context-path").unwrap();
//! let property = Resolver::new(&chain).resolve(&name).unwrap();
//! assert_eq!(property.origin().key(), "server.context-path");
//! ```
//!
//! [`SourceChain`]: relaxed_core::SourceChain

pub mod analyzer;
pub mod error;
pub mod metadata;
pub mod report;

pub use analyzer::{InsertionPolicy, MIGRATED_SOURCE_PREFIX, MigrationAnalyzer};
pub use error::{MetadataError, MetadataResult};
pub use metadata::{Deprecation, DeprecationLevel, MetadataTable, PropertyMetadata};
pub use report::{LegacyProperty, MigrationOutcome, MigrationReport, SourceReport};
