//! # Relaxed Core
//!
//! Relaxed configuration property resolution.
//!
//! A single logical key such as `server.port` may be supplied under many
//! spellings: `server.port` in a file, `serverPort`-style camelCase in an
//! in-memory map, `SERVER_PORT` in the process environment. This crate
//! canonicalizes those spellings and resolves a name against an ordered chain
//! of sources, returning the value together with where it came from.
//!
//! ## Data Flow
//!
//! ```text
//! RawPropertyProvider ──▶ PropertyMapper ──▶ ConfigurationPropertySource
//!                                                      │
//!                                   SourceChain ◀──────┘
//!                                        │
//!                                     Resolver ──▶ ConfigurationProperty
//! ```
//!
//! ## Example
//!
//! ```
//! use relaxed_core::{
//!     ConfigurationPropertySource, DottedMapper, EnvironmentMapper, MapProvider,
//!     PropertyName, PropertyValue, Resolver, SourceChain,
//! };
//!
//! let mut chain = SourceChain::new();
//! chain.add_last(ConfigurationPropertySource::new(
//!     MapProvider::new("application.toml").with("server.port", 8080),
//!     DottedMapper,
//! ));
//! chain.add_last(ConfigurationPropertySource::new(
//!     MapProvider::new("systemEnvironment").with("SERVER_PORT", "9090"),
//!     EnvironmentMapper::new(),
//! ));
//!
//! let port = Resolver::new(&chain)
//!     .resolve(&PropertyName::parse("server.port").unwrap())
//!     .unwrap();
//! assert_eq!(port.value(), &PropertyValue::Integer(8080));
//! assert_eq!(port.origin().source(), "application.toml");
//! ```

pub mod chain;
pub mod error;
pub mod mapper;
pub mod name;
pub mod property;
pub mod resolver;
pub mod source;

pub use chain::SourceChain;
pub use error::{
    ChainError, ChainResult, MappingFailure, MappingResult, NameError, NameResult, ProviderError,
    ProviderResult,
};
pub use mapper::{
    CachingMapper, Dialect, DottedMapper, EnvironmentMapper, MappingCache, PropertyMapper,
    PropertyMapping,
};
pub use name::{Element, PropertyName};
pub use property::{ConfigurationProperty, Origin, PropertyValue, TextLocation};
pub use resolver::Resolver;
pub use source::{
    Capability, ConfigurationPropertySource, Containment, MapProvider, RawPropertyProvider,
};
