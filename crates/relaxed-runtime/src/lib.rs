//! Relaxed Runtime - environment, file and logging integration.
//!
//! This crate provides:
//! - Raw providers for the process environment and TOML/YAML files
//! - Source chain bootstrap with profiles (`EnvironmentLoader`)
//! - Logging configuration read through the resolution engine
//!
//! ```ignore
//! use relaxed_core::{PropertyName, Resolver};
//! use relaxed_runtime::{EnvironmentLoader, logging};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let chain = EnvironmentLoader::new()
//!         .default_property("server.port", 8080)
//!         .load()?;
//!     let resolver = Resolver::new(&chain);
//!     logging::init_from_resolver(&resolver);
//!
//!     let port = resolver.resolve(&PropertyName::parse("server.port")?);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod loader;
pub mod logging;
pub mod providers;

// Re-exports
pub use error::{LoaderError, LoaderResult};
pub use loader::{EnvironmentLoader, LoaderSettings, Profile};
pub use logging::{LogFormat, LogOutput, LoggingBuilder, LoggingSettings};
pub use providers::{EnvironmentProvider, FileFormat, load_file};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, instrument, span, trace, warn};
}
