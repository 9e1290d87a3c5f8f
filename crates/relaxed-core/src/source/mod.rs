//! Raw providers and the configuration property sources wrapping them.

mod configuration;
mod map;

pub use configuration::ConfigurationPropertySource;
pub use map::MapProvider;

use crate::error::ProviderResult;
use crate::property::{Origin, PropertyValue};

/// Whether a provider can list its keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// All raw keys can be listed, enabling descendant queries.
    Enumerable,
    /// Only point lookups by raw key are possible.
    LookupOnly,
}

/// Answer to "does anything live under this name".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Containment {
    /// At least one descendant exists.
    Present,
    /// No descendant exists.
    Absent,
    /// The source cannot tell.
    Unknown,
}

/// The raw key/value capability a collaborator supplies for one source.
///
/// Implementations must be safe for concurrent reads.
pub trait RawPropertyProvider: Send + Sync {
    /// The name used to address the source inside a chain.
    fn name(&self) -> &str;

    /// Looks up a raw key. `Ok(None)` means the key is absent.
    fn get(&self, key: &str) -> ProviderResult<Option<PropertyValue>>;

    /// Whether [`keys`](Self::keys) is meaningful.
    fn capability(&self) -> Capability {
        Capability::LookupOnly
    }

    /// Lists every raw key. Only called on enumerable providers.
    fn keys(&self) -> Vec<String> {
        Vec::new()
    }

    /// A provider specific origin for `key`, such as a file position.
    fn origin(&self, _key: &str) -> Option<Origin> {
        None
    }
}
