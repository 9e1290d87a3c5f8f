//! Detection of deprecated keys and their migration onto replacements.

use relaxed_core::{
    ChainResult, ConfigurationPropertySource, DottedMapper, MapProvider, PropertyName, SourceChain,
};
use tracing::{debug, info, warn};

use crate::metadata::{
    DeprecationLevel, MetadataTable, PropertyMetadata, map_value_type, normalize_type,
};
use crate::report::{LegacyProperty, MigrationOutcome, MigrationReport, SourceReport};

/// Name prefix of the synthetic sources created by migration.
pub const MIGRATED_SOURCE_PREFIX: &str = "migrate-";

/// Where a synthetic source is placed relative to the source it was derived
/// from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertionPolicy {
    /// Immediately before: replacement keys win over any value the original
    /// source supplies for them directly.
    #[default]
    Before,
    /// Immediately after: values already present under the replacement key
    /// in the original source win.
    After,
}

/// Scans a chain for deprecated keys and adds synthetic sources mapping
/// their values onto the replacement keys.
#[derive(Debug, Clone, Copy)]
pub struct MigrationAnalyzer<'a> {
    table: &'a MetadataTable,
    policy: InsertionPolicy,
}

impl<'a> MigrationAnalyzer<'a> {
    /// Creates an analyzer over `table`.
    pub fn new(table: &'a MetadataTable) -> Self {
        Self {
            table,
            policy: InsertionPolicy::default(),
        }
    }

    /// Sets the insertion policy.
    pub fn with_policy(mut self, policy: InsertionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Analyzes every source of `chain` and inserts one `migrate-<name>`
    /// source per source that has matched keys.
    ///
    /// Sources generated by an earlier run are recognized by their origin
    /// marker and are not inspected. They are replaced when their source
    /// still has matches and removed when it no longer does, so running the
    /// analyzer twice leaves the chain unchanged.
    pub fn analyze(&self, chain: &mut SourceChain) -> ChainResult<MigrationReport> {
        let (generated, sources): (Vec<_>, Vec<_>) = chain
            .iter()
            .cloned()
            .partition(|s| is_migrated(s));

        let mut report = MigrationReport::default();
        for source in &sources {
            let source_report = self.analyze_source(source);
            let migrated_name = migrated_source_name(source.name());
            if !source_report.matched.is_empty() {
                let migrated = migrated_source(&source_report);
                match self.policy {
                    InsertionPolicy::Before => chain.insert_before(source.name(), migrated)?,
                    InsertionPolicy::After => chain.insert_after(source.name(), migrated)?,
                }
            } else if generated.iter().any(|g| g.name() == migrated_name) {
                debug!(source = %source.name(), "Removing stale migrated source");
                chain.remove(&migrated_name);
            }
            report.push(source_report);
        }
        for stale in &generated {
            let orphaned = stale
                .origin_source()
                .is_none_or(|origin| !sources.iter().any(|s| s.name() == origin));
            if orphaned && chain.get(stale.name()).is_some_and(|s| is_migrated(s)) {
                debug!(source = %stale.name(), "Removing migrated source without origin");
                chain.remove(stale.name());
            }
        }

        if let Some(summary) = report.renamed_summary() {
            warn!("{summary}");
        }
        if let Some(summary) = report.unsupported_summary() {
            warn!("{summary}");
        }
        Ok(report)
    }

    fn analyze_source(&self, source: &ConfigurationPropertySource) -> SourceReport {
        let mut report = SourceReport::new(source.name());
        // Warning-level keys still work under their old name.
        let removed = self.table.deprecated().filter(|(_, metadata)| {
            metadata
                .deprecation
                .as_ref()
                .is_some_and(|d| d.level == DeprecationLevel::Error)
        });
        for (name, metadata) in removed {
            let property = match source.get_configuration_property(name) {
                Ok(Some(property)) => property,
                Ok(None) => continue,
                Err(error) => {
                    warn!(source = %source.name(), name = %name, %error, "Skipping deprecated key lookup");
                    continue;
                }
            };
            let Some(deprecation) = metadata.deprecation.as_ref() else {
                continue;
            };
            let declared = deprecation
                .replacement
                .as_deref()
                .and_then(|r| PropertyName::parse(r).ok());
            let outcome = match &declared {
                Some(replacement) if self.is_compatible(metadata, replacement) => {
                    info!(source = %source.name(), deprecated = %name, %replacement, "Migrating deprecated key");
                    MigrationOutcome::Matched
                }
                _ => {
                    debug!(source = %source.name(), deprecated = %name, "Deprecated key has no compatible replacement");
                    MigrationOutcome::Unhandled
                }
            };
            report.push(LegacyProperty {
                property,
                replacement: declared,
                level: deprecation.level,
                reason: deprecation.reason.clone(),
                outcome,
            });
        }
        report
    }

    /// A replacement is compatible if it has the same declared type as the
    /// deprecated key, or if its parent is a map whose value type does.
    fn is_compatible(&self, deprecated: &PropertyMetadata, replacement: &PropertyName) -> bool {
        let Some(deprecated_type) = deprecated.value_type.as_deref().map(normalize_type) else {
            return false;
        };
        if let Some(target) = self.table.get(replacement) {
            return target
                .value_type
                .as_deref()
                .is_some_and(|t| normalize_type(t) == deprecated_type);
        }
        replacement
            .parent()
            .and_then(|parent| self.table.get(&parent))
            .and_then(|parent| parent.value_type.as_deref())
            .and_then(map_value_type)
            .is_some_and(|value_type| value_type == deprecated_type)
    }
}

fn migrated_source_name(source: &str) -> String {
    format!("{MIGRATED_SOURCE_PREFIX}{source}")
}

fn is_migrated(source: &ConfigurationPropertySource) -> bool {
    source
        .origin_source()
        .is_some_and(|origin| source.name() == migrated_source_name(origin))
}

fn migrated_source(report: &SourceReport) -> ConfigurationPropertySource {
    let mut provider = MapProvider::new(migrated_source_name(&report.source));
    for legacy in &report.matched {
        if let Some(replacement) = &legacy.replacement {
            provider.insert_with_origin(
                replacement.to_string(),
                legacy.property.value().clone(),
                legacy.property.origin().clone(),
            );
        }
    }
    ConfigurationPropertySource::new(provider, DottedMapper).derived_from(report.source.clone())
}
