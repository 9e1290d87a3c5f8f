//! The outcome of a migration run.

use relaxed_core::{ConfigurationProperty, PropertyName};
use serde::Serialize;

use crate::metadata::DeprecationLevel;

/// Whether a deprecated key could be mapped onto its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MigrationOutcome {
    /// The value was copied to the replacement key.
    Matched,
    /// No compatible replacement exists; the user must act.
    Unhandled,
}

/// One deprecated key found in a source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyProperty {
    /// The deprecated name together with the value and origin found for it.
    pub property: ConfigurationProperty,
    /// The declared replacement, if any.
    pub replacement: Option<PropertyName>,
    /// Severity of the deprecation.
    pub level: DeprecationLevel,
    /// Why the property was deprecated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Classification.
    pub outcome: MigrationOutcome,
}

impl LegacyProperty {
    /// The deprecated name.
    pub fn name(&self) -> &PropertyName {
        self.property.name()
    }

    fn describe(&self, out: &mut String) {
        out.push_str(&format!("\tKey: {}\n", self.name()));
        out.push_str(&format!("\t\tOrigin: {}\n", self.property.origin()));
        match (&self.replacement, self.outcome) {
            (Some(replacement), MigrationOutcome::Matched) => {
                out.push_str(&format!("\t\tReplacement: {replacement}\n"));
            }
            (Some(replacement), MigrationOutcome::Unhandled) => {
                out.push_str(&format!(
                    "\t\tReason: Replacement key '{replacement}' uses an incompatible target type\n"
                ));
            }
            (None, _) => {
                let reason = self.reason.as_deref().unwrap_or("none");
                out.push_str(&format!("\t\tReason: {reason}\n"));
            }
        }
    }
}

/// Deprecated keys found in one source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceReport {
    /// Name of the inspected source.
    pub source: String,
    /// Keys copied to their replacement.
    pub matched: Vec<LegacyProperty>,
    /// Keys that need manual attention.
    pub unhandled: Vec<LegacyProperty>,
}

impl SourceReport {
    pub(crate) fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    pub(crate) fn push(&mut self, property: LegacyProperty) {
        match property.outcome {
            MigrationOutcome::Matched => self.matched.push(property),
            MigrationOutcome::Unhandled => self.unhandled.push(property),
        }
    }

    /// Returns `true` if no deprecated key was found.
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty() && self.unhandled.is_empty()
    }
}

/// Per-source findings of one migration run, in chain order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MigrationReport {
    sources: Vec<SourceReport>,
}

impl MigrationReport {
    pub(crate) fn push(&mut self, report: SourceReport) {
        self.sources.push(report);
    }

    /// Every inspected source, including those without findings.
    pub fn sources(&self) -> &[SourceReport] {
        &self.sources
    }

    /// The findings for the named source.
    pub fn source(&self, name: &str) -> Option<&SourceReport> {
        self.sources.iter().find(|s| s.source == name)
    }

    /// Iterates every matched key across all sources.
    pub fn matched(&self) -> impl Iterator<Item = &LegacyProperty> {
        self.sources.iter().flat_map(|s| s.matched.iter())
    }

    /// Iterates every unhandled key across all sources.
    pub fn unhandled(&self) -> impl Iterator<Item = &LegacyProperty> {
        self.sources.iter().flat_map(|s| s.unhandled.iter())
    }

    /// Returns `true` if any key needs manual attention.
    pub fn has_unhandled(&self) -> bool {
        self.unhandled().next().is_some()
    }

    /// Returns `true` if no deprecated key was found anywhere.
    pub fn is_empty(&self) -> bool {
        self.sources.iter().all(SourceReport::is_empty)
    }

    /// Human readable summary of renamed keys, or `None` if there are none.
    pub fn renamed_summary(&self) -> Option<String> {
        self.summarize(
            "The use of configuration keys that have been renamed was found in the environment:",
            "Each configuration key has been temporarily mapped to its replacement for your convenience. To silence this warning, please update your configuration to use the new keys.",
            |s| &s.matched,
        )
    }

    /// Human readable summary of unsupported keys, or `None` if there are none.
    pub fn unsupported_summary(&self) -> Option<String> {
        self.summarize(
            "The use of configuration keys that are no longer supported was found in the environment:",
            "Please refer to the release notes or reference guide for potential alternatives.",
            |s| &s.unhandled,
        )
    }

    /// Both summaries joined, or `None` if nothing was found.
    pub fn summary(&self) -> Option<String> {
        match (self.renamed_summary(), self.unsupported_summary()) {
            (None, None) => None,
            (Some(renamed), None) => Some(renamed),
            (None, Some(unsupported)) => Some(unsupported),
            (Some(renamed), Some(unsupported)) => Some(format!("{renamed}\n{unsupported}")),
        }
    }

    fn summarize(
        &self,
        header: &str,
        footer: &str,
        select: impl Fn(&SourceReport) -> &Vec<LegacyProperty>,
    ) -> Option<String> {
        let mut out = String::new();
        for source in &self.sources {
            let properties = select(source);
            if properties.is_empty() {
                continue;
            }
            out.push_str(&format!("Property source '{}':\n", source.source));
            let mut sorted: Vec<_> = properties.iter().collect();
            sorted.sort_by(|a, b| a.name().cmp(b.name()));
            for property in sorted {
                property.describe(&mut out);
            }
            out.push('\n');
        }
        if out.is_empty() {
            return None;
        }
        Some(format!("\n{header}\n\n{out}\n{footer}\n"))
    }
}
