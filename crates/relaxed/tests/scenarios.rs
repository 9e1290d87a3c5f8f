//! End-to-end behavior across loader, resolver and migration.

use std::collections::HashMap;

use relaxed::migrate::{MigrationOutcome, PropertyMetadata};
use relaxed::prelude::*;
use relaxed::core::{ProviderError, ProviderResult, TextLocation};

fn name(s: &str) -> PropertyName {
    PropertyName::parse(s).unwrap()
}

fn dotted(provider: MapProvider) -> ConfigurationPropertySource {
    ConfigurationPropertySource::new(provider, DottedMapper)
}

fn env(provider: MapProvider) -> ConfigurationPropertySource {
    ConfigurationPropertySource::new(provider, EnvironmentMapper::new())
}

/// Answers point queries only and fails for selected keys.
struct Vault {
    values: HashMap<&'static str, &'static str>,
    broken: &'static str,
}

impl RawPropertyProvider for Vault {
    fn name(&self) -> &str {
        "vault"
    }

    fn get(&self, key: &str) -> ProviderResult<Option<PropertyValue>> {
        if key == self.broken {
            return Err(ProviderError::Unavailable("vault sealed".into()));
        }
        Ok(self.values.get(key).map(|v| PropertyValue::from(*v)))
    }
}

#[test]
fn test_file_wins_over_later_environment() {
    let chain: SourceChain = [
        dotted(MapProvider::new("file").with("server.port", 8080)),
        env(MapProvider::new("env").with("SERVER_PORT", "9090")),
    ]
    .into_iter()
    .collect();

    let port = Resolver::new(&chain).resolve(&name("server.port")).unwrap();
    assert_eq!(port.value(), &PropertyValue::Integer(8080));
    assert_eq!(port.origin().source(), "file");
    assert_eq!(port.origin().key(), "server.port");
}

#[test]
fn test_lookup_only_source() {
    let vault = Vault {
        values: HashMap::from([("SERVER_PORT", "7070")]),
        broken: "",
    };
    let source = ConfigurationPropertySource::new(vault, EnvironmentMapper::new());
    assert_eq!(source.capability(), Capability::LookupOnly);
    assert_eq!(
        source.contains_descendant_of(&name("server")),
        Containment::Unknown
    );

    let chain: SourceChain = [source].into_iter().collect();
    let port = Resolver::new(&chain).resolve(&name("server.port")).unwrap();
    assert_eq!(port.value(), &PropertyValue::from("7070"));
}

#[test]
fn test_precedence_and_remove() {
    let mut chain: SourceChain = [
        dotted(MapProvider::new("a").with("k", "A")),
        dotted(MapProvider::new("b").with("k", "B")),
    ]
    .into_iter()
    .collect();

    assert_eq!(
        Resolver::new(&chain).resolve(&name("k")).unwrap().into_value(),
        PropertyValue::from("A")
    );
    chain.remove("a");
    assert_eq!(
        Resolver::new(&chain).resolve(&name("k")).unwrap().into_value(),
        PropertyValue::from("B")
    );
}

#[test]
fn test_failing_source_is_isolated() {
    let vault = Vault {
        values: HashMap::from([("DB_USER", "admin")]),
        broken: "DB_PASSWORD",
    };
    let chain: SourceChain = [
        ConfigurationPropertySource::new(vault, EnvironmentMapper::new()),
        dotted(
            MapProvider::new("file")
                .with("db.password", "secret")
                .with("db.user", "guest"),
        ),
    ]
    .into_iter()
    .collect();
    let resolver = Resolver::new(&chain);

    let password = resolver.resolve(&name("db.password")).unwrap();
    assert_eq!(password.origin().source(), "file");
    let user = resolver.resolve(&name("db.user")).unwrap();
    assert_eq!(user.value(), &PropertyValue::from("admin"));
}

#[test]
fn test_indexed_matching() {
    for key in ["list[0].value", "list.0.value"] {
        let chain: SourceChain = [dotted(MapProvider::new("file").with(key, "x"))]
            .into_iter()
            .collect();
        let property = Resolver::new(&chain)
            .resolve(&name("list[0].value"))
            .unwrap();
        assert_eq!(property.value(), &PropertyValue::from("x"));
        assert_eq!(property.origin().key(), key);
    }
}

fn context_path_table() -> MetadataTable {
    MetadataTable::new()
        .with(PropertyMetadata::new("server.servlet.context-path", "String"))
        .unwrap()
        .with(
            PropertyMetadata::new("server.context-path", "String")
                .replaced_by("server.servlet.context-path"),
        )
        .unwrap()
}

#[test]
fn test_migration_matched() {
    let table = context_path_table();
    let mut chain: SourceChain = [dotted(MapProvider::new("File").with_location(
        "server.context-path",
        "/app",
        TextLocation::new(2, 1),
    ))]
    .into_iter()
    .collect();

    let report = MigrationAnalyzer::new(&table).analyze(&mut chain).unwrap();
    let file = report.source("File").unwrap();
    assert_eq!(file.matched.len(), 1);
    assert_eq!(file.matched[0].outcome, MigrationOutcome::Matched);
    assert!(chain.contains("migrate-File"));

    let property = Resolver::new(&chain)
        .resolve(&name("server.servlet.context-path"))
        .unwrap();
    assert_eq!(property.value(), &PropertyValue::from("/app"));
    assert_eq!(property.origin().source(), "File");
    assert_eq!(property.origin().key(), "server.context-path");
    assert_eq!(property.origin().location(), Some(TextLocation::new(2, 1)));
}

#[test]
fn test_migration_unhandled_type_mismatch() {
    let table = MetadataTable::new()
        .with(PropertyMetadata::new("server.servlet.context-path", "String"))
        .unwrap()
        .with(
            PropertyMetadata::new("server.context-path", "Integer")
                .replaced_by("server.servlet.context-path"),
        )
        .unwrap();
    let mut chain: SourceChain = [dotted(
        MapProvider::new("File").with("server.context-path", 1),
    )]
    .into_iter()
    .collect();

    let report = MigrationAnalyzer::new(&table).analyze(&mut chain).unwrap();
    assert_eq!(report.unhandled().count(), 1);
    assert_eq!(report.matched().count(), 0);
    assert_eq!(chain.names(), vec!["File"]);
    assert!(
        Resolver::new(&chain)
            .resolve(&name("server.servlet.context-path"))
            .is_none()
    );
}

#[cfg(feature = "toml-config")]
#[test]
fn test_loader_and_migration_together() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("application.toml"),
        "[server]\ncontext-path = \"/legacy\"\nport = 8080\n",
    )
    .unwrap();

    let mut chain = EnvironmentLoader::new()
        .profile("dev")
        .search_path(dir.path())
        .env_vars([("SERVER_PORT", "9000")])
        .load()
        .unwrap();
    let file_source = chain.names()[1].to_string();

    let table = context_path_table();
    let report = MigrationAnalyzer::new(&table).analyze(&mut chain).unwrap();
    assert_eq!(report.source(&file_source).unwrap().matched.len(), 1);
    assert!(report.source("systemEnvironment").unwrap().is_empty());
    assert_eq!(
        chain.position(&format!("migrate-{file_source}")),
        chain.position(&file_source).map(|p| p - 1)
    );

    let resolver = Resolver::new(&chain);
    let path = resolver.resolve_str("server.servlet.contextPath").unwrap().unwrap();
    assert_eq!(path.value(), &PropertyValue::from("/legacy"));
    assert_eq!(path.origin().source(), file_source);

    let port = resolver.resolve_str("server.port").unwrap().unwrap();
    assert_eq!(port.value(), &PropertyValue::from("9000"));
}
