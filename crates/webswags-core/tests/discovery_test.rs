//! Discovery tests against the fixture project tree

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use webswags_core::{discover, Format, SchemaKind, SpecDocument, SpecView};

/// Get the fixture project directory
fn fixture_root() -> Result<PathBuf> {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .map(|p| p.join("tests/fixtures/project"))
        .context("Failed to determine fixture directory")
}

fn names(specs: &[SpecDocument]) -> Vec<&str> {
    specs.iter().map(|s| s.service.as_str()).collect()
}

#[test]
fn test_fixture_tree_is_discovered_and_sorted() -> Result<()> {
    let specs = discover(fixture_root()?)?;
    assert_eq!(
        names(&specs),
        vec!["Loyalty", "Payments", "Petstore", "User Service"]
    );
    for pair in specs.windows(2) {
        assert!(pair[0].service <= pair[1].service);
    }
    Ok(())
}

#[test]
fn test_discovery_is_idempotent() -> Result<()> {
    let root = fixture_root()?;
    let first = serde_json::to_value(discover(&root)?)?;
    let second = serde_json::to_value(discover(&root)?)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_records_hold_the_invariants() -> Result<()> {
    for spec in discover(fixture_root()?)? {
        let both = spec.openapi_document().is_some() && spec.swagger_document().is_some();
        let neither = spec.openapi_document().is_none() && spec.swagger_document().is_none();
        assert!(!both && !neither, "{} has an ambiguous schema", spec.path.display());

        for field in [spec.title(), spec.version(), spec.description()] {
            assert_eq!(field, field.trim());
        }
        assert!(!spec.name.is_empty());
        assert_eq!(spec.name, spec.service);
    }
    Ok(())
}

#[test]
fn test_title_and_path_derived_names() -> Result<()> {
    let specs = discover(fixture_root()?)?;

    let loyalty = &specs[0];
    assert_eq!(loyalty.title(), "loyalty");
    assert_eq!(loyalty.description(), "Points, tiers and rewards.");
    assert_eq!(loyalty.schema_kind(), SchemaKind::OpenApi3);
    assert_eq!(loyalty.version_string(), "3.0.3");
    assert_eq!(loyalty.info.license.as_ref().map(|l| l.name.as_str()), Some("MIT"));

    let payments = &specs[1];
    assert_eq!(payments.title(), "");
    assert_eq!(payments.schema_kind(), SchemaKind::Swagger2);
    assert_eq!(payments.format, Format::Json);

    let petstore = &specs[2];
    assert_eq!(petstore.file_name, "swagger.json");
    assert_eq!(
        petstore.info.contact.as_ref().map(|c| c.email.as_str()),
        Some("pets@example.com")
    );

    let users = &specs[3];
    assert_eq!(users.version_string(), "3.1.0");
    let SpecView::OpenApi3 { view, .. } = &users.view else {
        panic!("expected an OpenAPI 3 view");
    };
    assert!(view.webhooks.is_some());
    assert_eq!(
        view.json_schema_dialect.as_deref(),
        Some("https://spec.openapis.org/oas/3.1/dialect/base")
    );
    Ok(())
}

#[test]
fn test_raw_bytes_are_kept_verbatim() -> Result<()> {
    let root = fixture_root()?;
    for spec in discover(&root)? {
        assert_eq!(spec.raw, fs::read(&spec.path)?);
    }
    Ok(())
}

#[test]
fn test_plain_config_skipped_but_siblings_found() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let spec_dir = dir.path().join("inventory").join("spec");
    fs::create_dir_all(&spec_dir)?;
    fs::write(spec_dir.join("settings.yaml"), "retries: 3\ncache:\n  ttl: 60\n")?;
    fs::write(spec_dir.join("inventory.yaml"), "swagger: \"2.0\"\ninfo:\n  version: 1.0\n")?;

    let specs = discover(dir.path())?;
    assert_eq!(names(&specs), vec!["Inventory"]);
    assert_eq!(specs[0].format, Format::Yaml);
    assert_eq!(specs[0].schema_kind(), SchemaKind::Swagger2);
    assert_eq!(specs[0].version(), "1.0");
    Ok(())
}

#[test]
fn test_openapi3_typed_view_of_fixture() -> Result<()> {
    let specs = discover(fixture_root()?)?;
    let loyalty = specs[0]
        .openapi_document()
        .context("loyalty should be OpenAPI 3")?;
    let typed = loyalty.typed()?;
    assert_eq!(typed.info.title, "  loyalty  ");
    assert!(typed.paths.paths.contains_key("/members/{id}"));
    Ok(())
}
