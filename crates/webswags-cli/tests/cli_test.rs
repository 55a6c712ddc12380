//! End-to-end tests for the webswags CLI

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::process::{Command, Output};

/// Get the fixture project directory
fn fixture_root() -> Result<PathBuf> {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .map(|p| p.join("tests/fixtures/project"))
        .context("Failed to determine fixture directory")
}

fn webswags(args: &[&str]) -> Result<Output> {
    let output = Command::new(env!("CARGO_BIN_EXE_webswags"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .context("Failed to run webswags")?;
    Ok(output)
}

#[test]
fn test_list_json() -> Result<()> {
    let root = fixture_root()?;
    let output = webswags(&["list", "--json", "--root", &root.to_string_lossy()])?;
    if !output.status.success() {
        bail!("list failed: {}", String::from_utf8_lossy(&output.stderr));
    }

    let records: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let services: Vec<&str> = records
        .as_array()
        .context("expected a JSON array")?
        .iter()
        .filter_map(|r| r["service"].as_str())
        .collect();
    assert_eq!(services, vec!["Loyalty", "Payments", "Petstore", "User Service"]);
    assert_eq!(records[0]["openapiVersion"], "3.0.3");
    assert_eq!(records[1]["swaggerVersion"], "2.0");
    Ok(())
}

#[test]
fn test_list_table_counts_operations() -> Result<()> {
    let root = fixture_root()?;
    let output = webswags(&["list", "--root", &root.to_string_lossy()])?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let loyalty = stdout
        .lines()
        .find(|line| line.starts_with("Loyalty"))
        .context("Loyalty row missing")?;
    assert!(loyalty.contains("OpenAPI 3"));
    assert!(loyalty.contains("yaml     1  "));

    let payments = stdout
        .lines()
        .find(|line| line.starts_with("Payments"))
        .context("Payments row missing")?;
    assert!(payments.contains("Swagger 2"));
    assert!(payments.contains(" -  "));
    Ok(())
}

#[test]
fn test_missing_root_fails() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("nope");
    let output = webswags(&["list", "--root", &missing.to_string_lossy()])?;
    assert!(!output.status.success());
    Ok(())
}
