/// End-to-end tests for config file loading and CLI option merging.
///
/// These tests exercise the full flow from config file on disk through CLI invocation
/// to correct output, using `assert_cmd` and `tempfile` for isolated test environments.
mod test_utilities;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use httpmock::MockServer;
use test_utilities::metadata_service::{mock_package, unreachable_base_url};

// ============================================================================
// Helper Functions
// ============================================================================

fn server() -> MockServer {
    let server = MockServer::start();
    mock_package(
        &server,
        "npm:app:1.0.0",
        &["npm:left:1.0.0", "npm:jest:29.0.0", "npm:lodash:4.17.20"],
    );
    mock_package(&server, "npm:left:1.0.0", &[]);
    mock_package(&server, "npm:jest:29.0.0", &["npm:left:1.0.0"]);
    mock_package(&server, "npm:lodash:4.17.20", &[]);
    mock_package(&server, "npm:lodash:4.17.21", &[]);
    server
}

/// Write a config file at the specified path.
fn write_config(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

// ============================================================================
// Auto-discovery
// ============================================================================

#[test]
fn test_discovered_config_applies_format_exclusions_and_overrides() {
    let server = server();
    let dir = TempDir::new().unwrap();
    write_config(
        &dir.path().join("depgraph.config.yml"),
        &format!(
            r#"
format: list
base_url: {}
exclude:
  - jest
overrides:
  lodash: 4.17.21
"#,
            server.base_url()
        ),
    );

    cargo_bin_cmd!("depgraph-sbom")
        .current_dir(dir.path())
        .arg("npm:app:1.0.0")
        .assert()
        .code(0)
        .stdout(predicate::eq(
            "npm:app:1.0.0\nnpm:left:1.0.0\nnpm:lodash:4.17.21\n",
        ));
}

#[test]
fn test_cli_format_overrides_config_format() {
    let server = server();
    let dir = TempDir::new().unwrap();
    write_config(
        &dir.path().join("depgraph.config.yml"),
        &format!("format: json\nbase_url: {}\n", server.base_url()),
    );

    cargo_bin_cmd!("depgraph-sbom")
        .current_dir(dir.path())
        .args(["-f", "list", "npm:left:1.0.0"])
        .assert()
        .code(0)
        .stdout(predicate::eq("npm:left:1.0.0\n"));
}

#[test]
fn test_cli_and_config_exclusions_merge() {
    let server = server();
    let dir = TempDir::new().unwrap();
    write_config(
        &dir.path().join("depgraph.config.yml"),
        &format!("format: list\nbase_url: {}\nexclude:\n  - jest\n", server.base_url()),
    );

    cargo_bin_cmd!("depgraph-sbom")
        .current_dir(dir.path())
        .args(["-e", "lodash", "npm:app:1.0.0"])
        .assert()
        .code(0)
        .stdout(predicate::eq("npm:app:1.0.0\nnpm:left:1.0.0\n"));
}

#[test]
fn test_cli_override_beats_config_override() {
    let server = server();
    let dir = TempDir::new().unwrap();
    write_config(
        &dir.path().join("depgraph.config.yml"),
        &format!(
            "format: list\nbase_url: {}\noverrides:\n  lodash: 4.17.21\n",
            server.base_url()
        ),
    );

    cargo_bin_cmd!("depgraph-sbom")
        .current_dir(dir.path())
        .args(["-O", "lodash=4.17.20", "-e", "jest", "npm:app:1.0.0"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("npm:lodash:4.17.20"))
        .stdout(predicate::str::contains("4.17.21").not());
}

// ============================================================================
// Explicit --config
// ============================================================================

#[test]
fn test_explicit_config_path() {
    let server = server();
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("custom.yml");
    write_config(
        &config_path,
        &format!("format: list\nbase_url: {}\n", server.base_url()),
    );

    cargo_bin_cmd!("depgraph-sbom")
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config_path)
        .arg("npm:left:1.0.0")
        .assert()
        .code(0)
        .stdout(predicate::eq("npm:left:1.0.0\n"));
}

#[test]
fn test_explicit_config_missing_is_error() {
    let dir = TempDir::new().unwrap();

    cargo_bin_cmd!("depgraph-sbom")
        .current_dir(dir.path())
        .args(["--config", "nope.yml", "npm:left:1.0.0"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Failed to read config file"));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_invalid_yaml_is_error() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir.path().join("depgraph.config.yml"),
        "format: [[[broken",
    );

    cargo_bin_cmd!("depgraph-sbom")
        .current_dir(dir.path())
        .arg("npm:left:1.0.0")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_invalid_config_value_is_error() {
    let dir = TempDir::new().unwrap();
    write_config(&dir.path().join("depgraph.config.yml"), "concurrency: 500\n");

    cargo_bin_cmd!("depgraph-sbom")
        .current_dir(dir.path())
        .arg("npm:left:1.0.0")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("concurrency must be between 1 and 64"));
}

#[test]
fn test_unknown_config_field_warns() {
    let server = server();
    let dir = TempDir::new().unwrap();
    write_config(
        &dir.path().join("depgraph.config.yml"),
        &format!(
            "format: list\nbase_url: {}\ncheck_cve: true\n",
            server.base_url()
        ),
    );

    cargo_bin_cmd!("depgraph-sbom")
        .current_dir(dir.path())
        .arg("npm:left:1.0.0")
        .assert()
        .code(0)
        .stderr(predicate::str::contains(
            "Unknown config field 'check_cve' will be ignored",
        ));
}

#[test]
fn test_config_continue_on_error() {
    let dir = TempDir::new().unwrap();
    let unreachable = unreachable_base_url();
    write_config(
        &dir.path().join("depgraph.config.yml"),
        &format!(
            "format: list\nbase_url: {}\ncontinue_on_error: true\n",
            unreachable
        ),
    );

    cargo_bin_cmd!("depgraph-sbom")
        .current_dir(dir.path())
        .arg("npm:left:1.0.0")
        .assert()
        .code(1)
        .stdout(predicate::eq("npm:left:1.0.0\n"));
}
