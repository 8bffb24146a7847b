//! Configuration file support for depgraph-sbom.
//!
//! Provides YAML-based configuration through `depgraph.config.yml` files,
//! including data structures, file loading, and validation.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::application::dto::OutputFormat;
use crate::graph_resolution::policies::VersionOverrides;
use crate::graph_resolution::services::MAX_CONCURRENCY;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "depgraph.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub format: Option<String>,
    pub base_url: Option<String>,
    pub concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub continue_on_error: Option<bool>,
    pub exclude: Option<Vec<String>>,
    /// Forced versions keyed by package name
    pub overrides: Option<BTreeMap<String, String>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

impl ConfigFile {
    pub fn output_format(&self) -> Result<Option<OutputFormat>> {
        self.format
            .as_deref()
            .map(|f| f.parse::<OutputFormat>().map_err(anyhow::Error::msg))
            .transpose()
    }

    pub fn version_overrides(&self) -> Result<VersionOverrides> {
        match &self.overrides {
            Some(map) => VersionOverrides::from_map(map),
            None => Ok(VersionOverrides::new()),
        }
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

fn validate_config(config: &ConfigFile) -> Result<()> {
    config.output_format()?;
    config.version_overrides()?;

    if let Some(concurrency) = config.concurrency {
        if concurrency == 0 || concurrency > MAX_CONCURRENCY {
            bail!(
                "concurrency must be between 1 and {}, got {}.\n\n\
                 💡 Hint: The default of 8 suits most networks.",
                MAX_CONCURRENCY,
                concurrency
            );
        }
    }
    if config.timeout_secs == Some(0) {
        bail!("timeout_secs must be greater than zero.");
    }
    if let Some(base_url) = &config.base_url {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            bail!(
                "base_url must be an http(s) URL, got '{}'.\n\n\
                 💡 Hint: The default is https://api.deps.dev/v3alpha/systems",
                base_url
            );
        }
    }
    if let Some(exclude) = &config.exclude {
        for (i, pattern) in exclude.iter().enumerate() {
            if pattern.trim().is_empty() {
                bail!("exclude[{}] must not be empty.", i);
            }
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let mut keys: Vec<&String> = config.unknown_fields.keys().collect();
    keys.sort();
    for key in keys {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
