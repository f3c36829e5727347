//! Config file parsing

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use xnb_extract::ConvertOptions;

/// Top-level config file structure
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub convert: ConvertOptions,
}

impl ConfigFile {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }
}

/// Load a config file from disk
pub fn load(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    ConfigFile::parse(&content).with_context(|| format!("In {}", path.display()))
}
