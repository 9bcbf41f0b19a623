//! Configuration management for copylink.
//!
//! This module defines the structure of the `copylink.toml` configuration file
//! and provides functionality to load and parse it.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::tooltip::Placement;

/// Top-level configuration structure corresponding to `copylink.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// How long a tooltip stays up after a copy (default: 1000).
    pub hide_delay_ms: Option<u64>,
    /// Tooltip position relative to its button (default: bottom).
    pub placement: Option<Placement>,
    /// Tooltip text after a successful copy (default: "Copied!").
    pub success_message: Option<String>,
    /// Tooltip text after a failed copy (default: "Failed!").
    pub failure_message: Option<String>,
    /// File that receives log output.
    pub log_file: Option<String>,
    /// Pages available in the viewer, in display order.
    #[serde(rename = "page", default)]
    pub pages: Vec<PageConfig>,
}

/// A single page.
#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    pub url: String,
    /// Display title; falls back to the URL.
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Loads and parses the configuration from a file path.
pub fn load_config(path: &Path) -> Result<Config> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}
