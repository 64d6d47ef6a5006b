// Configuration module for the MCP server
//
// This module handles loading configuration settings for the MCP server
// from a TOML file and the process environment.

mod settings;

pub use settings::{SearchSettings, ServerSettings, Settings, StorageSettings};

use std::env;
use std::sync::Arc;
use anyhow::Context;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_VAR: &str = "DEMO_MCP_CONFIG";

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Load configuration from the file named by `DEMO_MCP_CONFIG`, then apply
/// environment overrides
pub fn load_config() -> anyhow::Result<Arc<Settings>> {
    let config_path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut settings = settings::load(&config_path).context("Failed to load config")?;
    settings.apply_overrides(|key| env::var(key).ok())?;
    Ok(Arc::new(settings))
}
