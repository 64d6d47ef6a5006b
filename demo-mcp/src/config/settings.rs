// Settings module for configuration
//
// This module defines the settings structure and the loading function
// for the MCP server configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{ensure, Context, Result};

/// Identity and framing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Name announced during initialization
    pub name: String,
    /// Version announced during initialization
    pub version: String,
    /// Largest accepted inbound message in bytes
    pub max_frame_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            name: crate::SERVER_NAME.to_string(),
            version: crate::SERVER_VERSION.to_string(),
            max_frame_bytes: crate::defaults::MAX_FRAME_BYTES,
        }
    }
}

/// Notes persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// File holding the notes collection
    pub notes_file: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            notes_file: PathBuf::from(crate::defaults::NOTES_FILE),
        }
    }
}

/// Repository search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Base URL of the search API
    pub api_base: String,
    /// Timeout for one search call in seconds
    pub timeout_secs: u64,
    /// Number of results requested per search
    pub per_page: usize,
    /// User-Agent sent with each request
    pub user_agent: String,
}

impl SearchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_base: crate::defaults::GITHUB_API_BASE.to_string(),
            timeout_secs: crate::defaults::SEARCH_TIMEOUT_SECS,
            per_page: crate::defaults::SEARCH_PER_PAGE,
            user_agent: format!("{}/{}", crate::SERVER_NAME, crate::SERVER_VERSION),
        }
    }
}

/// Complete settings for the MCP server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server settings
    pub server: ServerSettings,
    /// Storage settings
    pub storage: StorageSettings,
    /// Search settings
    pub search: SearchSettings,
    /// Log level
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            search: SearchSettings::default(),
            log_level: crate::defaults::LOG_LEVEL.to_string(),
        }
    }
}

impl Settings {
    /// Apply `DEMO_MCP_*` overrides through the given lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("DEMO_MCP_NOTES_FILE") {
            self.storage.notes_file = PathBuf::from(path);
        }
        if let Some(api_base) = lookup("DEMO_MCP_GITHUB_API") {
            self.search.api_base = api_base;
        }
        if let Some(timeout) = lookup("DEMO_MCP_SEARCH_TIMEOUT_SECS") {
            self.search.timeout_secs = timeout
                .parse()
                .with_context(|| format!("DEMO_MCP_SEARCH_TIMEOUT_SECS is not a number: {}", timeout))?;
        }
        if let Some(level) = lookup("DEMO_MCP_LOG_LEVEL") {
            self.log_level = level;
        }
        self.validate()
    }

    /// Reject values that would leave a subsystem unusable
    pub fn validate(&self) -> Result<()> {
        ensure!(self.search.timeout_secs > 0, "search timeout_secs must be at least 1");
        ensure!(self.search.per_page > 0, "search per_page must be at least 1");
        ensure!(self.server.max_frame_bytes > 0, "server max_frame_bytes must be at least 1");
        Ok(())
    }
}

/// Load settings from a file, falling back to defaults when it does not exist
pub fn load(path: impl AsRef<Path>) -> Result<Settings> {
    let path = path.as_ref();
    let config_str = match fs::read_to_string(path) {
        Ok(config_str) => config_str,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => return Err(e).with_context(|| format!("Cannot read {}", path.display())),
    };

    let settings: Settings = toml::from_str(&config_str)
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    settings
        .validate()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings.storage.notes_file, PathBuf::from("notes.json"));
        assert_eq!(settings.search.per_page, 5);
        assert_eq!(settings.server.name, "demo-server");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"debug\"\n[search]\ntimeout_secs = 2").unwrap();

        let settings = load(file.path()).unwrap();
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.search.timeout(), Duration::from_secs(2));
        assert_eq!(settings.search.api_base, "https://api.github.com");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[search\ntimeout_secs = ").unwrap();
        assert!(load(file.path()).is_err());
    }

    #[test]
    fn test_zero_search_timeout_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[search]\ntimeout_secs = 0").unwrap();
        let err = load(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("timeout_secs"));

        let mut settings = Settings::default();
        let bad = settings.apply_overrides(|key| {
            (key == "DEMO_MCP_SEARCH_TIMEOUT_SECS").then(|| "0".to_string())
        });
        assert!(bad.is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DEMO_MCP_NOTES_FILE", "/tmp/notes.json"),
            ("DEMO_MCP_SEARCH_TIMEOUT_SECS", "3"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(settings.storage.notes_file, PathBuf::from("/tmp/notes.json"));
        assert_eq!(settings.search.timeout_secs, 3);

        let mut settings = Settings::default();
        let bad = settings.apply_overrides(|key| {
            (key == "DEMO_MCP_SEARCH_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert!(bad.is_err());
    }
}
