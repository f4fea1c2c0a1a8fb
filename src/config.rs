//! Application configuration management.
//!
//! This module handles loading the application configuration, which can
//! override the remote endpoints of the recap data repository. Every
//! field is optional; missing values fall back to the published aewiki
//! endpoints.
//!
//! Configuration is stored at `~/.config/aewiki-recap/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "aewiki-recap";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Git tree listing of the data repository, recursive so the dated files
/// under `data/<year>/` are included.
const DEFAULT_LISTING_URL: &str =
    "https://api.github.com/repos/aewiki/recap-data/git/trees/main?recursive=1";

/// Raw content root holding `data/<year>/recap-<date>.json`.
const DEFAULT_SNAPSHOT_BASE_URL: &str =
    "https://raw.githubusercontent.com/aewiki/recap-data/main/data";

/// Public recap page used for shareable links.
const DEFAULT_RECAP_PAGE_URL: &str = "https://aewiki.net/recap";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    listing_url: Option<String>,
    snapshot_base_url: Option<String>,
    recap_page_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn listing_url(&self) -> String {
        self.listing_url
            .clone()
            .unwrap_or_else(|| DEFAULT_LISTING_URL.to_string())
    }

    pub fn snapshot_base_url(&self) -> String {
        self.snapshot_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_SNAPSHOT_BASE_URL.to_string())
    }

    pub fn recap_page_url(&self) -> String {
        self.recap_page_url
            .clone()
            .unwrap_or_else(|| DEFAULT_RECAP_PAGE_URL.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_published_endpoints() {
        let config = Config::default();
        assert_eq!(config.listing_url(), DEFAULT_LISTING_URL);
        assert_eq!(config.snapshot_base_url(), DEFAULT_SNAPSHOT_BASE_URL);
        assert_eq!(config.recap_page_url(), DEFAULT_RECAP_PAGE_URL);
    }

    #[test]
    fn test_overrides_win_over_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"snapshot_base_url": "http://localhost:8080/data"}"#,
        )
        .unwrap();
        assert_eq!(config.snapshot_base_url(), "http://localhost:8080/data");
        assert_eq!(config.listing_url(), DEFAULT_LISTING_URL);
    }
}
