use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) offline: bool,
    #[serde(default)]
    pub(crate) catalog_url: Option<String>,
    #[serde(default)]
    pub(crate) cache_ttl_hours: Option<u64>,
}

impl Config {
    pub(crate) fn load() -> Self {
        // Try config locations in order of priority
        for path in Self::config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => {
                        debug!("loaded config from {}", path.display());
                        return config;
                    }
                    Err(err) => {
                        warn!("failed to parse {}: {err}", path.display());
                    }
                }
            }
        }

        Self::default()
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/tokcost/config.toml (Linux/cross-platform)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("tokcost").join("config.toml"));
        }

        // 2. Platform config dir (macOS Application Support, Windows AppData)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("tokcost").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.tokcost.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".tokcost.toml"));
        }

        paths
    }
}
