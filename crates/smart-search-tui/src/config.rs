use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use smart_search::{Record, SearchConfig, records_from_json};
use std::{
    env,
    path::{Path, PathBuf},
};

const CONFIG_FILE: &str = "smart-search.toml";

/// Application configuration loaded from smart-search.toml
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// JSON array of records to search
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    #[serde(default)]
    pub search: SearchConfig,
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(config) = Self::read(Path::new(CONFIG_FILE)) {
            return config;
        }

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home).join(format!(".{}", CONFIG_FILE));
            if let Some(config) = Self::read(&home_config) {
                return config;
            }
        }

        log::debug!("Using default config");
        Self::default()
    }

    fn read(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => {
                log::debug!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(err) => {
                log::warn!("Ignoring {}: {}", path.display(), err);
                None
            }
        }
    }

    /// First CLI argument replaces the configured data file
    pub fn with_args(mut self, mut args: impl Iterator<Item = String>) -> Self {
        if let Some(data_file) = args.next() {
            self.data_file = Some(PathBuf::from(data_file));
        }
        self
    }
}

/// Read a JSON array of records from disk
pub async fn load_records(path: &Path) -> Result<Vec<Record>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    records_from_json(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
