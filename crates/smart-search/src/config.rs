use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use thiserror::Error;

use crate::filter::ResultCap;
use crate::record::FieldPath;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Visual theme token passed through to the rendering layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeToken {
    #[default]
    Light,
    Dark,
}

impl ThemeToken {
    /// Unknown tokens fall back to light
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "dark" => ThemeToken::Dark,
            "light" => ThemeToken::Light,
            other => {
                log::debug!("Unknown theme token {:?}, using light", other);
                ThemeToken::Light
            }
        }
    }
}

/// Component configuration supplied by the embedding context
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SearchConfig {
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Quiet period before filtering, in milliseconds
    #[serde(default)]
    pub debounce_timeout: u64,
    /// Values `<= 0` mean unbounded
    #[serde(default)]
    pub max_results: i64,
    #[serde(default = "default_no_results_text")]
    pub no_results_text: String,
    #[serde(default = "default_display_key")]
    pub display_key: FieldPath,
    #[serde(default = "default_filterable_keys")]
    pub filterable_keys: Vec<FieldPath>,
    #[serde(default)]
    pub disabled: bool,
    /// Initial query text
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub loading: bool,
    /// Grace period between blur and closing the dropdown, in milliseconds
    #[serde(default = "default_blur_grace_ms")]
    pub blur_grace_ms: u64,
}

fn default_placeholder() -> String {
    "Search...".to_string()
}

fn default_theme() -> String {
    "light".to_string()
}

fn default_no_results_text() -> String {
    "No results found".to_string()
}

fn default_display_key() -> FieldPath {
    FieldPath::new("label")
}

fn default_filterable_keys() -> Vec<FieldPath> {
    vec![FieldPath::new("label")]
}

fn default_blur_grace_ms() -> u64 {
    200
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
            theme: default_theme(),
            debounce_timeout: 0,
            max_results: 0,
            no_results_text: default_no_results_text(),
            display_key: default_display_key(),
            filterable_keys: default_filterable_keys(),
            disabled: false,
            value: String::new(),
            loading: false,
            blur_grace_ms: default_blur_grace_ms(),
        }
    }
}

impl SearchConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn result_cap(&self) -> ResultCap {
        ResultCap::from_raw(self.max_results)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_timeout)
    }

    pub fn blur_grace(&self) -> Duration {
        Duration::from_millis(self.blur_grace_ms)
    }

    pub fn theme_token(&self) -> ThemeToken {
        ThemeToken::parse(&self.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.placeholder, "Search...");
        assert_eq!(config.debounce(), Duration::ZERO);
        assert_eq!(config.result_cap(), ResultCap::UNBOUNDED);
        assert_eq!(config.no_results_text, "No results found");
        assert_eq!(config.display_key.as_str(), "label");
        assert_eq!(config.filterable_keys, vec![FieldPath::new("label")]);
        assert_eq!(config.blur_grace(), Duration::from_millis(200));
        assert_eq!(config.theme_token(), ThemeToken::Light);
    }

    #[test]
    fn test_empty_toml_equals_default() {
        assert_eq!(SearchConfig::from_toml_str("").unwrap(), SearchConfig::default());
    }

    #[test]
    fn test_parse_toml() {
        let config = SearchConfig::from_toml_str(
            r#"
            placeholder = "Find a person"
            theme = "dark"
            debounce_timeout = 150
            max_results = 5
            display_key = "name"
            filterable_keys = ["name", "address.city"]
            "#,
        )
        .unwrap();

        assert_eq!(config.placeholder, "Find a person");
        assert_eq!(config.theme_token(), ThemeToken::Dark);
        assert_eq!(config.debounce(), Duration::from_millis(150));
        assert_eq!(config.result_cap().limit(), Some(5));
        assert_eq!(config.filterable_keys[1].segments().len(), 2);
    }

    #[test]
    fn test_out_of_domain_values_normalize() {
        let config = SearchConfig::from_toml_str("max_results = -4\ntheme = \"neon\"").unwrap();
        assert_eq!(config.result_cap(), ResultCap::UNBOUNDED);
        assert_eq!(config.theme_token(), ThemeToken::Light);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(matches!(
            SearchConfig::from_toml_str("debounce_timeout = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = SearchConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
