//! Collector configuration, persisted as TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration that targets the public listing API.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalize::Normalizer;
use crate::posting::{CategoryFilter, SectionFilter};

/// Errors from configuration loading.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(techtrend::config::read),
        help("Ensure the config file exists and is readable, or omit --config to use defaults.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    #[diagnostic(
        code(techtrend::config::parse),
        help("Check the TOML syntax. Unknown keys are rejected to catch typos.")
    )]
    Parse { path: String, message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Settings for a collection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorConfig {
    /// Listing endpoint, queried with `?page=N`.
    #[serde(default = "default_list_url")]
    pub list_url: String,
    /// Detail endpoint, queried with `?slug=...`.
    #[serde(default = "default_detail_url")]
    pub detail_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Pause after each listing page.
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
    /// Pause after each detail fetch.
    #[serde(default = "default_detail_delay_ms")]
    pub detail_delay_ms: u64,
    #[serde(default = "default_history_path")]
    pub history_path: PathBuf,
    /// Custom vocabulary TOML; the bundled one is used when unset.
    #[serde(default)]
    pub vocabulary_path: Option<PathBuf>,
    /// Substrings of a category name or slug that mark an IT posting.
    #[serde(default = "default_it_indicators")]
    pub it_indicators: Vec<String>,
    #[serde(default = "default_section_label_keywords")]
    pub section_label_keywords: Vec<String>,
    #[serde(default = "default_section_title_keywords")]
    pub section_title_keywords: Vec<String>,
    /// Lowercase text before extraction.
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
}

fn default_list_url() -> String {
    "https://userapi.alfred.is/api/v1/front-web/jobs".into()
}
fn default_detail_url() -> String {
    "https://userapi.alfred.is/api/v1/front-web/jobs".into()
}
fn default_user_agent() -> String {
    concat!("techtrend/", env!("CARGO_PKG_VERSION"), " (polite)").into()
}
fn default_timeout_secs() -> u64 {
    20
}
fn default_page_delay_ms() -> u64 {
    130
}
fn default_detail_delay_ms() -> u64 {
    60
}
fn default_history_path() -> PathBuf {
    PathBuf::from("history.json")
}
fn default_it_indicators() -> Vec<String> {
    CategoryFilter::default().indicators
}
fn default_section_label_keywords() -> Vec<String> {
    SectionFilter::default().label_keywords
}
fn default_section_title_keywords() -> Vec<String> {
    SectionFilter::default().title_keywords
}
fn default_lowercase() -> bool {
    true
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            list_url: default_list_url(),
            detail_url: default_detail_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            page_delay_ms: default_page_delay_ms(),
            detail_delay_ms: default_detail_delay_ms(),
            history_path: default_history_path(),
            vocabulary_path: None,
            it_indicators: default_it_indicators(),
            section_label_keywords: default_section_label_keywords(),
            section_title_keywords: default_section_title_keywords(),
            lowercase: default_lowercase(),
        }
    }
}

impl CollectorConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })
    }

    fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load `path` when given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn section_filter(&self) -> SectionFilter {
        SectionFilter {
            label_keywords: self.section_label_keywords.clone(),
            title_keywords: self.section_title_keywords.clone(),
        }
    }

    pub fn category_filter(&self) -> CategoryFilter {
        CategoryFilter {
            indicators: self.it_indicators.clone(),
        }
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.lowercase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = CollectorConfig::from_toml_str("").unwrap();
        assert_eq!(config, CollectorConfig::default());
        assert_eq!(config.page_delay_ms, 130);
        assert_eq!(config.detail_delay_ms, 60);
        assert_eq!(config.timeout_secs, 20);
        assert!(config.user_agent.starts_with("techtrend/"));
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let config = CollectorConfig::from_toml_str(
            r#"
            history_path = "data/history.json"
            it_indicators = ["software"]
            lowercase = false
            "#,
        )
        .unwrap();
        assert_eq!(config.history_path, PathBuf::from("data/history.json"));
        assert_eq!(config.category_filter().indicators, vec!["software"]);
        assert!(!config.normalizer().lowercase);
        assert_eq!(config.list_url, default_list_url());
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(CollectorConfig::from_toml_str("histroy_path = \"x\"").is_err());
    }

    #[test]
    fn load_reports_path_on_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("techtrend.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        let err = CollectorConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: p, .. } if p.ends_with("techtrend.toml")));

        let missing = CollectorConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Read { .. }));
    }

    #[test]
    fn missing_path_uses_defaults() {
        let config = CollectorConfig::load_or_default(None).unwrap();
        assert_eq!(config.section_filter(), SectionFilter::default());
    }
}
