use crate::error::{ConfigError, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_directory")]
    pub directory: String,
    #[serde(default = "default_log_filename")]
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Glob pattern selecting the crawl snapshot files to report on.
    #[serde(default = "default_snapshots")]
    pub snapshots: String,

    /// Report destination; stdout when unset.
    #[serde(default)]
    pub output: Option<String>,

    /// Content types matching this pattern are counted as text pages.
    #[serde(default = "default_text_types")]
    pub text_types: String,

    #[serde(default)]
    pub logging: LogConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
            filename: default_log_filename(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshots: default_snapshots(),
            output: None,
            text_types: default_text_types(),
            logging: LogConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::FileRead)?;
        Self::from_toml(&content)
    }

    /// Like [`Config::from_file`], but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Config file {:?} not found, using defaults", path);
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        Self::from_file(path)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.snapshots.trim().is_empty() {
            return Err(ConfigError::MissingField("snapshots".to_string()).into());
        }

        if let Some(output) = &self.output {
            if output.trim().is_empty() {
                return Err(
                    ConfigError::InvalidValue("output cannot be empty".to_string()).into(),
                );
            }
        }

        if let Err(e) = Regex::new(&self.text_types) {
            return Err(ConfigError::InvalidValue(format!(
                "text_types is not a valid pattern: {}",
                e
            ))
            .into());
        }

        Ok(())
    }
}

fn default_snapshots() -> String {
    "crawls/*.json".to_string()
}

pub(crate) fn default_text_types() -> String {
    r"^(text/[\w.+-]+|application/(xhtml\+xml|xml|json|javascript|[\w.-]+\+xml))$".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_log_filename() -> String {
    "crawl-report.log".to_string()
}
