use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language used when the command line does not name one
    #[serde(default)]
    pub default_target_language: Option<String>,

    /// Translation service config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Model name, or deployment name for Azure endpoints
    #[serde(default = "default_model")]
    pub model: String,

    /// API key
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service URL; empty selects the public OpenAI API
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Azure OpenAI api-version; set it to talk to an Azure deployment
    #[serde(default)]
    pub api_version: Option<String>,

    /// Per-request wall-clock timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per logical unit before degrading to the untranslated text
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between retry attempts in seconds
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: String::new(),
            api_version: None,
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_delay_secs: default_retry_delay_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the log crate's level filter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_attempts() -> u32 {
    2
}

fn default_retry_delay_secs() -> u64 {
    2
}

fn default_temperature() -> f32 {
    0.5
}

fn default_max_tokens() -> u32 {
    4000
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file {}", path.as_ref().display())
        })?;
        let config: Config = serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse config file {}", path.as_ref().display())
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content).with_context(|| {
            format!("Failed to write config file {}", path.as_ref().display())
        })?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.translation.model.is_empty() {
            return Err(anyhow!("Translation model must not be empty"));
        }
        if self.translation.max_attempts == 0 {
            return Err(anyhow!("max_attempts must be at least 1"));
        }
        if self.translation.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be at least 1"));
        }
        if !(0.0..=2.0).contains(&self.translation.temperature) {
            return Err(anyhow!("temperature must be between 0.0 and 2.0"));
        }
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            default_target_language: None,
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
