use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::glossary::{DEFAULT_GLOSSARY_PATH, DEFAULT_HASH_PATH, GLOSSARY_NAME};
use crate::language_utils;

/// Environment variable holding the DeepL API key
pub const API_KEY_ENV: &str = "DEEPL_API_KEY";

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO), or `auto`
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Characters per line when reflowing translated subtitles
    #[serde(default = "default_wrap_limit")]
    pub wrap_limit: usize,

    /// DeepL service settings
    #[serde(default)]
    pub deepl: DeepLConfig,

    /// Glossary settings
    #[serde(default)]
    pub glossary: GlossaryConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// DeepL service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DeepLConfig {
    /// API key; falls back to the DEEPL_API_KEY environment variable
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL; empty picks the free or paid API from the key
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DeepLConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Glossary configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GlossaryConfig {
    /// CSV glossary maintained by the user
    #[serde(default = "default_glossary_path")]
    pub path: PathBuf,

    /// Sidecar file recording the digest of the last synchronized glossary
    #[serde(default = "default_hash_path")]
    pub hash_path: PathBuf,

    /// Name of the glossary on the remote service
    #[serde(default = "default_glossary_name")]
    pub name: String,
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            path: default_glossary_path(),
            hash_path: default_hash_path(),
            name: default_glossary_name(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    language_utils::AUTO_DETECT.to_string()
}

fn default_target_language() -> String {
    "es".to_string()
}

fn default_wrap_limit() -> usize {
    50
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_glossary_path() -> PathBuf {
    PathBuf::from(DEFAULT_GLOSSARY_PATH)
}

fn default_hash_path() -> PathBuf {
    PathBuf::from(DEFAULT_HASH_PATH)
}

fn default_glossary_name() -> String {
    GLOSSARY_NAME.to_string()
}

impl Config {
    /// Load the configuration at `path`, writing a default one if it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            return serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()));
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }

    /// Fill an empty API key from `value`, typically the DEEPL_API_KEY variable
    pub fn apply_api_key_fallback(&mut self, value: Option<String>) {
        if !self.deepl.api_key.trim().is_empty() {
            return;
        }
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.deepl.api_key = key;
        }
    }

    /// Validate the configuration for consistency and required values
    ///
    /// The API key is checked when the translator is built, not here.
    pub fn validate(&self) -> Result<()> {
        if !language_utils::is_auto(&self.source_language) {
            language_utils::get_language_name(&self.source_language)
                .with_context(|| format!("Invalid source language: {}", self.source_language))?;
        }
        if language_utils::is_auto(&self.target_language) {
            return Err(anyhow!("Target language cannot be 'auto'"));
        }
        language_utils::get_language_name(&self.target_language)
            .with_context(|| format!("Invalid target language: {}", self.target_language))?;

        if self.wrap_limit == 0 {
            return Err(anyhow!("Wrap limit must be greater than zero"));
        }

        if !self.deepl.endpoint.trim().is_empty() {
            url::Url::parse(self.deepl.endpoint.trim())
                .with_context(|| format!("Invalid DeepL endpoint: {}", self.deepl.endpoint))?;
        }

        if self.glossary.name.trim().is_empty() {
            return Err(anyhow!("Glossary name cannot be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            wrap_limit: default_wrap_limit(),
            deepl: DeepLConfig::default(),
            glossary: GlossaryConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
