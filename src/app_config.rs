use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};
use url::Url;

use crate::language_utils;

/// Application configuration module
/// This module handles loading, validating and saving `conf.json`.
/// Every field has a serde default so partial files load.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Local store settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Remote translation settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Remote preference store settings
    #[serde(default)]
    pub preferences: PreferencesConfig,

    /// Speech recognition settings
    #[serde(default)]
    pub recognition: RecognitionConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Local store configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct StorageConfig {
    /// Database file; the user data directory is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslationConfig {
    /// MyMemory API base URL
    #[serde(default = "default_translation_endpoint")]
    pub endpoint: String,

    /// Source language code (ISO 639-1)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO 639-1)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Pause after each request in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional contact address sent to the service
    #[serde(default)]
    pub contact_email: String,
}

/// Remote preference store configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PreferencesConfig {
    /// Supabase project URL; empty keeps preferences local
    #[serde(default)]
    pub endpoint: String,

    /// Supabase anon key
    #[serde(default)]
    pub api_key: String,

    /// Preferences table name
    #[serde(default = "default_preferences_table")]
    pub table: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl PreferencesConfig {
    pub fn is_remote(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }
}

/// Speech recognition configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecognitionConfig {
    /// BCP 47 language tag
    #[serde(default = "default_recognition_language")]
    pub language: String,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
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
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

fn default_translation_endpoint() -> String {
    crate::providers::mymemory::DEFAULT_ENDPOINT.to_string()
}

fn default_source_language() -> String {
    "pt".to_string()
}

fn default_target_language() -> String {
    "es".to_string()
}

fn default_request_delay_ms() -> u64 {
    200
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_preferences_table() -> String {
    crate::providers::supabase::DEFAULT_TABLE.to_string()
}

fn default_recognition_language() -> String {
    "pt-BR".to_string()
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_translation_endpoint(),
            source_language: default_source_language(),
            target_language: default_target_language(),
            request_delay_ms: default_request_delay_ms(),
            timeout_secs: default_timeout_secs(),
            contact_email: String::new(),
        }
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            table: default_preferences_table(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: default_recognition_language(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        language_utils::parse_iso639_1(&self.translation.source_language)
            .context("Invalid translation source language")?;
        language_utils::parse_iso639_1(&self.translation.target_language)
            .context("Invalid translation target language")?;
        language_utils::validate_recognition_language(&self.recognition.language)?;

        validate_http_url(&self.translation.endpoint).context("Invalid translation endpoint")?;

        if self.translation.timeout_secs == 0 {
            return Err(anyhow!("Translation timeout must be greater than zero"));
        }

        if self.preferences.is_remote() {
            validate_http_url(&self.preferences.endpoint).context("Invalid preferences endpoint")?;
            if self.preferences.api_key.trim().is_empty() {
                return Err(anyhow!("An API key is required when a preferences endpoint is set"));
            }
            if self.preferences.table.trim().is_empty() {
                return Err(anyhow!("Preferences table name must not be empty"));
            }
        }

        Ok(())
    }

    /// Read and validate a config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }
}

fn validate_http_url(value: &str) -> Result<()> {
    let url = Url::parse(value.trim()).with_context(|| format!("Not a URL: {}", value))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(anyhow!("Unsupported URL scheme: {}", other)),
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            storage: StorageConfig::default(),
            translation: TranslationConfig::default(),
            preferences: PreferencesConfig::default(),
            recognition: RecognitionConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
