//! Configuration management for BibliaAI
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, BibliaError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for BibliaAI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Generative backend configuration
    pub provider: ProviderConfig,
    /// Illustration batch settings
    #[serde(default)]
    pub illustrations: IllustrationConfig,
    /// History settings
    #[serde(default)]
    pub history: HistoryConfig,
    /// Display preferences
    #[serde(default)]
    pub preferences: PreferencesConfig,
}

/// Provider configuration
///
/// Specifies which generative backend to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Google Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Optional per-request timeout in seconds
    ///
    /// Unset by default: a hanging backend hangs the request.
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,
}

/// Google Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API base URL (overridable for tests and proxies)
    #[serde(default = "default_gemini_api_base")]
    pub api_base: String,

    /// Model used for study content
    #[serde(default = "default_gemini_content_model")]
    pub content_model: String,

    /// Model used for illustrations
    #[serde(default = "default_gemini_image_model")]
    pub image_model: String,

    /// API key; normally supplied through `GEMINI_API_KEY` or `API_KEY`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

fn default_gemini_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_content_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: default_gemini_api_base(),
            content_model: default_gemini_content_model(),
            image_model: default_gemini_image_model(),
            api_key: None,
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// Illustration batch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IllustrationConfig {
    /// Maximum number of prompts sent per study
    #[serde(default = "default_illustration_limit")]
    pub limit: usize,

    /// Aspect ratio requested from the image backend
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
}

fn default_illustration_limit() -> usize {
    2
}

fn default_aspect_ratio() -> String {
    "16:9".to_string()
}

impl Default for IllustrationConfig {
    fn default() -> Self {
        Self {
            limit: default_illustration_limit(),
            aspect_ratio: default_aspect_ratio(),
        }
    }
}

/// History configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of timeline entries kept
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Record every successful generation, not only explicit saves
    #[serde(default = "default_record_on_generate")]
    pub record_on_generate: bool,
}

fn default_max_entries() -> usize {
    10
}

fn default_record_on_generate() -> bool {
    true
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            record_on_generate: default_record_on_generate(),
        }
    }
}

/// Display preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// Theme used when no preference has been stored yet
    #[serde(default)]
    pub prefers_dark: bool,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default_config()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn default_config() -> Self {
        Self {
            provider: ProviderConfig {
                provider_type: "gemini".to_string(),
                gemini: GeminiConfig::default(),
                ollama: OllamaConfig::default(),
                request_timeout_seconds: None,
            },
            illustrations: IllustrationConfig::default(),
            history: HistoryConfig::default(),
            preferences: PreferencesConfig::default(),
        }
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| BibliaError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| BibliaError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        // Provider overrides
        if let Ok(provider_type) = std::env::var("BIBLIA_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(model) = std::env::var("BIBLIA_GEMINI_MODEL") {
            self.provider.gemini.content_model = model;
        }

        if let Ok(model) = std::env::var("BIBLIA_GEMINI_IMAGE_MODEL") {
            self.provider.gemini.image_model = model;
        }

        if let Ok(api_base) = std::env::var("BIBLIA_GEMINI_API_BASE") {
            self.provider.gemini.api_base = api_base;
        }

        if self.provider.gemini.api_key.is_none() {
            self.provider.gemini.api_key = std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("API_KEY"))
                .ok()
                .filter(|key| !key.trim().is_empty());
        }

        if let Ok(ollama_host) = std::env::var("BIBLIA_OLLAMA_HOST") {
            self.provider.ollama.host = ollama_host;
        }

        if let Ok(ollama_model) = std::env::var("BIBLIA_OLLAMA_MODEL") {
            self.provider.ollama.model = ollama_model;
        }

        if let Ok(timeout) = std::env::var("BIBLIA_REQUEST_TIMEOUT_SECONDS") {
            match timeout.parse::<u64>() {
                Ok(v) => self.provider.request_timeout_seconds = Some(v),
                Err(_) => tracing::warn!("Invalid BIBLIA_REQUEST_TIMEOUT_SECONDS: {}", timeout),
            }
        }

        // Illustration overrides
        if let Ok(limit) = std::env::var("BIBLIA_ILLUSTRATION_LIMIT") {
            match limit.parse::<usize>() {
                Ok(v) => {
                    self.illustrations.limit = v;
                    tracing::debug!(limit = v, "Env override: BIBLIA_ILLUSTRATION_LIMIT");
                }
                Err(_) => tracing::warn!("Invalid BIBLIA_ILLUSTRATION_LIMIT: {}", limit),
            }
        }

        // Preference overrides
        if let Ok(prefers_dark) = std::env::var("BIBLIA_PREFERS_DARK") {
            match prefers_dark.parse::<bool>() {
                Ok(v) => self.preferences.prefers_dark = v,
                Err(_) => tracing::warn!("Invalid BIBLIA_PREFERS_DARK: {}", prefers_dark),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(provider) = &cli.provider {
            tracing::debug!("Using provider override: {}", provider);
            self.provider.provider_type = provider.clone();
        }
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges
    /// and that required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(BibliaError::Config("Provider type cannot be empty".to_string()).into());
        }

        let valid_providers = ["gemini", "ollama"];
        if !valid_providers.contains(&self.provider.provider_type.as_str()) {
            return Err(BibliaError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                valid_providers.join(", ")
            ))
            .into());
        }

        if self.provider.request_timeout_seconds == Some(0) {
            return Err(BibliaError::Config(
                "provider.request_timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.illustrations.limit == 0 {
            return Err(BibliaError::Config(
                "illustrations.limit must be greater than 0".to_string(),
            )
            .into());
        }

        if !is_valid_aspect_ratio(&self.illustrations.aspect_ratio) {
            return Err(BibliaError::Config(format!(
                "illustrations.aspect_ratio must look like W:H, got {}",
                self.illustrations.aspect_ratio
            ))
            .into());
        }

        if self.history.max_entries == 0 {
            return Err(BibliaError::Config(
                "history.max_entries must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

fn is_valid_aspect_ratio(ratio: &str) -> bool {
    match ratio.split_once(':') {
        Some((w, h)) => matches!(
            (w.parse::<u32>(), h.parse::<u32>()),
            (Ok(w), Ok(h)) if w > 0 && h > 0
        ),
        None => false,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
