use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::translation::reassembly::ReassemblyPolicy;

/// Environment variable consulted when the Anthropic provider has no API key
pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Documentation layout
    #[serde(default)]
    pub docs: DocsConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Drift tolerance when reassembling translated pages
    #[serde(default)]
    pub reassembly: ReassemblyPolicy,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Anthropic
    #[default]
    Anthropic,
    // @provider: Ollama
    Ollama,
    // @provider: Offline echo provider for dry runs
    Mock,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Anthropic => "Anthropic",
            Self::Ollama => "Ollama",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Anthropic => "anthropic".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Anthropic => Self {
                provider_type: "anthropic".to_string(),
                model: default_anthropic_model(),
                api_key: String::new(),
                endpoint: default_anthropic_endpoint(),
                timeout_secs: default_anthropic_timeout_secs(),
            },
            TranslationProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                api_key: String::new(),
                endpoint: default_ollama_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::Mock => Self {
                provider_type: "mock".to_string(),
                model: default_mock_model(),
                api_key: String::new(),
                endpoint: String::new(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

/// Where the documentation lives and where translations are written
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DocsConfig {
    /// Docs root relative to the repository (holds one folder per language)
    #[serde(default = "default_docs_root")]
    pub docs_root: String,

    /// Directory translated pages are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Number of missing files to list by default
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Source-relative paths someone is already translating
    #[serde(default)]
    pub in_progress: Vec<String>,

    /// Add translated pages to the output `_toctree.yml`
    #[serde(default = "default_update_toctree")]
    pub update_toctree: bool,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            docs_root: default_docs_root(),
            output_dir: default_output_dir(),
            top_k: default_top_k(),
            in_progress: Vec::new(),
            update_toctree: default_update_toctree(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Extra instruction appended to the prompt (glossary hints, tone)
    #[serde(default)]
    pub additional_instruction: String,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on generated tokens per page
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            additional_instruction: String::new(),
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
    /// Equivalent `log` crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "ko".to_string()
}

fn default_docs_root() -> String {
    "docs/source".to_string()
}

fn default_output_dir() -> String {
    "translation_result".to_string()
}

fn default_top_k() -> usize {
    1
}

fn default_update_toctree() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_anthropic_timeout_secs() -> u64 {
    300
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-7-sonnet-latest".to_string()
}

fn default_ollama_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_mock_model() -> String {
    "echo".to_string()
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load a configuration file, writing the defaults first if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        if crate::language_utils::language_codes_match(&self.source_language, &self.target_language) {
            return Err(anyhow!("Source and target language are both '{}'", self.source_language));
        }

        if self.docs.docs_root.trim().is_empty() {
            return Err(anyhow!("docs.docs_root must not be empty"));
        }

        if self.docs.output_dir.trim().is_empty() {
            return Err(anyhow!("docs.output_dir must not be empty"));
        }

        if !(0.0..=1.0).contains(&self.translation.common.temperature) {
            return Err(anyhow!(
                "Temperature must be between 0.0 and 1.0, got {}",
                self.translation.common.temperature
            ));
        }

        if self.translation.provider == TranslationProvider::Anthropic
            && self.translation.get_api_key().is_empty()
        {
            return Err(anyhow!(
                "Translation API key is required for Anthropic provider (set it in the config or {})",
                ANTHROPIC_API_KEY_ENV
            ));
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
            docs: DocsConfig::default(),
            translation: TranslationConfig::default(),
            reassembly: ReassemblyPolicy::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Override the model of the active provider, adding its entry if missing
    pub fn set_model(&mut self, model: impl Into<String>) {
        let provider_str = self.provider.to_lowercase_string();
        match self.available_providers.iter_mut().find(|p| p.provider_type == provider_str) {
            Some(provider_config) => provider_config.model = model.into(),
            None => {
                let mut provider_config = ProviderConfig::new(self.provider.clone());
                provider_config.model = model.into();
                self.available_providers.push(provider_config);
            }
        }
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::Anthropic => default_anthropic_model(),
            TranslationProvider::Ollama => default_ollama_model(),
            TranslationProvider::Mock => default_mock_model(),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        match self.provider {
            TranslationProvider::Anthropic => std::env::var(ANTHROPIC_API_KEY_ENV).unwrap_or_default(),
            // Local providers don't use API keys
            TranslationProvider::Ollama | TranslationProvider::Mock => String::new(),
        }
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranslationProvider::Anthropic => default_anthropic_endpoint(),
            TranslationProvider::Ollama => default_ollama_endpoint(),
            TranslationProvider::Mock => String::new(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        match self.get_active_provider_config() {
            Some(provider_config) if provider_config.timeout_secs > 0 => provider_config.timeout_secs,
            _ => match self.provider {
                TranslationProvider::Anthropic => default_anthropic_timeout_secs(),
                _ => default_timeout_secs(),
            },
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Anthropic),
                ProviderConfig::new(TranslationProvider::Ollama),
                ProviderConfig::new(TranslationProvider::Mock),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
