/*!
 * Tests for application configuration
 */

use i18n_agent::app_config::{ANTHROPIC_API_KEY_ENV, Config, LogLevel, ProviderConfig, TranslationProvider};
use i18n_agent::translation::ReassemblyPolicy;

use crate::common;

fn anthropic_config_with_key() -> Config {
    let mut config = Config::default();
    config.translation.available_providers[0].api_key = "sk-test".to_string();
    config
}

/// Test default values
#[test]
fn test_default_shouldTranslateEnglishDocsToKorean() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "ko");
    assert_eq!(config.docs.docs_root, "docs/source");
    assert_eq!(config.docs.output_dir, "translation_result");
    assert_eq!(config.docs.top_k, 1);
    assert!(config.docs.update_toctree);
    assert_eq!(config.translation.provider, TranslationProvider::Anthropic);
    assert_eq!(config.translation.available_providers.len(), 3);
    assert_eq!(config.reassembly, ReassemblyPolicy::default());
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test provider accessors with defaults
#[test]
fn test_translationConfig_accessors_shouldUseProviderDefaults() {
    let mut config = Config::default();
    assert_eq!(config.translation.get_model(), "claude-3-7-sonnet-latest");
    assert_eq!(config.translation.get_endpoint(), "https://api.anthropic.com");
    assert_eq!(config.translation.get_timeout_secs(), 300);

    config.translation.provider = TranslationProvider::Ollama;
    assert_eq!(config.translation.get_model(), "llama3.1:8b");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
    assert_eq!(config.translation.get_timeout_secs(), 120);
    assert!(config.translation.get_api_key().is_empty());
}

/// Test model overrides
#[test]
fn test_setModel_shouldOverrideActiveProviderOnly() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.translation.set_model("qwen2.5:14b");

    assert_eq!(config.translation.get_model(), "qwen2.5:14b");
    let anthropic = config
        .translation
        .get_provider_config(&TranslationProvider::Anthropic)
        .unwrap();
    assert_eq!(anthropic.model, "claude-3-7-sonnet-latest");
}

/// Test model override when the provider entry is missing
#[test]
fn test_setModel_withoutProviderEntry_shouldAddOne() {
    let mut config = Config::default();
    config.translation.available_providers.clear();
    config.translation.provider = TranslationProvider::Mock;
    config.translation.set_model("parrot");

    assert_eq!(config.translation.available_providers.len(), 1);
    assert_eq!(config.translation.get_model(), "parrot");
}

/// Test provider parsing
#[test]
fn test_translationProvider_fromStr_shouldIgnoreCase() {
    assert_eq!("Anthropic".parse::<TranslationProvider>().unwrap(), TranslationProvider::Anthropic);
    assert_eq!("OLLAMA".parse::<TranslationProvider>().unwrap(), TranslationProvider::Ollama);
    assert_eq!("mock".parse::<TranslationProvider>().unwrap(), TranslationProvider::Mock);
    assert!("openai".parse::<TranslationProvider>().is_err());
    assert_eq!(TranslationProvider::Mock.display_name(), "Mock");
    assert_eq!(TranslationProvider::Ollama.to_string(), "ollama");
}

/// Test a valid configuration
#[test]
fn test_validate_withApiKey_shouldPass() {
    assert!(anthropic_config_with_key().validate().is_ok());
}

/// Test validation of the mock configuration used in dry runs
#[test]
fn test_validate_withMockProvider_shouldNotNeedKey() {
    let dir = common::create_temp_dir().unwrap();
    assert!(common::mock_config(dir.path()).validate().is_ok());
}

/// Test invalid language combinations
#[test]
fn test_validate_withSameLanguages_shouldFail() {
    let mut config = anthropic_config_with_key();
    config.target_language = "eng".to_string();
    assert!(config.validate().is_err());

    config.target_language = "xx".to_string();
    assert!(config.validate().is_err());
}

/// Test invalid values
#[test]
fn test_validate_withBadValues_shouldFail() {
    let mut config = anthropic_config_with_key();
    config.translation.common.temperature = 1.5;
    assert!(config.validate().is_err());

    let mut config = anthropic_config_with_key();
    config.docs.output_dir = "  ".to_string();
    assert!(config.validate().is_err());

    let mut config = anthropic_config_with_key();
    config.docs.docs_root = String::new();
    assert!(config.validate().is_err());
}

/// Test the missing key error when the environment does not provide one
#[test]
fn test_validate_withoutApiKey_shouldFail() {
    if std::env::var(ANTHROPIC_API_KEY_ENV).is_ok() {
        return;
    }
    let error = Config::default().validate().unwrap_err();
    assert!(error.to_string().contains(ANTHROPIC_API_KEY_ENV));
}

/// Test that missing fields fall back to defaults
#[test]
fn test_deserialize_withPartialJson_shouldFillDefaults() {
    let config: Config = serde_json::from_str(
        r#"{
            "target_language": "ja",
            "translation": {
                "provider": "ollama",
                "available_providers": [{ "type": "ollama", "model": "gemma2" }]
            },
            "reassembly": { "max_header_drift": 1 }
        }"#,
    )
    .unwrap();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "ja");
    assert_eq!(config.translation.get_model(), "gemma2");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
    assert_eq!(config.translation.common.max_tokens, 8192);
    assert_eq!(config.reassembly.max_paragraph_drift, 2);
    assert_eq!(config.reassembly.max_header_drift, Some(1));
}

/// Test saving and loading a configuration file
#[test]
fn test_saveAndFromFile_shouldPreserveValues() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let mut config = anthropic_config_with_key();
    config.target_language = "fr".to_string();
    config.docs.in_progress = vec!["quicktour.md".to_string()];
    config.translation.common.additional_instruction = "Use formal speech.".to_string();
    config.save(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.target_language, "fr");
    assert_eq!(loaded.docs, config.docs);
    assert_eq!(loaded.translation.get_api_key(), "sk-test");
    assert_eq!(loaded.translation.common.additional_instruction, "Use formal speech.");
}

/// Test creation of a missing configuration file
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path).unwrap();
    assert!(path.exists());
    assert_eq!(config.target_language, "ko");

    let reloaded = Config::load_or_create(&path).unwrap();
    assert_eq!(reloaded.docs, config.docs);
}

/// Test a malformed configuration file
#[test]
fn test_fromFile_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "conf.json", "{ not json").unwrap();
    assert!(Config::from_file(&path).is_err());
}

/// Test provider config defaults
#[test]
fn test_providerConfig_new_shouldSetTypeIdentifier() {
    assert_eq!(ProviderConfig::new(TranslationProvider::Anthropic).provider_type, "anthropic");
    assert_eq!(ProviderConfig::new(TranslationProvider::Mock).model, "echo");
}

/// Test log level mapping
#[test]
fn test_logLevel_toLevelFilter_shouldMapEachLevel() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
