/*!
 * Tests for provider implementations and the translation service
 */

use i18n_agent::app_config::{TranslationConfig, TranslationProvider};
use i18n_agent::errors::ProviderError;
use i18n_agent::providers::Provider;
use i18n_agent::providers::anthropic::{Anthropic, AnthropicRequest, AnthropicResponse};
use i18n_agent::providers::mock::{MockBehavior, MockProvider, MockRequest};
use i18n_agent::providers::ollama::{ChatMessage, ChatRequest, ChatResponse, Ollama};
use i18n_agent::translation::TranslationService;
use i18n_agent::translation::prompts::TranslationPromptBuilder;

use crate::common::SAMPLE_PROSE;

fn prompt(prose: &str) -> String {
    TranslationPromptBuilder::new("Korean").build(prose)
}

/// Test that the mock reads the prose out of a real prompt
#[test]
fn test_mockRequest_prose_withBuiltPrompt_shouldReturnProse() {
    let request = MockRequest::new(prompt(SAMPLE_PROSE));
    assert_eq!(request.prose(), SAMPLE_PROSE);
}

/// Test the tagging used by the working mock
#[test]
fn test_tagTranslated_shouldKeepHeadingMarkers() {
    assert_eq!(
        MockProvider::tag_translated(SAMPLE_PROSE),
        "# [번역] Quick tour\n\n[번역] Get up and running with the library.\n\n## [번역] Pipeline\n\n[번역] The pipeline is the easiest way to use a model."
    );
}

/// Test the merge behavior
#[tokio::test]
async fn test_mergeParagraphs_shouldLeaveNoBlankLines() {
    let response = MockProvider::merge_paragraphs()
        .complete(MockRequest::new(prompt(SAMPLE_PROSE)))
        .await
        .unwrap();
    assert!(!MockProvider::extract_text(&response).contains("\n\n"));
}

/// Test the fenced behavior
#[tokio::test]
async fn test_fencedProvider_shouldWrapAnswer() {
    let response = MockProvider::fenced()
        .complete(MockRequest::new(prompt("# T")))
        .await
        .unwrap();
    assert_eq!(response.text, "```md\n# [번역] T\n```");
}

/// Test the slow behavior still answers
#[tokio::test]
async fn test_slowProvider_shouldAnswerAfterDelay() {
    let provider = MockProvider::new(MockBehavior::Slow { delay_ms: 10 });
    let response = provider.complete(MockRequest::new(prompt("# T"))).await.unwrap();
    assert_eq!(response.text, "# [번역] T");
}

/// Test the service with a mock provider
#[tokio::test]
async fn test_translationService_withMock_shouldReportUsage() {
    let mock = MockProvider::working();
    let service = TranslationService::with_mock(mock.clone());

    let result = service.translate(&prompt(SAMPLE_PROSE)).await.unwrap();

    assert!(result.text.starts_with("# [번역] Quick tour"));
    assert_eq!(result.usage.provider, "Mock");
    assert_eq!(result.usage.model, "echo");
    assert!(result.usage.prompt_tokens > 0);
    assert_eq!(
        result.usage.total_tokens,
        result.usage.prompt_tokens + result.usage.completion_tokens
    );
    assert_eq!(mock.request_count(), 1);
    assert!(result.usage.summary().contains("Provider: Mock"));
}

/// Test error propagation from the service
#[tokio::test]
async fn test_translationService_withFailingMock_shouldReturnProviderError() {
    let service = TranslationService::with_mock(MockProvider::failing());

    let error = service.translate("prompt").await.unwrap_err();
    assert!(matches!(error, ProviderError::ApiError { status_code: 500, .. }));
    assert!(service.test_connection().await.is_err());
}

/// Test service construction from configuration
#[tokio::test]
async fn test_translationService_new_withMockConfig_shouldEcho() {
    let config = TranslationConfig {
        provider: TranslationProvider::Mock,
        ..TranslationConfig::default()
    };
    let service = TranslationService::new(config).unwrap();

    let result = service.translate(&prompt("# T\n\nBody.")).await.unwrap();
    assert_eq!(result.text, "# T\n\nBody.");
    assert!(service.test_connection().await.is_ok());
}

/// Test that Anthropic needs a key
#[test]
fn test_translationService_new_withoutAnthropicKey_shouldFail() {
    if std::env::var(i18n_agent::app_config::ANTHROPIC_API_KEY_ENV).is_ok() {
        return;
    }
    let result = TranslationService::new(TranslationConfig::default());
    assert!(matches!(result, Err(ProviderError::AuthenticationError(_))));
}

/// Test the Anthropic request body
#[test]
fn test_anthropicRequest_serialize_shouldSkipUnsetFields() {
    let request = AnthropicRequest::new("claude-3-7-sonnet-latest", 8192)
        .temperature(0.3)
        .add_message("user", "# T");
    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["model"], "claude-3-7-sonnet-latest");
    assert_eq!(json["max_tokens"], 8192);
    assert_eq!(json["messages"][0]["role"], "user");
    assert_eq!(json["messages"][0]["content"], "# T");
    assert!(json.get("system").is_none());
}

/// Test text extraction from an Anthropic response
#[test]
fn test_anthropic_extractText_shouldJoinTextBlocks() {
    let response: AnthropicResponse = serde_json::from_str(
        r##"{
            "content": [
                {"type": "text", "text": "# 제목"},
                {"type": "tool_use"},
                {"type": "text", "text": "\n\n본문"}
            ],
            "usage": {"input_tokens": 12, "output_tokens": 5}
        }"##,
    )
    .unwrap();

    assert_eq!(Anthropic::extract_text(&response), "# 제목\n\n본문");
    assert_eq!(Anthropic::token_usage(&response), (Some(12), Some(5)));
}

/// Test the Ollama chat request body
#[test]
fn test_ollamaChatRequest_serialize_shouldCarryOptions() {
    let request = ChatRequest::new("llama3.1:8b", vec![ChatMessage::new("user", "# T")])
        .temperature(0.3)
        .max_tokens(512);
    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["model"], "llama3.1:8b");
    assert_eq!(json["messages"][0]["content"], "# T");
    assert_eq!(json["options"]["num_predict"], 512);
}

/// Test text extraction from an Ollama response
#[test]
fn test_ollama_extractText_shouldReturnMessageContent() {
    let response: ChatResponse = serde_json::from_str(
        r#"{"model":"m","message":{"role":"assistant","content":"번역"},"done":true,"prompt_eval_count":3,"eval_count":2}"#,
    )
    .unwrap();

    assert_eq!(Ollama::extract_text(&response), "번역");
    assert_eq!(Ollama::token_usage(&response), (Some(3), Some(2)));
}

/// Test endpoint normalization of the Ollama client
#[test]
fn test_ollama_new_shouldNormalizeEndpoint() {
    assert_eq!(Ollama::new("localhost", 5).base_url(), "http://localhost:11434");
}
