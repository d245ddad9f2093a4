/*!
 * Core translation service implementation.
 *
 * This module contains the `TranslationService`, the single boundary through
 * which a fully assembled prompt is sent to the configured model. It does not
 * retry: a failed request surfaces to the caller, who decides what to do.
 */

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::mock::{MockProvider, MockRequest};
use crate::providers::ollama::{ChatMessage, ChatRequest, Ollama};

/// Token usage statistics for tracking API consumption
#[derive(Debug, Clone)]
pub struct TokenUsageStats {
    /// Number of prompt tokens
    pub prompt_tokens: u64,

    /// Number of completion tokens
    pub completion_tokens: u64,

    /// Total number of tokens
    pub total_tokens: u64,

    /// Start time of token tracking
    pub start_time: Instant,

    /// Total time spent on API requests
    pub api_duration: Duration,

    /// Provider name
    pub provider: String,

    /// Model name
    pub model: String,
}

impl Default for TokenUsageStats {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenUsageStats {
    /// Create a new empty token usage stats instance
    pub fn new() -> Self {
        Self::with_provider_info(String::new(), String::new())
    }

    /// Create new token usage stats with provider info
    pub fn with_provider_info(provider: String, model: String) -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
            start_time: Instant::now(),
            api_duration: Duration::from_secs(0),
            provider,
            model,
        }
    }

    /// Add token usage numbers
    pub fn add_token_usage(&mut self, prompt_tokens: Option<u64>, completion_tokens: Option<u64>) {
        if let Some(pt) = prompt_tokens {
            self.prompt_tokens += pt;
            self.total_tokens += pt;
        }

        if let Some(ct) = completion_tokens {
            self.completion_tokens += ct;
            self.total_tokens += ct;
        }
    }

    /// Calculate tokens per minute rate
    pub fn tokens_per_minute(&self) -> f64 {
        let duration_minutes = if self.api_duration.as_secs_f64() > 0.0 {
            self.api_duration.as_secs_f64() / 60.0
        } else {
            self.start_time.elapsed().as_secs_f64() / 60.0
        };

        if duration_minutes > 0.0 {
            self.total_tokens as f64 / duration_minutes
        } else {
            0.0
        }
    }

    /// Generate a summary of token usage
    pub fn summary(&self) -> String {
        format!(
            "Token Usage Summary:\n\
             Provider: {}\n\
             Model: {}\n\
             Prompt tokens: {}\n\
             Completion tokens: {}\n\
             Total tokens: {}\n\
             API request time: {:.2} seconds\n\
             Tokens per minute: {:.2}",
            self.provider,
            self.model,
            self.prompt_tokens,
            self.completion_tokens,
            self.total_tokens,
            self.api_duration.as_secs_f64(),
            self.tokens_per_minute()
        )
    }
}

/// Raw model output for one prompt
#[derive(Debug, Clone)]
pub struct TranslationResult {
    /// Text returned by the model, untouched
    pub text: String,
    /// Token usage of the request
    pub usage: TokenUsageStats,
}

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// Anthropic API service
    Anthropic {
        /// Client instance
        client: Anthropic,
    },

    /// Ollama LLM service
    Ollama {
        /// Client instance
        client: Ollama,
    },

    /// Deterministic offline provider
    Mock {
        /// Client instance
        client: MockProvider,
    },
}

/// Sends prompts to the configured model
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig) -> Result<Self, ProviderError> {
        let timeout_secs = config.get_timeout_secs();

        let provider = match config.provider {
            ConfigTranslationProvider::Anthropic => {
                let api_key = config.get_api_key();
                if api_key.is_empty() {
                    return Err(ProviderError::AuthenticationError(
                        "No API key configured for Anthropic".to_string(),
                    ));
                }

                TranslationProviderImpl::Anthropic {
                    client: Anthropic::new(
                        api_key,
                        config.get_endpoint(),
                        config.get_model(),
                        timeout_secs,
                    ),
                }
            }
            ConfigTranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::new(config.get_endpoint(), timeout_secs),
            },
            ConfigTranslationProvider::Mock => TranslationProviderImpl::Mock {
                client: MockProvider::identity(),
            },
        };

        Ok(Self { provider, config })
    }

    /// Create a service backed by the given mock provider
    pub fn with_mock(mock: MockProvider) -> Self {
        let config = TranslationConfig {
            provider: ConfigTranslationProvider::Mock,
            ..TranslationConfig::default()
        };

        Self {
            provider: TranslationProviderImpl::Mock { client: mock },
            config,
        }
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        info!(
            "Testing connection to {} with model {}",
            self.config.provider.display_name(),
            self.config.get_model()
        );

        match &self.provider {
            TranslationProviderImpl::Anthropic { client } => client.test_connection().await,
            TranslationProviderImpl::Ollama { client } => client.test_connection().await,
            TranslationProviderImpl::Mock { client } => client.test_connection().await,
        }
    }

    /// Send one prompt to the model and return its raw answer
    pub async fn translate(&self, prompt: &str) -> Result<TranslationResult, ProviderError> {
        let start_time = Instant::now();
        let model = self.config.get_model();
        let common = &self.config.common;

        let (text, (prompt_tokens, completion_tokens)) = match &self.provider {
            TranslationProviderImpl::Anthropic { client } => {
                let request = AnthropicRequest::new(model.clone(), common.max_tokens)
                    .temperature(common.temperature)
                    .add_message("user", prompt);
                let response = client.complete(request).await?;
                (Anthropic::extract_text(&response), Anthropic::token_usage(&response))
            }
            TranslationProviderImpl::Ollama { client } => {
                let request = ChatRequest::new(model.clone(), vec![ChatMessage::new("user", prompt)])
                    .temperature(common.temperature)
                    .max_tokens(common.max_tokens);
                let response = client.complete(request).await?;
                (Ollama::extract_text(&response), Ollama::token_usage(&response))
            }
            TranslationProviderImpl::Mock { client } => {
                let response = client.complete(MockRequest::new(prompt)).await?;
                (MockProvider::extract_text(&response), MockProvider::token_usage(&response))
            }
        };

        let mut usage = TokenUsageStats::with_provider_info(
            self.config.provider.display_name().to_string(),
            model,
        );
        usage.add_token_usage(prompt_tokens, completion_tokens);
        usage.api_duration = start_time.elapsed();

        debug!(
            "Model answered in {:.2}s ({} tokens)",
            usage.api_duration.as_secs_f64(),
            usage.total_tokens
        );

        Ok(TranslationResult { text, usage })
    }
}
