use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use log::error;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::{Provider, status_error};

/// Ollama client for interacting with a local Ollama server
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

/// Generation options for the Ollama API
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Chat message object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a message with the given role
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Chat request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model name to use for generation
    model: String,
    /// Messages of the conversation
    messages: Vec<ChatMessage>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Chat response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Model name
    pub model: String,
    /// Response message
    pub message: ChatMessage,
    /// Whether the generation is complete
    pub done: bool,
    /// Number of prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

impl ChatRequest {
    /// Create a new non-streaming chat request
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            options: None,
            stream: Some(false),
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).temperature = Some(temperature);
        self
    }

    /// Set the maximum number of tokens to generate
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).num_predict = Some(max_tokens);
        self
    }
}

impl Ollama {
    /// Create a new Ollama client from an endpoint URL such as `http://localhost:11434`
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: normalize_base_url(&endpoint.into()),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .http1_only()
                .build()
                .unwrap_or_default(),
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response: serde_json::Value = self.client.get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to connect to Ollama: {}", e)))?
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Ollama version response: {}", e)))?;

        response["version"].as_str()
            .map(str::to_string)
            .ok_or_else(|| ProviderError::ParseError("Invalid version format in response".to_string()))
    }
}

/// Default to the standard Ollama port when the endpoint has none
fn normalize_base_url(endpoint: &str) -> String {
    let with_scheme = if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    };

    match Url::parse(&with_scheme) {
        Ok(mut url) => {
            if url.port().is_none() && url.scheme() == "http" {
                let _ = url.set_port(Some(11434));
            }
            url.as_str().trim_end_matches('/').to_string()
        }
        Err(_) => "http://localhost:11434".to_string(),
    }
}

#[async_trait]
impl Provider for Ollama {
    type Request = ChatRequest;
    type Response = ChatResponse;

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let url = format!("{}/api/chat", self.base_url);

        let response = self.client.post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to send chat request to Ollama API: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Ollama API error ({}): {}", status, error_text);
            return Err(status_error(status, error_text));
        }

        let response_text = response.text().await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to get response text from Ollama API: {}", e)))?;

        match serde_json::from_str::<ChatResponse>(&response_text) {
            Ok(chat_response) => Ok(chat_response),
            // Streamed JSONL: concatenate the message parts
            Err(_) => parse_streamed_chat(&response_text),
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.version().await.map(|_| ())
    }

    fn extract_text(response: &ChatResponse) -> String {
        response.message.content.clone()
    }

    fn token_usage(response: &ChatResponse) -> (Option<u64>, Option<u64>) {
        (response.prompt_eval_count, response.eval_count)
    }
}

/// Fold a JSONL streaming chat response into a single response
fn parse_streamed_chat(body: &str) -> Result<ChatResponse, ProviderError> {
    let chunks: Vec<ChatResponse> = body
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str::<ChatResponse>(line).ok())
        .collect();

    let Some(last) = chunks.last() else {
        let preview: String = body.chars().take(500).collect();
        error!("Failed to parse Ollama API chat response. Raw response: {}", preview);
        return Err(ProviderError::ParseError("Ollama chat response contains invalid JSON".to_string()));
    };

    let content: String = chunks.iter().map(|c| c.message.content.as_str()).collect();
    Ok(ChatResponse {
        model: last.model.clone(),
        message: ChatMessage::new("assistant", content),
        done: last.done,
        prompt_eval_count: last.prompt_eval_count,
        eval_count: last.eval_count,
    })
}
