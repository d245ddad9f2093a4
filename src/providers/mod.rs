/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the LLM providers:
 * - Anthropic: Anthropic Messages API
 * - Ollama: Local LLM server (chat endpoint)
 * - Mock: Deterministic provider for tests and dry runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;

    /// Prompt and completion token counts, if the provider reports them
    fn token_usage(response: &Self::Response) -> (Option<u64>, Option<u64>);
}

/// Map an HTTP error status to a provider error
pub(crate) fn status_error(status: reqwest::StatusCode, message: String) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::AuthenticationError(message),
        code => ProviderError::ApiError {
            status_code: code,
            message,
        },
    }
}

pub mod anthropic;
pub mod mock;
pub mod ollama;
