/*!
 * Mock provider implementations for testing.
 *
 * The mock reads the prose out of the fenced block at the end of the prompt
 * and answers with a transformed copy of it:
 * - `MockProvider::identity()` - Returns the prose unchanged
 * - `MockProvider::working()` - Tags every heading and paragraph as translated
 * - `MockProvider::drop_last_heading()` - Loses the last heading
 * - `MockProvider::merge_paragraphs()` - Collapses every blank line
 * - `MockProvider::failing()` - Always fails with an error
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Tag added by the working mock in front of every translated block
pub const TRANSLATED_TAG: &str = "[번역]";

/// Mock request for testing
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// Full prompt sent to the model
    pub prompt: String,
}

impl MockRequest {
    /// Create a request from a prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }

    /// Prose inside the trailing ```md block, or the whole prompt without one
    pub fn prose(&self) -> &str {
        let Some(start) = self.prompt.rfind("```md\n") else {
            return &self.prompt;
        };
        let inner = &self.prompt[start + "```md\n".len()..];
        inner.strip_suffix("\n```").unwrap_or(inner)
    }
}

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The translated text
    pub text: String,
    /// Simulated prompt tokens
    pub prompt_tokens: Option<u64>,
    /// Simulated completion tokens
    pub completion_tokens: Option<u64>,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Echo the prose back untouched
    Identity,
    /// Tag headings and paragraphs as translated
    Working,
    /// Like `Working`, wrapped in a ```md fence
    Fenced,
    /// Like `Working`, with the last heading line removed
    DropLastHeading,
    /// Like `Working`, with all paragraphs merged into one
    MergeParagraphs,
    /// Always fails with an error
    Failing,
    /// Returns empty response
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of requests served
    request_count: Arc<AtomicUsize>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&MockRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// Create a mock that echoes the prose
    pub fn identity() -> Self {
        Self::new(MockBehavior::Identity)
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock whose answer is wrapped in a markdown fence
    pub fn fenced() -> Self {
        Self::new(MockBehavior::Fenced)
    }

    /// Create a mock that loses the last heading
    pub fn drop_last_heading() -> Self {
        Self::new(MockBehavior::DropLastHeading)
    }

    /// Create a mock that merges all paragraphs
    pub fn merge_paragraphs() -> Self {
        Self::new(MockBehavior::MergeParagraphs)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&MockRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests this provider (and its clones) has served
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Tag every paragraph; headings keep their marker and get the tag on the title
    pub fn tag_translated(prose: &str) -> String {
        prose
            .split("\n\n")
            .map(|paragraph| {
                paragraph
                    .lines()
                    .map(|line| match line.find(|c: char| c != '#') {
                        Some(at) if at > 0 && line[at..].starts_with([' ', '\t']) => {
                            format!("{} {}{}", &line[..at], TRANSLATED_TAG, &line[at..])
                        }
                        _ if line.trim().is_empty() => line.to_string(),
                        _ => format!("{} {}", TRANSLATED_TAG, line),
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Remove the last heading line from the prose
    pub fn without_last_heading(prose: &str) -> String {
        let lines: Vec<&str> = prose.lines().collect();
        let last_heading = lines.iter().rposition(|line| {
            let hashes = line.chars().take_while(|c| *c == '#').count();
            hashes > 0 && line[hashes..].starts_with([' ', '\t'])
        });

        match last_heading {
            Some(index) => lines
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, line)| *line)
                .collect::<Vec<_>>()
                .join("\n"),
            None => prose.to_string(),
        }
    }

    fn respond(text: String, request: &MockRequest) -> MockResponse {
        MockResponse {
            prompt_tokens: Some(request.prompt.len() as u64),
            completion_tokens: Some(text.len() as u64),
            text,
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        if let Some(generator) = self.custom_response {
            let text = generator(&request);
            return Ok(Self::respond(text, &request));
        }

        let prose = request.prose();
        let text = match self.behavior {
            MockBehavior::Identity => prose.to_string(),
            MockBehavior::Working => Self::tag_translated(prose),
            MockBehavior::Fenced => format!("```md\n{}\n```", Self::tag_translated(prose)),
            MockBehavior::DropLastHeading => {
                Self::without_last_heading(&Self::tag_translated(prose))
            }
            MockBehavior::MergeParagraphs => Self::tag_translated(prose).replace("\n\n", "\n"),
            MockBehavior::Failing => {
                return Err(ProviderError::ApiError {
                    message: "Simulated provider failure".to_string(),
                    status_code: 500,
                });
            }
            MockBehavior::Empty => String::new(),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Self::tag_translated(prose)
            }
        };

        Ok(Self::respond(text, &request))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated connection failure".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.clone()
    }

    fn token_usage(response: &Self::Response) -> (Option<u64>, Option<u64>) {
        (response.prompt_tokens, response.completion_tokens)
    }
}
