//! Scriptmind LLM Provider Layer
//!
//! Pluggable text generation providers.
//!
//! # Architecture
//!
//! This crate provides implementations of the `TextGenerator` trait from
//! `scriptmind-domain`. It supports multiple LLM backends with a common
//! interface, selected at runtime through [`ProviderConfig`].
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//! - `OpenAiProvider`: Any OpenAI-compatible chat completions endpoint
//!
//! # Examples
//!
//! ```
//! use scriptmind_llm::MockProvider;
//! use scriptmind_domain::TextGenerator;
//!
//! # tokio_test::block_on(async {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt", "system").await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # });
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod ollama;
pub mod openai;
mod retry;

use async_trait::async_trait;
use scriptmind_domain::TextGenerator;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub use config::{Provider, ProviderConfig, ProviderKind};
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use retry::RetryPolicy;

/// Maximum number of response body characters kept in a service error
const ERROR_BODY_LIMIT: usize = 500;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// The service answered with a non-success HTTP status
    #[error("Service error: HTTP {status}: {body}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Response body (truncated)
        body: String,
    },

    /// Network failure or client-side timeout
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response envelope could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider misconfiguration (missing key, bad endpoint)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Build a service error, truncating the body
    pub fn service(status: u16, body: impl Into<String>) -> Self {
        let body: String = body.into();
        LlmError::Service {
            status,
            body: body.chars().take(ERROR_BODY_LIMIT).collect(),
        }
    }

    /// Whether another attempt may succeed
    ///
    /// Transport failures, rate limiting (429) and server errors (5xx) are
    /// retryable; everything else is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Transport(_) => true,
            LlmError::Service { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            LlmError::InvalidResponse(e.to_string())
        } else {
            LlmError::Transport(e.to_string())
        }
    }
}

/// Scripted reply of the mock provider
#[derive(Debug, Clone)]
enum MockReply {
    Respond(String),
    Fail(String),
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// Responses can be keyed by a pattern: the first registered pattern contained in
/// the prompt wins, otherwise the default reply is used.
///
/// # Examples
///
/// ```
/// use scriptmind_llm::MockProvider;
/// use scriptmind_domain::TextGenerator;
///
/// # tokio_test::block_on(async {
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate("any prompt", "").await.unwrap(), "Fixed response");
///
/// // Responses keyed by prompt content
/// let provider = MockProvider::default();
/// provider.add_response("SEMANTIC", "semantic reply");
/// provider.add_error("EPISODIC");
/// assert_eq!(provider.generate("extract SEMANTIC memory", "").await.unwrap(), "semantic reply");
/// assert!(provider.generate("extract EPISODIC memory", "").await.is_err());
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: MockReply,
    responses: Arc<Mutex<Vec<(String, MockReply)>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
    model_name: String,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_default(MockReply::Respond(response.into()))
    }

    /// Create a MockProvider whose every call fails with a transport error
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_default(MockReply::Fail(message.into()))
    }

    fn with_default(default_reply: MockReply) -> Self {
        Self {
            default_reply,
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            delay: None,
            model_name: "mock".to_string(),
        }
    }

    /// Add a response for prompts containing `pattern`
    pub fn add_response(&self, pattern: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).push((pattern.into(), MockReply::Respond(response.into())));
    }

    /// Configure to return an error for prompts containing `pattern`
    pub fn add_error(&self, pattern: impl Into<String>) {
        lock(&self.responses).push((pattern.into(), MockReply::Fail("Mock error".to_string())));
    }

    /// Wait this long before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Report a specific model name
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        lock(&self.prompts).clear();
    }

    fn reply_for(&self, prompt: &str) -> MockReply {
        lock(&self.responses)
            .iter()
            .find(|(pattern, _)| prompt.contains(pattern.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default_reply.clone())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl TextGenerator for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str, _system_message: &str) -> Result<String, Self::Error> {
        lock(&self.prompts).push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.reply_for(prompt) {
            MockReply::Respond(response) => Ok(response),
            MockReply::Fail(message) => Err(LlmError::Transport(message)),
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Lock a mutex, recovering the data if a panicking test poisoned it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt", "system").await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_pattern_responses() {
        let provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate("say hello", "").await.unwrap(), "world");
        assert_eq!(provider.generate("foo fighters", "").await.unwrap(), "bar");
        assert_eq!(provider.generate("unknown", "").await.unwrap(), "Default mock response");
    }

    #[tokio::test]
    async fn test_first_matching_pattern_wins() {
        let provider = MockProvider::default();
        provider.add_response("a", "first");
        provider.add_response("ab", "second");
        assert_eq!(provider.generate("ab", "").await.unwrap(), "first");
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1", "").await.unwrap();
        provider.generate("prompt2", "").await.unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.prompts(), vec!["prompt1", "prompt2"]);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.generate("a bad prompt", "").await;
        assert!(matches!(result, Err(LlmError::Transport(_))));
    }

    #[tokio::test]
    async fn test_failing_provider() {
        let provider = MockProvider::failing("connection refused");
        let err = provider.generate("anything", "").await.unwrap_err();
        assert_eq!(err, LlmError::Transport("connection refused".to_string()));
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test", "").await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[test]
    fn test_retryable_errors() {
        assert!(LlmError::Transport("reset".into()).is_retryable());
        assert!(LlmError::service(429, "slow down").is_retryable());
        assert!(LlmError::service(503, "unavailable").is_retryable());
        assert!(!LlmError::service(400, "bad request").is_retryable());
        assert!(!LlmError::InvalidResponse("garbled".into()).is_retryable());
    }

    #[test]
    fn test_service_error_body_is_truncated() {
        let err = LlmError::service(500, "x".repeat(2000));
        match err {
            LlmError::Service { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body.len(), ERROR_BODY_LIMIT);
            }
            other => panic!("Expected service error, got {:?}", other),
        }
    }
}
