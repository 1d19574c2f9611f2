//! Provider selection and configuration
//!
//! The generation endpoint, credentials and model are always passed in as a
//! [`ProviderConfig`] value; nothing in this crate reads ambient state.

use crate::{LlmError, MockProvider, OllamaProvider, OpenAiProvider};
use async_trait::async_trait;
use scriptmind_domain::TextGenerator;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which backend serves generation calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local Ollama server
    Ollama,
    /// OpenAI-compatible chat completions endpoint
    #[serde(rename = "openai")]
    OpenAi,
    /// Offline mock that answers `{}` to everything
    Mock,
}

/// Configuration of the text generation provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Backend kind
    #[serde(default = "default_kind")]
    pub kind: ProviderKind,

    /// Endpoint URL; each backend has its own default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// API key (OpenAI-compatible backends only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Network timeout per request attempt (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per call, including the first
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Ask the backend to constrain output to JSON where supported
    #[serde(default)]
    pub json_mode: bool,
}

fn default_kind() -> ProviderKind {
    ProviderKind::Ollama
}

fn default_model() -> String {
    "llama3".to_string()
}

fn default_timeout_secs() -> u64 {
    crate::ollama::DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    3
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            endpoint: None,
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            json_mode: false,
        }
    }
}

impl ProviderConfig {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.model.trim().is_empty() {
            return Err(LlmError::Config("model must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(LlmError::Config("timeout_secs must be greater than 0".to_string()));
        }
        if self.kind == ProviderKind::OpenAi
            && self.api_key.as_deref().map_or(true, |k| k.trim().is_empty())
        {
            return Err(LlmError::Config("api_key is required for the openai provider".to_string()));
        }
        Ok(())
    }
}

/// A provider chosen at runtime from a [`ProviderConfig`]
pub enum Provider {
    /// Mock backend
    Mock(MockProvider),
    /// Ollama backend
    Ollama(OllamaProvider),
    /// OpenAI-compatible backend
    OpenAi(OpenAiProvider),
}

impl Provider {
    /// Build the configured provider
    pub fn from_config(config: &ProviderConfig) -> Result<Self, LlmError> {
        config.validate()?;

        let provider = match config.kind {
            ProviderKind::Mock => Provider::Mock(MockProvider::new("{}").with_model_name(&config.model)),
            ProviderKind::Ollama => {
                let endpoint = config.endpoint.as_deref().unwrap_or(crate::ollama::DEFAULT_ENDPOINT);
                Provider::Ollama(
                    OllamaProvider::with_timeout(endpoint, &config.model, config.timeout())?
                        .with_max_retries(config.max_retries)
                        .with_json_mode(config.json_mode),
                )
            }
            ProviderKind::OpenAi => {
                let endpoint = config.endpoint.as_deref().unwrap_or(crate::openai::DEFAULT_BASE_URL);
                let api_key = config.api_key.clone().unwrap_or_default();
                Provider::OpenAi(
                    OpenAiProvider::with_timeout(endpoint, api_key, &config.model, config.timeout())?
                        .with_max_retries(config.max_retries),
                )
            }
        };
        Ok(provider)
    }
}

#[async_trait]
impl TextGenerator for Provider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str, system_message: &str) -> Result<String, Self::Error> {
        match self {
            Provider::Mock(p) => p.generate(prompt, system_message).await,
            Provider::Ollama(p) => p.generate(prompt, system_message).await,
            Provider::OpenAi(p) => p.generate(prompt, system_message).await,
        }
    }

    fn model_name(&self) -> &str {
        match self {
            Provider::Mock(p) => p.model_name(),
            Provider::Ollama(p) => p.model_name(),
            Provider::OpenAi(p) => p.model_name(),
        }
    }
}
