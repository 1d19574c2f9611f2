//! Per-chunk, per-category extraction

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::prompt::PromptBuilder;
use crate::sanitizer::sanitize_response;
use crate::types::ChunkOutcome;
use scriptmind_domain::{Category, Chunk, ExtractionRecord, TextGenerator};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Turns one chunk into one category's record through the generation service
pub struct CategoryExtractor<G: TextGenerator> {
    generator: Arc<G>,
    call_timeout: Duration,
    diagnostic_chars: usize,
}

impl<G: TextGenerator> CategoryExtractor<G> {
    /// Create a new CategoryExtractor
    pub fn new(generator: G, config: &ExtractorConfig) -> Self {
        Self::from_shared(Arc::new(generator), config)
    }

    /// Create a CategoryExtractor around a shared generator
    pub fn from_shared(generator: Arc<G>, config: &ExtractorConfig) -> Self {
        Self {
            generator,
            call_timeout: config.extraction_timeout(),
            diagnostic_chars: config.diagnostic_chars,
        }
    }

    /// The underlying generator
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Generate a completion and recover JSON from it
    ///
    /// The call is bounded by the configured extraction timeout.
    pub async fn generate_json(&self, prompt: &str, system_message: &str) -> Result<Value, ExtractorError> {
        debug!(prompt_chars = prompt.len(), "Calling generator");

        let response = timeout(self.call_timeout, self.generator.generate(prompt, system_message))
            .await
            .map_err(|_| ExtractorError::Timeout(self.call_timeout))?
            .map_err(|e| ExtractorError::Generation(e.to_string()))?;

        debug!(response_chars = response.len(), "Generator responded");
        sanitize_response(&response)
    }

    /// Extract one category's record from one chunk
    pub async fn extract(&self, chunk: &Chunk<'_>, category: Category) -> Result<ExtractionRecord, ExtractorError> {
        let builder = PromptBuilder::new(category, chunk.text);
        let value = self
            .generate_json(&builder.build(), &builder.system_message())
            .await?;

        if !value.is_object() {
            return Err(ExtractorError::NotAnObject(json_kind(&value).to_string()));
        }

        let record = ExtractionRecord::from_value(category, value)
            .map_err(|e| ExtractorError::InvalidRecord(e.to_string()))?;

        debug!(
            chunk = chunk.index,
            category = %category,
            items = record.item_count(),
            "Extracted chunk"
        );
        Ok(record)
    }

    /// Extract, replacing any failure with a placeholder record
    pub async fn extract_or_placeholder(&self, chunk: &Chunk<'_>, category: Category) -> ChunkOutcome {
        match self.extract(chunk, category).await {
            Ok(record) => ChunkOutcome::extracted(record),
            Err(e) => {
                warn!(chunk = chunk.index, category = %category, error = %e, "Extraction failed, using placeholder");
                let record = self.placeholder(chunk, category, &e);
                let failure = record.primary().first().cloned();
                ChunkOutcome { record, failure }
            }
        }
    }

    /// Placeholder record for a failed chunk
    pub fn placeholder(&self, chunk: &Chunk<'_>, category: Category, error: &ExtractorError) -> ExtractionRecord {
        let message: String = error.to_string().chars().take(self.diagnostic_chars).collect();
        let diagnostic = format!("[extraction failed for {}: {}]", chunk.label(), message);
        ExtractionRecord::with_primary(category, vec![diagnostic])
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptmind_llm::MockProvider;

    fn chunk(text: &str) -> Chunk<'_> {
        Chunk {
            index: 0,
            start: 0,
            end: text.chars().count(),
            text,
        }
    }

    fn extractor(provider: MockProvider) -> CategoryExtractor<MockProvider> {
        CategoryExtractor::new(provider, &ExtractorConfig::default())
    }

    #[tokio::test]
    async fn test_extract_semantic() {
        let extractor = extractor(MockProvider::new(r#"{"facts": ["Neo is a hacker"], "concepts": ["choice"]}"#));
        let record = extractor.extract(&chunk("NEO types."), Category::Semantic).await.unwrap();
        assert_eq!(record.primary(), ["Neo is a hacker".to_string()]);
        assert_eq!(record.item_count(), 2);
    }

    #[tokio::test]
    async fn test_prompt_contains_chunk() {
        let provider = MockProvider::new("{}");
        let extractor = extractor(provider.clone());
        extractor.extract(&chunk("EXT. ROOFTOP - DAY"), Category::Episodic).await.unwrap();
        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("EXT. ROOFTOP - DAY"));
        assert!(prompts[0].contains("EPISODIC"));
    }

    #[tokio::test]
    async fn test_non_object_is_rejected() {
        let extractor = extractor(MockProvider::new(r#"["a", "b"]"#));
        let result = extractor.extract(&chunk("text"), Category::Procedural).await;
        assert!(matches!(result, Err(ExtractorError::NotAnObject(kind)) if kind == "an array"));
    }

    #[tokio::test]
    async fn test_generation_error() {
        let extractor = extractor(MockProvider::failing("HTTP 500"));
        let result = extractor.extract(&chunk("text"), Category::Semantic).await;
        assert!(matches!(result, Err(ExtractorError::Generation(msg)) if msg.contains("HTTP 500")));
    }

    #[tokio::test]
    async fn test_placeholder_on_unparsable_response() {
        let extractor = extractor(MockProvider::new("I'd rather not."));
        let outcome = extractor.extract_or_placeholder(&chunk("text"), Category::Episodic).await;
        assert!(outcome.is_failure());
        assert_eq!(outcome.record.category(), Category::Episodic);
        assert_eq!(outcome.record.item_count(), 1);
        let diagnostic = &outcome.record.primary()[0];
        assert!(diagnostic.starts_with("[extraction failed for chunk 1"));
        assert_eq!(outcome.failure.as_deref(), Some(diagnostic.as_str()));
    }

    #[tokio::test]
    async fn test_diagnostic_is_truncated() {
        let config = ExtractorConfig {
            diagnostic_chars: 10,
            ..ExtractorConfig::default()
        };
        let extractor = CategoryExtractor::new(MockProvider::failing("x".repeat(1000)), &config);
        let outcome = extractor.extract_or_placeholder(&chunk("text"), Category::Semantic).await;
        let diagnostic = outcome.failure.unwrap();
        assert!(diagnostic.len() < 70, "diagnostic too long: {}", diagnostic);
    }

    #[test]
    fn test_placeholder_shape() {
        let extractor = extractor(MockProvider::default());
        let record = extractor.placeholder(&chunk("t"), Category::Procedural, &ExtractorError::Timeout(Duration::from_secs(5)));
        assert_eq!(record.item_count(), 1);
        assert!(record.primary()[0].contains("timed out"));
    }

    #[tokio::test]
    async fn test_timeout() {
        let config = ExtractorConfig {
            extraction_timeout_secs: 1,
            ..ExtractorConfig::default()
        };
        let provider = MockProvider::new("{}").with_delay(Duration::from_secs(30));
        let extractor = CategoryExtractor::new(provider, &config);
        let result = extractor.extract(&chunk("text"), Category::Semantic).await;
        assert!(matches!(result, Err(ExtractorError::Timeout(d)) if d == Duration::from_secs(1)));
    }
}
