//! Error types for the Extractor

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during extraction
///
/// `UnparsableResponse`, `Generation`, `Timeout`, `NotAnObject` and
/// `InvalidRecord` are per-chunk failures; the pipeline turns them into
/// placeholder records.
/// `InvalidConfiguration`, `EmptyDocument` and `Cancelled` end a run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractorError {
    /// Every recovery strategy failed to produce JSON
    #[error("Unparsable response: {source_error} (response starts with: {snippet:?})")]
    UnparsableResponse {
        /// First 500 characters of the raw response
        snippet: String,
        /// The last parse error encountered
        source_error: String,
    },

    /// The generation service failed (HTTP status, network, provider setup)
    #[error("Generation error: {0}")]
    Generation(String),

    /// The generation call exceeded its time budget
    #[error("Extraction timed out after {0:?}")]
    Timeout(Duration),

    /// The response parsed, but not as a JSON object
    #[error("Expected a JSON object, got {0}")]
    NotAnObject(String),

    /// The object could not be decoded into the category's record
    #[error("Response does not match the record schema: {0}")]
    InvalidRecord(String),

    /// Chunking or pipeline configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The pipeline was invoked without any text
    #[error("Document is empty")]
    EmptyDocument,

    /// The caller cancelled the run
    #[error("Extraction cancelled")]
    Cancelled,
}

impl ExtractorError {
    /// Whether this error is contained per chunk rather than ending the run
    pub fn is_chunk_local(&self) -> bool {
        matches!(
            self,
            ExtractorError::UnparsableResponse { .. }
                | ExtractorError::Generation(_)
                | ExtractorError::Timeout(_)
                | ExtractorError::NotAnObject(_)
                | ExtractorError::InvalidRecord(_)
        )
    }
}
