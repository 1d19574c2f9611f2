//! Result types for extraction runs

use scriptmind_domain::{Category, ExtractionRecord, MemorySet};
use serde::Serialize;
use std::collections::BTreeMap;

/// Result of extracting one chunk for one category
///
/// A failed extraction still carries a record (the placeholder); `failure`
/// holds the diagnostic placed in its primary field.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkOutcome {
    /// Extracted record, or the placeholder on failure
    pub record: ExtractionRecord,

    /// Diagnostic for a failed extraction
    pub failure: Option<String>,
}

impl ChunkOutcome {
    /// Outcome of a successful extraction
    pub fn extracted(record: ExtractionRecord) -> Self {
        Self { record, failure: None }
    }

    /// Whether the record is a placeholder
    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

/// Metadata about a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionMetadata {
    /// Number of chunks the document was split into
    pub chunk_count: usize,

    /// Chunks that fell back to a placeholder, per category
    pub failed_chunks: BTreeMap<Category, usize>,

    /// Wall-clock time of the run in milliseconds
    pub processing_time_ms: u64,

    /// Name of the generation model
    pub model_name: String,
}

impl ExtractionMetadata {
    /// Total placeholder records across all categories
    pub fn total_failures(&self) -> usize {
        self.failed_chunks.values().sum()
    }
}

/// Memories plus metadata of a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOutcome {
    /// The merged memories
    pub memories: MemorySet,

    /// Metadata about the run
    pub metadata: ExtractionMetadata,
}
