//! Scriptmind Extractor
//!
//! Turns an oversized movie script into structured memories using a text
//! generation service.
//!
//! # Overview
//!
//! A script is far larger than what a model reliably handles in one call, and
//! model output is only mostly JSON. The extractor splits the script into
//! overlapping windows, asks the model for one memory category per window,
//! recovers JSON from whatever comes back and merges the per-window results.
//!
//! # Architecture
//!
//! ```text
//! Script → Chunker → CategoryExtractor (×3 categories) → Merger → MemorySet
//!                         │
//!                         └→ TextGenerator → sanitize_response
//! ```
//!
//! # Key Features
//!
//! - **Tolerant JSON recovery**: fences, commentary, raw line breaks, single quotes
//! - **Failure containment**: a failed chunk becomes a placeholder, never a failed run
//! - **Deterministic merge**: first-occurrence order, sorted map keys
//! - **Bounded calls**: per-call timeout, optional ordered concurrency, cancellation
//!
//! # Example Usage
//!
//! ```no_run
//! use scriptmind_extractor::{ExtractorConfig, Pipeline, TracingProgress};
//! use scriptmind_llm::OllamaProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = OllamaProvider::default_endpoint("llama3")?.with_json_mode(true);
//! let pipeline = Pipeline::new(llm, ExtractorConfig::default())?.with_progress(TracingProgress);
//!
//! let script = std::fs::read_to_string("the_matrix.txt")?;
//! let memories = pipeline.run(&script).await?;
//!
//! println!("Facts: {}", memories.semantic.facts.len());
//! println!("Events: {}", memories.episodic.events.len());
//! println!("Skills: {}", memories.procedural.skills.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod chunking;
mod config;
mod error;
mod extractor;
mod merge;
mod pipeline;
mod progress;
mod prompt;
mod sanitizer;
mod types;

#[cfg(test)]
mod tests;

pub use chunking::{Chunker, DEFAULT_NEWLINE_SEARCH, DEFAULT_OVERLAP, DEFAULT_WINDOW};
pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::CategoryExtractor;
pub use merge::merge_records;
pub use pipeline::Pipeline;
pub use progress::{NoProgress, TracingProgress};
pub use prompt::PromptBuilder;
pub use sanitizer::sanitize_response;
pub use types::{ChunkOutcome, ExtractionMetadata, ExtractionOutcome};
