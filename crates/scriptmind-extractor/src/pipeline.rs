//! Pipeline orchestration: chunk, extract every category, merge

use crate::chunking::Chunker;
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::extractor::CategoryExtractor;
use crate::merge::merge_records;
use crate::progress::NoProgress;
use crate::types::{ChunkOutcome, ExtractionMetadata, ExtractionOutcome};
use futures::stream::{self, StreamExt};
use scriptmind_domain::{Category, Chunk, ExtractionRecord, MemorySet, ProgressObserver, TextGenerator};
use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Progress reported when each category starts
const CATEGORY_MILESTONES: [(Category, u8); 3] = [
    (Category::Semantic, 10),
    (Category::Episodic, 40),
    (Category::Procedural, 70),
];

/// Extracts a [`MemorySet`] from a whole document
///
/// Every category is always present in the result. A chunk whose extraction
/// fails contributes a placeholder record instead of failing the run.
pub struct Pipeline<G: TextGenerator, P: ProgressObserver = NoProgress> {
    extractor: CategoryExtractor<G>,
    chunker: Chunker,
    config: ExtractorConfig,
    progress: P,
}

impl<G: TextGenerator> Pipeline<G, NoProgress> {
    /// Create a new Pipeline; fails on invalid configuration
    pub fn new(generator: G, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        Self::from_shared(Arc::new(generator), config)
    }

    /// Create a Pipeline around a shared generator
    pub fn from_shared(generator: Arc<G>, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate()?;
        Ok(Self {
            extractor: CategoryExtractor::from_shared(generator, &config),
            chunker: Chunker::from_config(&config)?,
            config,
            progress: NoProgress,
        })
    }
}

impl<G: TextGenerator, P: ProgressObserver> Pipeline<G, P> {
    /// Report milestones to `progress`
    pub fn with_progress<Q: ProgressObserver>(self, progress: Q) -> Pipeline<G, Q> {
        Pipeline {
            extractor: self.extractor,
            chunker: self.chunker,
            config: self.config,
            progress,
        }
    }

    /// The pipeline configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract memories from `document`
    pub async fn run(&self, document: &str) -> Result<MemorySet, ExtractorError> {
        Ok(self.run_detailed(document).await?.memories)
    }

    /// Extract memories and return run metadata alongside
    pub async fn run_detailed(&self, document: &str) -> Result<ExtractionOutcome, ExtractorError> {
        if document.trim().is_empty() {
            return Err(ExtractorError::EmptyDocument);
        }

        let started = Instant::now();
        let chunks = self.chunker.chunk(document);
        info!(
            chunks = chunks.len(),
            document_chars = chunks.last().map_or(0, |c| c.end),
            "Starting extraction"
        );
        self.progress
            .report(&format!("Chunked document into {} chunks", chunks.len()), 0);

        let mut memories = MemorySet::default();
        let mut failed_chunks = BTreeMap::new();

        for (category, percent) in CATEGORY_MILESTONES {
            self.progress
                .report(&format!("Extracting {} memories...", category), percent);

            let (record, failed) = self.extract_category(&chunks, category).await;
            info!(
                category = %category,
                items = record.item_count(),
                failed_chunks = failed,
                "Category complete"
            );
            failed_chunks.insert(category, failed);
            memories.insert(record);
        }

        self.progress.report("Extraction complete", 100);

        let metadata = ExtractionMetadata {
            chunk_count: chunks.len(),
            failed_chunks,
            processing_time_ms: started.elapsed().as_millis() as u64,
            model_name: self.extractor.generator().model_name().to_string(),
        };

        info!(
            chunks = metadata.chunk_count,
            failures = metadata.total_failures(),
            elapsed_ms = metadata.processing_time_ms,
            model = %metadata.model_name,
            "Extraction finished"
        );

        Ok(ExtractionOutcome { memories, metadata })
    }

    /// Like [`Pipeline::run_detailed`], unless `shutdown` resolves first
    ///
    /// On shutdown all in-flight generation calls are dropped and the run
    /// fails with [`ExtractorError::Cancelled`].
    pub async fn run_until<F>(&self, document: &str, shutdown: F) -> Result<ExtractionOutcome, ExtractorError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.run_detailed(document) => result,
            _ = shutdown => {
                warn!("Extraction cancelled");
                Err(ExtractorError::Cancelled)
            }
        }
    }

    /// Extract one category from every chunk and merge the results
    ///
    /// Returns the merged record and the number of chunks that failed.
    async fn extract_category(&self, chunks: &[Chunk<'_>], category: Category) -> (ExtractionRecord, usize) {
        let outcomes: Vec<ChunkOutcome> = if self.config.max_concurrency <= 1 {
            let mut outcomes = Vec::with_capacity(chunks.len());
            for chunk in chunks {
                outcomes.push(self.extractor.extract_or_placeholder(chunk, category).await);
            }
            outcomes
        } else {
            // Ordered: results come back in chunk order
            stream::iter(chunks)
                .map(|chunk| self.extractor.extract_or_placeholder(chunk, category))
                .buffered(self.config.max_concurrency)
                .collect()
                .await
        };

        let failed = outcomes.iter().filter(|o| o.is_failure()).count();
        let mut merged = merge_records(category, outcomes.iter().map(|o| &o.record));
        consolidate_failures(&mut merged, &outcomes, failed);
        (merged, failed)
    }
}

/// Replace a primary field made up only of this run's placeholder
/// diagnostics with one summary line
fn consolidate_failures(merged: &mut ExtractionRecord, outcomes: &[ChunkOutcome], failed: usize) {
    if failed == 0 {
        return;
    }

    let diagnostics: HashSet<&str> = outcomes.iter().filter_map(|o| o.failure.as_deref()).collect();
    let primary = merged.primary();
    if !primary.is_empty() && primary.iter().all(|entry| diagnostics.contains(entry.as_str())) {
        *merged.primary_mut() = vec![format!(
            "extraction completed with errors: {} of {} chunks failed",
            failed,
            outcomes.len()
        )];
    }
}
