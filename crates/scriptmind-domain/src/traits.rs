//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction pipeline and
//! infrastructure. Implementations live in other crates.

use crate::MemorySet;
use async_trait::async_trait;

/// Trait for text generation services
///
/// Implemented by the infrastructure layer (scriptmind-llm). Implementations
/// bound each call with their own network timeout; callers may add a tighter
/// one by dropping the returned future.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Error type for generation calls
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate a completion for `prompt` under the given system message
    async fn generate(&self, prompt: &str, system_message: &str) -> Result<String, Self::Error>;

    /// Model identifier, for run metadata
    fn model_name(&self) -> &str {
        "llm"
    }
}

/// Sink for progress milestones of a pipeline run
///
/// Reporting is fire-and-forget: implementations must return quickly and must
/// not panic. The pipeline never calls an observer concurrently.
pub trait ProgressObserver: Send + Sync {
    /// Report a milestone with an overall completion percentage (0..=100)
    fn report(&self, message: &str, percent: u8);
}

impl<F> ProgressObserver for F
where
    F: Fn(&str, u8) + Send + Sync,
{
    fn report(&self, message: &str, percent: u8) {
        self(message, percent)
    }
}

/// Trait for persisting memory sets
///
/// Implemented by the infrastructure layer (scriptmind-store)
pub trait MemoryStore {
    /// Error type for store operations
    type Error;

    /// Where a saved memory set can be found again
    type Location;

    /// Persist a memory set and return its location
    fn save(&self, memories: &MemorySet) -> Result<Self::Location, Self::Error>;

    /// Load a previously saved memory set
    fn load(&self, location: &Self::Location) -> Result<MemorySet, Self::Error>;
}
