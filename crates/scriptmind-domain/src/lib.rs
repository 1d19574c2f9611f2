//! Scriptmind Domain Layer
//!
//! This crate contains the data model shared by every other Scriptmind crate:
//! the three memory categories, their record schemas, the merged memory set,
//! document chunks, and the trait interfaces for the external collaborators
//! (text generation, progress reporting, persistence).
//!
//! ## Key Concepts
//!
//! - **Category**: one of `semantic`, `episodic`, `procedural`
//! - **ExtractionRecord**: one chunk's structured result for one category
//! - **MemorySet**: the merged records for all three categories
//! - **Chunk**: a bounded, possibly overlapping window of the source document
//!
//! ## Architecture
//!
//! - Pure data and trait definitions only
//! - Infrastructure implementations live in other crates
//! - Records never carry absent fields: every field defaults to an empty container

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod category;
pub mod chunk;
mod lenient;
pub mod memory_set;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use category::Category;
pub use chunk::Chunk;
pub use memory_set::MemorySet;
pub use record::{EpisodicRecord, ExtractionRecord, ProceduralRecord, Scene, SemanticRecord};
pub use traits::{MemoryStore, ProgressObserver, TextGenerator};
