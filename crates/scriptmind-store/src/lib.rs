//! Scriptmind Storage Layer
//!
//! Implements the MemoryStore trait with plain JSON files.
//!
//! # File Format
//!
//! Saved files hold a versioned envelope around the memory set:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "saved_at": 1760572800,
//!   "source": "the_matrix.txt",
//!   "memories": { "semantic": {}, "episodic": {}, "procedural": {} }
//! }
//! ```
//!
//! A bare memory set document (just the `memories` object) is accepted on
//! load as well.
//!
//! # Examples
//!
//! ```no_run
//! use scriptmind_domain::{MemorySet, MemoryStore};
//! use scriptmind_store::JsonFileStore;
//!
//! let store = JsonFileStore::new("memories").unwrap();
//! let path = store.save(&MemorySet::default()).unwrap();
//! let loaded = store.load(&path).unwrap();
//! ```

#![warn(missing_docs)]

use scriptmind_domain::{MemorySet, MemoryStore};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Envelope version written by this crate
pub const FORMAT_VERSION: u32 = 1;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No file at the given location
    #[error("Memory file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File written by a newer version
    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(u32),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// A saved memory set with its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMemories {
    /// Envelope version
    pub format_version: u32,

    /// Save time in seconds since the Unix epoch
    #[serde(default)]
    pub saved_at: u64,

    /// Where the memories were extracted from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// The memories
    #[serde(deserialize_with = "memory_set_object")]
    pub memories: MemorySet,
}

/// File-based implementation of MemoryStore
///
/// `save` writes a new file named `memories-<uuid>.json` into the store
/// directory; `load` reads any path. Writes go to a temporary file in the
/// same directory first and are renamed into place, so readers never see a
/// partial file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    source: Option<String>,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, source: None })
    }

    /// Record `source` in every file this store writes
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save `memories` to an explicit path
    pub fn save_to<P: AsRef<Path>>(&self, path: P, memories: &MemorySet) -> Result<(), StoreError> {
        let path = path.as_ref();
        let document = StoredMemories {
            format_version: FORMAT_VERSION,
            saved_at: unix_now(),
            source: self.source.clone(),
            memories: memories.clone(),
        };
        let contents = serde_json::to_vec_pretty(&document)?;
        write_atomic(path, &contents)?;
        info!(path = %path.display(), bytes = contents.len(), "Saved memories");
        Ok(())
    }

    /// Load a saved document, envelope or bare memory set
    pub fn load_document<P: AsRef<Path>>(path: P) -> Result<StoredMemories, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        let document = parse_document(&contents)?;
        debug!(path = %path.display(), version = document.format_version, "Loaded memories");
        Ok(document)
    }
}

impl MemoryStore for JsonFileStore {
    type Error = StoreError;
    type Location = PathBuf;

    fn save(&self, memories: &MemorySet) -> Result<PathBuf, StoreError> {
        let path = self.dir.join(format!("memories-{}.json", Uuid::now_v7()));
        self.save_to(&path, memories)?;
        Ok(path)
    }

    fn load(&self, location: &PathBuf) -> Result<MemorySet, StoreError> {
        Ok(Self::load_document(location)?.memories)
    }
}

fn parse_document(contents: &str) -> Result<StoredMemories, StoreError> {
    let value: Value = serde_json::from_str(contents)?;
    let object = value
        .as_object()
        .ok_or_else(|| StoreError::InvalidData("expected a JSON object".to_string()))?;

    match object.get("format_version") {
        Some(version) => {
            let version = version
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| StoreError::InvalidData(format!("bad format_version: {}", version)))?;
            if version > FORMAT_VERSION {
                return Err(StoreError::UnsupportedVersion(version));
            }
            Ok(serde_json::from_value(value)?)
        }
        None => Ok(StoredMemories {
            format_version: 0,
            saved_at: 0,
            source: None,
            memories: MemorySet::from_value(value)?,
        }),
    }
}

fn memory_set_object<'de, D>(deserializer: D) -> Result<MemorySet, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    MemorySet::from_value(value).map_err(serde::de::Error::custom)
}

/// Write through a temporary sibling file and rename it over `path`
fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| StoreError::InvalidData(format!("not a file path: {}", path.display())))?
        .to_string_lossy();
    let tmp = dir.join(format!(".{}.{}.tmp", file_name, Uuid::now_v7()));

    let result = (|| -> Result<(), StoreError> {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(contents)?;
        file.sync_all()?;
        fs::rename(&tmp, path)?;
        Ok(())
    })();

    if result.is_err() {
        // Best effort; the original error is what matters
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptmind_domain::{Category, ExtractionRecord};
    use tempfile::TempDir;

    fn sample() -> MemorySet {
        let mut memories = MemorySet::default();
        memories.insert(ExtractionRecord::with_primary(Category::Semantic, vec!["Neo is The One".into()]));
        memories.insert(ExtractionRecord::with_primary(Category::Procedural, vec!["kung fu".into()]));
        memories
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();

        let path = store.save(&sample()).unwrap();
        assert!(path.starts_with(dir.path()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));

        let loaded = store.load(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_saves_get_distinct_names() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        let a = store.save(&sample()).unwrap();
        let b = store.save(&sample()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_envelope_fields() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap().with_source("matrix.txt");
        let path = dir.path().join("out.json");
        store.save_to(&path, &sample()).unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["format_version"], 1);
        assert_eq!(value["source"], "matrix.txt");
        assert!(value["saved_at"].as_u64().unwrap() > 0);
        assert_eq!(value["memories"]["semantic"]["facts"][0], "Neo is The One");

        let document = JsonFileStore::load_document(&path).unwrap();
        assert_eq!(document.source.as_deref(), Some("matrix.txt"));
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        store.save_to(dir.path().join("a.json"), &sample()).unwrap();
        store.save_to(dir.path().join("a.json"), &MemorySet::default()).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json"]);
        assert_eq!(store.load(&dir.path().join("a.json")).unwrap(), MemorySet::default());
    }

    #[test]
    fn test_bare_memory_set_is_accepted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bare.json");
        fs::write(&path, r#"{"semantic": {"facts": ["f1"]}, "episodic": {}, "procedural": {}}"#).unwrap();

        let document = JsonFileStore::load_document(&path).unwrap();
        assert_eq!(document.format_version, 0);
        assert_eq!(document.memories.semantic.facts, vec!["f1"]);
    }

    #[test]
    fn test_future_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("future.json");
        fs::write(&path, r#"{"format_version": 7, "memories": {}}"#).unwrap();
        assert!(matches!(
            JsonFileStore::load_document(&path),
            Err(StoreError::UnsupportedVersion(7))
        ));
    }

    #[test]
    fn test_positional_memories_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("positional.json");
        fs::write(&path, r#"{"format_version": 1, "memories": [{"facts": ["f1"]}, {}, {}]}"#).unwrap();
        assert!(matches!(
            JsonFileStore::load_document(&path),
            Err(StoreError::Serialization(_))
        ));

        fs::write(&path, r#"{"semantic": [["f1"], ["c1"]], "episodic": {}, "procedural": {}}"#).unwrap();
        assert!(matches!(
            JsonFileStore::load_document(&path),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        assert!(matches!(
            store.load(&dir.path().join("nope.json")),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(
            JsonFileStore::load_document(&path),
            Err(StoreError::InvalidData(_))
        ));
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            JsonFileStore::load_document(&path),
            Err(StoreError::Serialization(_))
        ));
    }
}
