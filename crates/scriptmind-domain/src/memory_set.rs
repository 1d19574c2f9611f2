//! MemorySet module - the merged result of a pipeline run

use crate::category::Category;
use crate::lenient;
use crate::record::{require_object, EpisodicRecord, ExtractionRecord, ProceduralRecord, SemanticRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The three merged records keyed by category
///
/// Serializes to a JSON object with exactly the keys `semantic`, `episodic`
/// and `procedural`. A category missing from a decoded document takes its
/// empty default. Every record must be a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySet {
    /// Merged semantic record
    #[serde(deserialize_with = "lenient::object")]
    pub semantic: SemanticRecord,

    /// Merged episodic record
    #[serde(deserialize_with = "lenient::object")]
    pub episodic: EpisodicRecord,

    /// Merged procedural record
    #[serde(deserialize_with = "lenient::object")]
    pub procedural: ProceduralRecord,
}

impl MemorySet {
    /// Decode a memory set document, which must be a JSON object
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        require_object(&value)?;
        serde_json::from_value(value)
    }

    /// Replace the record of the record's own category
    pub fn insert(&mut self, record: ExtractionRecord) {
        match record {
            ExtractionRecord::Semantic(r) => self.semantic = r,
            ExtractionRecord::Episodic(r) => self.episodic = r,
            ExtractionRecord::Procedural(r) => self.procedural = r,
        }
    }

    /// A copy of the record for one category
    pub fn record(&self, category: Category) -> ExtractionRecord {
        match category {
            Category::Semantic => ExtractionRecord::Semantic(self.semantic.clone()),
            Category::Episodic => ExtractionRecord::Episodic(self.episodic.clone()),
            Category::Procedural => ExtractionRecord::Procedural(self.procedural.clone()),
        }
    }

    /// JSON value of one category's record
    pub fn category_json(&self, category: Category) -> serde_json::Value {
        let value = match category {
            Category::Semantic => serde_json::to_value(&self.semantic),
            Category::Episodic => serde_json::to_value(&self.episodic),
            Category::Procedural => serde_json::to_value(&self.procedural),
        };
        // Records contain only strings, lists and string-keyed maps
        value.unwrap_or_default()
    }

    /// True when no category holds any entry
    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.record(*c).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_has_exactly_three_keys() {
        let value = serde_json::to_value(MemorySet::default()).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["episodic", "procedural", "semantic"]);
    }

    #[test]
    fn test_insert_and_record() {
        let mut set = MemorySet::default();
        set.insert(ExtractionRecord::with_primary(Category::Episodic, vec!["e1".into()]));
        assert_eq!(set.episodic.events, vec!["e1"]);
        assert_eq!(set.record(Category::Episodic).primary(), ["e1".to_string()]);
        assert!(set.record(Category::Semantic).is_empty());
        assert!(!set.is_empty());
    }

    #[test]
    fn test_records_must_be_objects() {
        let err = serde_json::from_str::<MemorySet>(r#"{"semantic": [["a"], ["b"]]}"#).unwrap_err();
        assert!(err.to_string().contains("expected a JSON object"), "{}", err);
    }

    #[test]
    fn test_from_value_rejects_positional_array() {
        assert!(MemorySet::from_value(serde_json::json!([{}, {}, {}])).is_err());
        let set = MemorySet::from_value(serde_json::json!({"procedural": {"skills": ["kung fu"]}})).unwrap();
        assert_eq!(set.procedural.skills, vec!["kung fu"]);
    }

    #[test]
    fn test_missing_category_defaults() {
        let set: MemorySet = serde_json::from_str(r#"{"semantic": {"facts": ["f"]}}"#).unwrap();
        assert_eq!(set.semantic.facts, vec!["f"]);
        assert!(set.episodic.events.is_empty());
        assert!(set.procedural.skills.is_empty());
    }
}
