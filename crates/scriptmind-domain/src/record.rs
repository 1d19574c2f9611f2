//! Record module - typed schemas for the three memory categories
//!
//! Every field defaults to an empty container, both when constructed in code
//! and when decoded from JSON with missing or ill-typed fields.

use crate::category::Category;
use crate::lenient;
use serde::de::Unexpected;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Semantic memory: what is true about the story world
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticRecord {
    /// Standalone facts (primary field)
    #[serde(deserialize_with = "lenient::strings")]
    pub facts: Vec<String>,

    /// Themes and abstract concepts
    #[serde(deserialize_with = "lenient::strings")]
    pub concepts: Vec<String>,

    /// Character name to trait descriptions
    #[serde(deserialize_with = "lenient::string_map")]
    pub character_traits: BTreeMap<String, Vec<String>>,

    /// Setting, rules and lore of the world
    #[serde(deserialize_with = "lenient::strings")]
    pub world_building: Vec<String>,
}

/// Episodic memory: what happens, in order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodicRecord {
    /// Key events (primary field)
    #[serde(deserialize_with = "lenient::strings")]
    pub events: Vec<String>,

    /// Scene descriptions; never deduplicated
    #[serde(deserialize_with = "lenient::scenes")]
    pub scenes: Vec<Scene>,

    /// Chronological markers
    #[serde(deserialize_with = "lenient::strings")]
    pub timeline: Vec<String>,

    /// Moments that change the course of the story
    #[serde(deserialize_with = "lenient::strings")]
    pub turning_points: Vec<String>,
}

/// Procedural memory: how characters do things
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProceduralRecord {
    /// Abilities shown by characters (primary field)
    #[serde(deserialize_with = "lenient::strings")]
    pub skills: Vec<String>,

    /// Step-by-step methods, plans, rituals
    #[serde(deserialize_with = "lenient::strings")]
    pub processes: Vec<String>,

    /// Habitual behavior patterns
    #[serde(deserialize_with = "lenient::strings")]
    pub behaviors: Vec<String>,

    /// Rules characters follow or enforce
    #[serde(deserialize_with = "lenient::strings")]
    pub rules: Vec<String>,
}

/// One scene of an episodic record
///
/// Keys beyond the three named ones (for example `scene_number`) are kept in
/// `extra` so they survive a save/load cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Where the scene takes place
    #[serde(default, deserialize_with = "lenient::string")]
    pub location: String,

    /// Characters present
    #[serde(default, deserialize_with = "lenient::strings")]
    pub characters: Vec<String>,

    /// What happens in the scene
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,

    /// Any other keys emitted by the model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One chunk's structured result for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractionRecord {
    /// Semantic record
    Semantic(SemanticRecord),

    /// Episodic record
    Episodic(EpisodicRecord),

    /// Procedural record
    Procedural(ProceduralRecord),
}

impl ExtractionRecord {
    /// An empty record for the given category
    pub fn empty(category: Category) -> Self {
        match category {
            Category::Semantic => ExtractionRecord::Semantic(SemanticRecord::default()),
            Category::Episodic => ExtractionRecord::Episodic(EpisodicRecord::default()),
            Category::Procedural => ExtractionRecord::Procedural(ProceduralRecord::default()),
        }
    }

    /// A record whose primary field holds `entries` and every other field is empty
    pub fn with_primary(category: Category, entries: Vec<String>) -> Self {
        let mut record = Self::empty(category);
        *record.primary_mut() = entries;
        record
    }

    /// Decode a JSON object into the category's record
    ///
    /// Missing fields take their empty default and ill-typed fields are
    /// coerced; only a non-object value is rejected.
    pub fn from_value(category: Category, value: Value) -> Result<Self, serde_json::Error> {
        require_object(&value)?;
        let record = match category {
            Category::Semantic => ExtractionRecord::Semantic(serde_json::from_value(value)?),
            Category::Episodic => ExtractionRecord::Episodic(serde_json::from_value(value)?),
            Category::Procedural => ExtractionRecord::Procedural(serde_json::from_value(value)?),
        };
        Ok(record)
    }

    /// Category of this record
    pub fn category(&self) -> Category {
        match self {
            ExtractionRecord::Semantic(_) => Category::Semantic,
            ExtractionRecord::Episodic(_) => Category::Episodic,
            ExtractionRecord::Procedural(_) => Category::Procedural,
        }
    }

    /// Entries of the primary field
    pub fn primary(&self) -> &[String] {
        match self {
            ExtractionRecord::Semantic(r) => &r.facts,
            ExtractionRecord::Episodic(r) => &r.events,
            ExtractionRecord::Procedural(r) => &r.skills,
        }
    }

    /// Mutable access to the primary field
    pub fn primary_mut(&mut self) -> &mut Vec<String> {
        match self {
            ExtractionRecord::Semantic(r) => &mut r.facts,
            ExtractionRecord::Episodic(r) => &mut r.events,
            ExtractionRecord::Procedural(r) => &mut r.skills,
        }
    }

    /// Total number of entries across all fields
    ///
    /// Map fields count one entry per trait, not per key.
    pub fn item_count(&self) -> usize {
        match self {
            ExtractionRecord::Semantic(r) => {
                r.facts.len()
                    + r.concepts.len()
                    + r.world_building.len()
                    + r.character_traits.values().map(Vec::len).sum::<usize>()
            }
            ExtractionRecord::Episodic(r) => {
                r.events.len() + r.scenes.len() + r.timeline.len() + r.turning_points.len()
            }
            ExtractionRecord::Procedural(r) => {
                r.skills.len() + r.processes.len() + r.behaviors.len() + r.rules.len()
            }
        }
    }

    /// True when every field is empty
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

/// Reject anything but a JSON object
///
/// Derived struct decoders also accept arrays and map their elements to
/// fields by position.
pub(crate) fn require_object(value: &Value) -> Result<(), serde_json::Error> {
    if value.is_object() {
        return Ok(());
    }
    let unexpected = match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    };
    Err(serde::de::Error::invalid_type(unexpected, &"a JSON object"))
}
